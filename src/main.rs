use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod relay;
mod routes;
mod service;
mod store;
mod timekeeping;

use config::Config;
use db::{init_db, run_migrations};

use crate::docs::ApiDoc;
use crate::relay::{MySqlNotificationStore, NotificationRelay, RelayServer, SessionRegistry};
use crate::service::AttendanceService;
use crate::store::{CachedDirectory, MySqlClockStore, MySqlEmployeeDirectory};
use crate::timekeeping::SystemClock;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let policy = config.time_policy()?;
    let limiter = routes::build_limiter(config.rate_protected_per_min)?;

    let pool = init_db(&config.database_url).await?;
    run_migrations(&pool).await?;

    let directory = Arc::new(CachedDirectory::new(
        Arc::new(MySqlEmployeeDirectory::new(pool.clone())),
        config.directory_cache_capacity,
        Duration::from_secs(config.directory_cache_ttl_secs),
    ));
    let service = Arc::new(AttendanceService::new(
        Arc::new(MySqlClockStore::new(pool.clone())),
        directory,
        Arc::new(SystemClock),
        policy,
    ));

    let relay = Arc::new(NotificationRelay::new(
        Arc::new(SessionRegistry::new()),
        Arc::new(MySqlNotificationStore::new(pool.clone())),
    ));
    let relay_server = RelayServer::bind(&config.relay_addr, relay).await?;
    actix_web::rt::spawn(relay_server.run());

    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, zone = %policy.zone.offset(), "Attendance API listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(Data::from(service.clone()))
            // Configure protected routes with auth and rate limiting
            .configure(|cfg| routes::configure(cfg, &config, &limiter))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
