use crate::{api::attendance, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};

pub type RateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter; built once so every worker shares the same quota.
pub fn build_limiter(requests_per_min: u32) -> Result<RateLimit> {
    if requests_per_min == 0 {
        return Err(anyhow!("RATE_PROTECTED_PER_MIN must be greater than zero"));
    }

    let per_ms = (60_000 / requests_per_min as u64).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {requests_per_min} requests per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: &RateLimit) {
    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(Governor::new(limiter)) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance/mark-in
                    .service(
                        web::resource("/mark-in").route(web::post().to(attendance::mark_in)),
                    )
                    // /attendance/mark-out
                    .service(
                        web::resource("/mark-out").route(web::post().to(attendance::mark_out)),
                    )
                    // /attendance/my
                    .service(
                        web::resource("/my").route(web::get().to(attendance::my_attendance)),
                    )
                    // /attendance/all (admin)
                    .service(
                        web::resource("/all").route(web::get().to(attendance::all_attendance)),
                    ),
            ),
    );
}
