use crate::auth::auth::AuthUser;
use crate::auth::jwt::{bearer_token, verify_access_token};
use crate::config::Config;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde::Serialize;
use tracing::warn;

/// Body of a 401 produced before any handler runs.
#[derive(Debug, Serialize)]
struct Rejection {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl Rejection {
    fn new(error: &'static str) -> Self {
        Self { error, details: None }
    }
}

fn authenticate(req: &ServiceRequest, secret: &str) -> Result<AuthUser, Rejection> {
    let token = bearer_token(req.headers()).map_err(Rejection::new)?;

    let claims = verify_access_token(token, secret).map_err(|e| Rejection {
        error: "Invalid or expired token",
        details: Some(e),
    })?;

    AuthUser::from_claims(claims).ok_or_else(|| Rejection::new("Invalid role"))
}

/// Resolves the bearer token into an `AuthUser` request extension.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    match authenticate(&req, &config.jwt_secret) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.call(req).await
        }
        Err(rejection) => {
            warn!(path = %req.path(), reason = rejection.error, "Rejected request");
            let resp = HttpResponse::Unauthorized().json(rejection);
            Ok(req.into_response(resp.map_into_boxed_body()))
        }
    }
}
