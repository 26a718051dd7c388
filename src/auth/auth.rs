use crate::auth::jwt::{bearer_token, verify_access_token};
use crate::config::Config;
use crate::model::role::Role;
use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorForbidden,
    error::ErrorUnauthorized, web::Data,
};
use futures::future::{Ready, ready};

/// Caller identity established from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Already resolved by auth_middleware
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match bearer_token(req.headers()) {
            Ok(t) => t,
            Err(reason) => return ready(Err(ErrorUnauthorized(reason))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Config missing"),
                ));
            }
        };

        let claims = match verify_access_token(token, &config.jwt_secret) {
            Ok(c) => c,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        ready(AuthUser::from_claims(claims).ok_or_else(|| ErrorUnauthorized("Invalid role")))
    }
}

impl AuthUser {
    pub fn from_claims(claims: crate::models::Claims) -> Option<Self> {
        let role = Role::from_id(claims.role)?;

        Some(AuthUser {
            user_id: claims.user_id,
            username: claims.sub,
            role,
            employee_id: claims.employee_id,
        })
    }

    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ErrorForbidden("Admin only"))
        }
    }

    /// The caller's employee id; attendance is only kept for employees.
    pub fn require_employee(&self) -> actix_web::Result<u64> {
        self.employee_id
            .ok_or_else(|| ErrorForbidden("No employee profile"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Claims, TokenType};

    fn claims(role: u8, employee_id: Option<u64>) -> Claims {
        Claims {
            user_id: 9,
            sub: "asha".to_string(),
            role,
            exp: 0,
            jti: "jti".to_string(),
            token_type: TokenType::Access,
            employee_id,
        }
    }

    #[test]
    fn employee_profile_is_required_for_attendance() {
        let hr = AuthUser::from_claims(claims(2, None)).unwrap();
        assert!(hr.require_employee().is_err());
        assert!(hr.require_admin().is_err());

        let employee = AuthUser::from_claims(claims(3, Some(42))).unwrap();
        assert_eq!(employee.require_employee().unwrap(), 42);
    }

    #[test]
    fn unknown_role_is_not_a_user() {
        assert!(AuthUser::from_claims(claims(0, Some(1))).is_none());
        assert!(AuthUser::from_claims(claims(1, None)).unwrap().require_admin().is_ok());
    }
}
