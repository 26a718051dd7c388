use crate::models::{Claims, TokenType};
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Token part of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header encoding")?;

    value
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must start with Bearer")
}

/// Decodes a token signed by the auth service; refresh tokens are refused.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("Refresh token cannot be used for API access".to_string());
    }

    Ok(claims)
}

#[cfg(test)]
pub mod testing {
    use std::time::{SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    use crate::models::{Claims, TokenType};

    fn now() -> usize {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
    }

    /// Signs a token the way the auth service does.
    pub fn token(
        user_id: u64,
        role: u8,
        employee_id: Option<u64>,
        token_type: TokenType,
        secret: &str,
    ) -> String {
        let claims = Claims {
            user_id,
            sub: format!("user{user_id}"),
            role,
            exp: now() + 900,
            jti: Uuid::new_v4().to_string(),
            token_type,
            employee_id,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::token;
    use super::*;

    #[test]
    fn access_token_round_trips_claims() {
        let t = token(5, 3, Some(42), TokenType::Access, "s3cret");
        let claims = verify_access_token(&t, "s3cret").unwrap();
        assert_eq!(claims.user_id, 5);
        assert_eq!(claims.employee_id, Some(42));
    }

    #[test]
    fn refresh_token_is_refused() {
        let t = token(5, 3, Some(42), TokenType::Refresh, "s3cret");
        assert!(verify_access_token(&t, "s3cret").is_err());
    }

    #[test]
    fn bearer_token_requires_scheme_prefix() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err("Missing Authorization header"));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Ok("abc.def"));
    }

    #[test]
    fn wrong_secret_is_refused() {
        let t = token(5, 3, Some(42), TokenType::Access, "s3cret");
        assert!(verify_access_token(&t, "other").is_err());
    }
}
