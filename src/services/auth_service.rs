use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,   // user id (hex ObjectId)
    pub email: String,
    pub iat: usize,    // issued at
    pub exp: usize,    // expiration
    pub jti: String,   // JWT ID
    pub aud: String,   // audience
    pub iss: String,   // issuer
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "lists-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "lists-api".to_string())
}

/// Generate a signed, time-bound identity token carrying `{userId, email}`.
pub fn generate_jwt(user_id: &str, email: &str) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Verify signature, expiry, issuer and audience; returns the claims.
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_roundtrip() {
        let token = generate_jwt("64a1f0b2c3d4e5f6a7b8c9d0", "alice@example.com").unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, "64a1f0b2c3d4e5f6a7b8c9d0");
        assert_eq!(claims.email, "alice@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token").is_err());
        assert!(verify_token("").is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = generate_jwt("64a1f0b2c3d4e5f6a7b8c9d0", "alice@example.com").unwrap();
        let tampered = format!("{}xx", token);
        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Encode claims that expired an hour ago with the same secret
        let iat = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        let exp = (Utc::now() - Duration::hours(1)).timestamp() as usize;
        let claims = Claims {
            sub: "64a1f0b2c3d4e5f6a7b8c9d0".to_string(),
            email: "alice@example.com".to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: get_jwt_issuer(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }
}
