use crate::{
    database::{MongoDB, USERS_COLLECTION},
    models::User,
    services::auth_service,
    utils::ApiError,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

// ==================== VALIDATION ====================

/// Minimal email shape check: non-empty local part, a domain with at
/// least one dot and no empty labels, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Request-shape validation for both signup and login: email must look
/// like an email, password must be present and non-empty.
fn validate_credentials(
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String), ApiError> {
    let email = email
        .map(str::trim)
        .filter(|e| is_valid_email(e))
        .ok_or_else(|| {
            ApiError::Validation("Invalid inputs passed, please check your data.".to_string())
        })?;

    let password = password.filter(|p| !p.is_empty()).ok_or_else(|| {
        ApiError::Validation("Invalid inputs passed, please check your data.".to_string())
    })?;

    Ok((email.to_string(), password.to_string()))
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /api/users/signup - create a user and issue a token
pub async fn signup(db: &MongoDB, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
    let (email, password) = validate_credentials(
        request.email.as_deref(),
        request.password.as_deref(),
    )?;

    let collection = db.collection::<User>(USERS_COLLECTION);

    let existing = collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| {
            log::error!("❌ Database error during signup lookup: {}", e);
            ApiError::Internal("Signing up failed, please try again later.".to_string())
        })?;

    if existing.is_some() {
        return Err(ApiError::Validation(
            "User exists already, please login instead.".to_string(),
        ));
    }

    let hashed_password = hash(&password, DEFAULT_COST).map_err(|e| {
        log::error!("❌ Failed to hash password: {}", e);
        ApiError::Internal("Could not create user, please try again.".to_string())
    })?;

    let new_user = User {
        id: None,
        email: email.clone(),
        password: hashed_password,
        lists: vec![],
    };

    let insert_result = collection.insert_one(&new_user).await.map_err(|e| {
        log::error!("❌ Failed to insert user: {}", e);
        ApiError::Internal("Signing up failed, please try again later.".to_string())
    })?;

    let user_id = insert_result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| ApiError::Internal("Signing up failed, please try again later.".to_string()))?
        .to_hex();

    let token = auth_service::generate_jwt(&user_id, &email).map_err(|e| {
        log::error!("❌ Failed to issue token: {}", e);
        ApiError::Internal("Signing up failed, please try again later.".to_string())
    })?;

    log::info!("✅ User registered: {}", email);

    Ok(AuthResponse { user_id, email, token })
}

/// POST /api/users/login - verify credentials and issue a token
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    let (email, password) = validate_credentials(
        request.email.as_deref(),
        request.password.as_deref(),
    )?;

    let collection = db.collection::<User>(USERS_COLLECTION);

    let user = collection
        .find_one(doc! { "email": &email })
        .await
        .map_err(|e| {
            log::error!("❌ Database error during login lookup: {}", e);
            ApiError::Internal("Logging in failed, please try again later.".to_string())
        })?
        .ok_or_else(|| {
            ApiError::Unauthorized("Invalid credentials, could not log you in.".to_string())
        })?;

    let valid = verify(&password, &user.password).map_err(|e| {
        log::error!("❌ Password verification error: {}", e);
        ApiError::Internal("Logging in failed, please try again later.".to_string())
    })?;

    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid credentials, could not log you in.".to_string(),
        ));
    }

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("Logging in failed, please try again later.".to_string()))?
        .to_hex();

    let token = auth_service::generate_jwt(&user_id, &user.email).map_err(|e| {
        log::error!("❌ Failed to issue token: {}", e);
        ApiError::Internal("Logging in failed, please try again later.".to_string())
    })?;

    Ok(AuthResponse {
        user_id,
        email: user.email,
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credentials_accepts_valid_input() {
        let result = validate_credentials(Some("alice@example.com"), Some("secret"));
        assert!(result.is_ok());
        let (email, password) = result.unwrap();
        assert_eq!(email, "alice@example.com");
        assert_eq!(password, "secret");
    }

    #[test]
    fn test_validate_credentials_rejects_missing_fields() {
        assert!(validate_credentials(None, Some("secret")).is_err());
        assert!(validate_credentials(Some("alice@example.com"), None).is_err());
        assert!(validate_credentials(None, None).is_err());
    }

    #[test]
    fn test_validate_credentials_rejects_bad_shapes() {
        // not an email
        assert!(validate_credentials(Some("alice"), Some("secret")).is_err());
        // empty fields
        assert!(validate_credentials(Some(""), Some("secret")).is_err());
        assert!(validate_credentials(Some("alice@example.com"), Some("")).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co"));

        // no domain dot
        assert!(!is_valid_email("alice@example"));
        // missing local part or domain
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@"));
        // empty domain labels
        assert!(!is_valid_email("alice@.com"));
        assert!(!is_valid_email("alice@example."));
        // whitespace
        assert!(!is_valid_email("a lice@example.com"));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_signup_then_login_roundtrip() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/lists-test".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        let email = format!("user-{}@example.com", uuid::Uuid::new_v4());
        let signup_req = SignupRequest {
            email: Some(email.clone()),
            password: Some("secret".to_string()),
        };
        let signed_up = signup(&db, &signup_req).await.unwrap();
        assert_eq!(signed_up.email, email);

        let login_req = LoginRequest {
            email: Some(email.clone()),
            password: Some("secret".to_string()),
        };
        let logged_in = login(&db, &login_req).await.unwrap();
        assert_eq!(logged_in.user_id, signed_up.user_id);

        // The issued token is accepted by the verifier the middleware uses
        let claims = crate::services::auth_service::verify_token(&logged_in.token).unwrap();
        assert_eq!(claims.sub, signed_up.user_id);
        assert_eq!(claims.email, email);

        // Duplicate signup is rejected
        assert!(signup(&db, &signup_req).await.is_err());

        // Wrong password is rejected
        let bad_login = LoginRequest {
            email: Some(email),
            password: Some("wrong".to_string()),
        };
        assert!(login(&db, &bad_login).await.is_err());
    }
}
