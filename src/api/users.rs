use crate::{
    database::MongoDB,
    services::user_service::{self, AuthResponse, LoginRequest, SignupRequest},
};
use actix_web::{web, HttpResponse, Responder, ResponseError};

/// GET /api/users/test - liveness probe for the users routes
#[utoipa::path(
    get,
    path = "/api/users/test",
    tag = "Users",
    responses(
        (status = 200, description = "Users routes are up")
    )
)]
pub async fn test() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Users routes work!",
        "service": "lists-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created, token issued", body = AuthResponse),
        (status = 422, description = "Invalid input or email already registered")
    )
)]
pub async fn signup(
    db: web::Data<MongoDB>,
    request: web::Json<SignupRequest>,
) -> impl Responder {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /users/signup - email: {}", email);

    match user_service::signup(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Signup successful: {}", response.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token issued", body = AuthResponse),
        (status = 403, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<LoginRequest>,
) -> impl Responder {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /users/login - email: {}", email);

    match user_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", response.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            e.error_response()
        }
    }
}
