mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpResponse, HttpServer,
};
use dotenv::dotenv;
use std::env;
use utils::ApiError;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "message": "Could not find this route."
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Lists Service...");

    // Initialize MongoDB connection before accepting any request
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
            .allowed_headers(vec![
                "Origin",
                "X-Requested-With",
                "Content-Type",
                "Accept",
                "Authorization",
            ])
            .max_age(3600);

        // Malformed JSON bodies surface as 422 with the uniform error body
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            log::warn!("⚠️ Rejected malformed request body: {}", err);
            ApiError::Validation("Invalid request body.".to_string()).into()
        });

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(json_config)
            .wrap(cors)
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Users: signup/login, no auth required
            .service(
                web::scope("/api/users")
                    .route("/test", web::get().to(api::users::test))
                    .route("/signup", web::post().to(api::users::signup))
                    .route("/login", web::post().to(api::users::login)),
            )
            // Lists: CRUD, requires JWT
            .service(
                web::scope("/api/lists")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::get().to(api::lists::get_lists))
                    .route("", web::post().to(api::lists::create_list))
                    .route("/{list_id}", web::get().to(api::lists::get_list))
                    .route("/{list_id}", web::patch().to(api::lists::update_list))
                    .route("/{list_id}", web::delete().to(api::lists::delete_list)),
            )
            // Unmatched routes
            .default_service(web::route().to(not_found))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
