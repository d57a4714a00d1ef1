use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lists Service API",
        version = "1.0.0",
        description = "Multi-user list management backend.\n\n**Authentication:** all /api/lists endpoints require a JWT Bearer token obtained from signup or login.",
    ),
    paths(
        // Users
        crate::api::users::test,
        crate::api::users::signup,
        crate::api::users::login,

        // Lists
        crate::api::lists::get_lists,
        crate::api::lists::create_list,
    ),
    components(
        schemas(
            crate::services::user_service::SignupRequest,
            crate::services::user_service::LoginRequest,
            crate::services::user_service::AuthResponse,
            crate::services::list_service::ListView,
            crate::api::lists::CreateListRequest,
            crate::api::lists::UpdateListRequest,
        )
    ),
    tags(
        (name = "Users", description = "Signup and login. Both issue a JWT valid for one hour."),
        (name = "Lists", description = "CRUD over user-owned lists. Every operation checks ownership against the list's creator."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
