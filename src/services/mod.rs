pub mod auth_service;
pub mod list_service;
pub mod user_service;
