use crate::{
    database::MongoDB,
    services::auth_service::Claims,
    services::list_service::{self, ListView},
};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateListRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateListRequest {
    pub title: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub items: Option<Vec<serde_json::Value>>,
}

/// GET /api/lists - todas as listas do usuário autenticado
#[utoipa::path(
    get,
    path = "/api/lists",
    tag = "Lists",
    responses(
        (status = 200, description = "Owned lists in creation order"),
        (status = 404, description = "No user for the token's id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_lists(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let user_id = &user.sub;
    log::info!("📋 GET /lists - user {}", user_id);

    match list_service::get_lists(&db, user_id).await {
        Ok(lists) => {
            log::info!("✅ Returned {} lists", lists.len());
            HttpResponse::Ok().json(serde_json::json!({ "lists": lists }))
        }
        Err(e) => {
            log::warn!("❌ Failed to fetch lists for {}: {}", user_id, e);
            e.error_response()
        }
    }
}

/// GET /api/lists/{list_id}
pub async fn get_list(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    list_id: web::Path<String>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("📄 GET /lists/{} - user {}", list_id, user_id);

    match list_service::get_list(&db, user_id, &list_id).await {
        Ok(list) => HttpResponse::Ok().json(serde_json::json!({ "list": list })),
        Err(e) => {
            log::warn!("❌ Failed to fetch list {}: {}", list_id, e);
            e.error_response()
        }
    }
}

/// POST /api/lists - cria uma lista e referencia no usuário (transação)
#[utoipa::path(
    post,
    path = "/api/lists",
    tag = "Lists",
    request_body = CreateListRequest,
    responses(
        (status = 201, description = "List created", body = ListView),
        (status = 422, description = "Missing or empty title")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_list(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateListRequest>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("📝 POST /lists - user {}", user_id);

    match list_service::create_list(&db, user_id, request.into_inner().title).await {
        Ok(created) => {
            log::info!("✅ List created: {}", created.id);
            HttpResponse::Created().json(serde_json::json!({ "createdList": created }))
        }
        Err(e) => {
            log::warn!("❌ Failed to create list for {}: {}", user_id, e);
            e.error_response()
        }
    }
}

/// PATCH /api/lists/{list_id}
pub async fn update_list(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    list_id: web::Path<String>,
    request: web::Json<UpdateListRequest>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("🔧 PATCH /lists/{} - user {}", list_id, user_id);

    let request = request.into_inner();
    match list_service::update_list(&db, user_id, &list_id, request.title, request.items).await {
        Ok(updated) => {
            log::info!("✅ List updated: {}", updated.id);
            HttpResponse::Ok().json(serde_json::json!({ "updatedList": updated }))
        }
        Err(e) => {
            log::warn!("❌ Failed to update list {}: {}", list_id, e);
            e.error_response()
        }
    }
}

/// DELETE /api/lists/{list_id}
pub async fn delete_list(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    list_id: web::Path<String>,
) -> impl Responder {
    let user_id = &user.sub;
    log::info!("🗑️  DELETE /lists/{} - user {}", list_id, user_id);

    match list_service::delete_list(&db, user_id, &list_id).await {
        Ok(()) => {
            log::info!("✅ List deleted: {}", list_id);
            HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted list." }))
        }
        Err(e) => {
            log::warn!("❌ Failed to delete list {}: {}", list_id, e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AuthMiddleware;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running (replica set for transactions)
    async fn test_end_to_end_create_list_and_ownership() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/lists-test".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .service(
                    web::scope("/api/users")
                        .route("/signup", web::post().to(crate::api::users::signup)),
                )
                .service(
                    web::scope("/api/lists")
                        .wrap(AuthMiddleware)
                        .route("", web::get().to(get_lists))
                        .route("", web::post().to(create_list))
                        .route("/{list_id}", web::get().to(get_list)),
                ),
        )
        .await;

        // Two independent accounts
        let mut tokens = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/users/signup")
                .set_json(serde_json::json!({
                    "email": format!("user-{}@example.com", uuid::Uuid::new_v4()),
                    "password": "secret",
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: serde_json::Value = test::read_body_json(resp).await;
            tokens.push(body["token"].as_str().unwrap().to_string());
        }

        // User A creates a list
        let req = test::TestRequest::post()
            .uri("/api/lists")
            .insert_header(("Authorization", format!("Bearer {}", tokens[0])))
            .set_json(serde_json::json!({ "title": "Groceries" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["createdList"]["title"], "Groceries");
        assert_eq!(body["createdList"]["items"], serde_json::json!([]));
        let list_id = body["createdList"]["id"].as_str().unwrap().to_string();

        // A sees it in the collection listing
        let req = test::TestRequest::get()
            .uri("/api/lists")
            .insert_header(("Authorization", format!("Bearer {}", tokens[0])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let lists = body["lists"].as_array().unwrap();
        assert!(lists.iter().any(|l| l["id"] == list_id.as_str()));

        // B holds a valid token but does not own the list
        let req = test::TestRequest::get()
            .uri(&format!("/api/lists/{}", list_id))
            .insert_header(("Authorization", format!("Bearer {}", tokens[1])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }
}
