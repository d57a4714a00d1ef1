// ==================== LIST MANAGEMENT ====================
// CRUD over user-owned lists. Every operation runs with a verified
// identity from the auth middleware and re-checks ownership against the
// persisted `creator` field. Create and delete touch both the List and
// its owner's `lists` array, so they run inside a multi-document
// transaction: neither side is ever visible without the other.

use crate::{
    database::{MongoDB, LISTS_COLLECTION, USERS_COLLECTION},
    models::{List, User},
    utils::ApiError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde::Serialize;
use std::collections::HashMap;

// ==================== RESPONSE MODELS ====================

/// Wire view of a List: hex-string ids, never raw BSON.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ListView {
    pub id: String,
    pub title: String,
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<serde_json::Value>,
    pub creator: String,
}

fn to_view(list: List) -> Result<ListView, ApiError> {
    let id = list
        .id
        .ok_or_else(|| ApiError::Internal("Something went wrong, please try again.".to_string()))?;
    Ok(ListView {
        id: id.to_hex(),
        title: list.title,
        items: list.items,
        creator: list.creator.to_hex(),
    })
}

// ==================== VALIDATION & LOOKUP HELPERS ====================

fn require_title(title: Option<String>) -> Result<String, ApiError> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("Please add a title to your request body.".to_string())
        })
}

/// Caller id comes from a verified token; if it does not parse as an
/// ObjectId the token was minted for an identity we never issued.
fn parse_caller_id(user_id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(user_id)
        .map_err(|_| ApiError::Unauthorized("You are not authorized.".to_string()))
}

/// An unparseable path id can reference nothing, so it reads as absent.
fn parse_list_id(list_id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(list_id)
        .map_err(|_| ApiError::NotFound(format!("Could not find a list with id: {}", list_id)))
}

async fn find_list(db: &MongoDB, list_id: &str) -> Result<List, ApiError> {
    let list_oid = parse_list_id(list_id)?;
    db.collection::<List>(LISTS_COLLECTION)
        .find_one(doc! { "_id": list_oid })
        .await
        .map_err(|e| {
            log::error!("❌ Database error fetching list {}: {}", list_id, e);
            ApiError::Internal("Something went wrong, could not find a list.".to_string())
        })?
        .ok_or_else(|| ApiError::NotFound(format!("Could not find a list with id: {}", list_id)))
}

// ==================== TRANSACTIONAL DUAL-WRITES ====================

/// Insert the List and append its id to `owner.lists` as one transaction.
/// The owner update must match exactly one document; anything else (owner
/// vanished between lookup and commit) aborts so no orphan List survives.
async fn create_list_txn(db: &MongoDB, new_list: &List, owner: ObjectId) -> Result<(), String> {
    let list_id = new_list.id.ok_or_else(|| "new list has no id".to_string())?;

    let lists = db.collection::<List>(LISTS_COLLECTION);
    let users = db.collection::<User>(USERS_COLLECTION);

    let mut session = db
        .client()
        .start_session()
        .await
        .map_err(|e| format!("failed to start session: {}", e))?;
    session
        .start_transaction()
        .await
        .map_err(|e| format!("failed to start transaction: {}", e))?;

    let dual_write = async {
        lists
            .insert_one(new_list)
            .session(&mut session)
            .await
            .map_err(|e| format!("list insert failed: {}", e))?;
        let updated = users
            .update_one(
                doc! { "_id": owner },
                doc! { "$push": { "lists": list_id } },
            )
            .session(&mut session)
            .await
            .map_err(|e| format!("owner update failed: {}", e))?;
        if updated.matched_count != 1 {
            return Err(format!("owner {} not found", owner.to_hex()));
        }
        Ok(())
    }
    .await;

    match dual_write {
        Ok(()) => session
            .commit_transaction()
            .await
            .map_err(|e| format!("failed to commit: {}", e)),
        Err(e) => {
            let _ = session.abort_transaction().await;
            Err(e)
        }
    }
}

/// Delete the List and pull its id from `owner.lists` as one transaction.
/// Both halves must touch exactly one document; anything else aborts, so
/// the record and the owner's reference stay in step either way.
async fn delete_list_txn(db: &MongoDB, list_id: ObjectId, owner: ObjectId) -> Result<(), String> {
    let lists = db.collection::<List>(LISTS_COLLECTION);
    let users = db.collection::<User>(USERS_COLLECTION);

    let mut session = db
        .client()
        .start_session()
        .await
        .map_err(|e| format!("failed to start session: {}", e))?;
    session
        .start_transaction()
        .await
        .map_err(|e| format!("failed to start transaction: {}", e))?;

    let dual_write = async {
        let deleted = lists
            .delete_one(doc! { "_id": list_id })
            .session(&mut session)
            .await
            .map_err(|e| format!("list delete failed: {}", e))?;
        if deleted.deleted_count != 1 {
            return Err(format!("list {} not found", list_id.to_hex()));
        }
        let updated = users
            .update_one(
                doc! { "_id": owner },
                doc! { "$pull": { "lists": list_id } },
            )
            .session(&mut session)
            .await
            .map_err(|e| format!("owner update failed: {}", e))?;
        if updated.matched_count != 1 {
            return Err(format!("owner {} not found", owner.to_hex()));
        }
        Ok(())
    }
    .await;

    match dual_write {
        Ok(()) => session
            .commit_transaction()
            .await
            .map_err(|e| format!("failed to commit: {}", e)),
        Err(e) => {
            let _ = session.abort_transaction().await;
            Err(e)
        }
    }
}

// ==================== SERVICE FUNCTIONS ====================

/// GET /api/lists - all lists owned by the caller, in creation order
pub async fn get_lists(db: &MongoDB, user_id: &str) -> Result<Vec<ListView>, ApiError> {
    let caller = parse_caller_id(user_id)?;

    let users = db.collection::<User>(USERS_COLLECTION);
    let user = users
        .find_one(doc! { "_id": caller })
        .await
        .map_err(|e| {
            log::error!("❌ Database error fetching user {}: {}", user_id, e);
            ApiError::Internal("Something went wrong, please try again later.".to_string())
        })?
        .ok_or_else(|| {
            ApiError::NotFound("Could not find lists for the provided user id.".to_string())
        })?;

    if user.lists.is_empty() {
        return Ok(vec![]);
    }

    let lists = db.collection::<List>(LISTS_COLLECTION);
    let mut cursor = lists
        .find(doc! { "_id": { "$in": user.lists.clone() } })
        .await
        .map_err(|e| {
            log::error!("❌ Database error fetching lists for {}: {}", user_id, e);
            ApiError::Internal("Something went wrong, please try again later.".to_string())
        })?;

    let mut by_id: HashMap<ObjectId, List> = HashMap::new();
    while let Some(result) = cursor.next().await {
        let list = result.map_err(|e| {
            log::error!("❌ Cursor error fetching lists for {}: {}", user_id, e);
            ApiError::Internal("Something went wrong, please try again later.".to_string())
        })?;
        if let Some(id) = list.id {
            by_id.insert(id, list);
        }
    }

    // Hydrate in the stored reference order, not the query's return order
    let mut views = Vec::with_capacity(user.lists.len());
    for id in &user.lists {
        match by_id.remove(id) {
            Some(list) => views.push(to_view(list)?),
            // Should be unreachable: the dual-write keeps both sides in step
            None => log::warn!(
                "⚠️ User {} references missing list {}",
                user_id,
                id.to_hex()
            ),
        }
    }

    Ok(views)
}

/// GET /api/lists/{listId}
pub async fn get_list(db: &MongoDB, user_id: &str, list_id: &str) -> Result<ListView, ApiError> {
    let caller = parse_caller_id(user_id)?;
    let list = find_list(db, list_id).await?;

    if list.creator != caller {
        return Err(ApiError::Forbidden(
            "You are not authorized to view this list.".to_string(),
        ));
    }

    to_view(list)
}

/// POST /api/lists - create a list and append it to the owner's `lists`,
/// as a single all-or-nothing transaction.
pub async fn create_list(
    db: &MongoDB,
    user_id: &str,
    title: Option<String>,
) -> Result<ListView, ApiError> {
    let title = require_title(title)?;
    let caller = parse_caller_id(user_id)?;

    let users = db.collection::<User>(USERS_COLLECTION);
    let user = users
        .find_one(doc! { "_id": caller })
        .await
        .map_err(|e| {
            log::error!("❌ Database error fetching user {}: {}", user_id, e);
            ApiError::Internal("Creating list failed, please try again.".to_string())
        })?;

    if user.is_none() {
        return Err(ApiError::NotFound(
            "Could not find user for the provided id.".to_string(),
        ));
    }

    let new_list = List {
        id: Some(ObjectId::new()),
        title,
        items: vec![],
        creator: caller,
    };

    create_list_txn(db, &new_list, caller).await.map_err(|e| {
        log::error!("❌ Create transaction failed, aborted: {}", e);
        ApiError::Internal("Creating list failed, please try again.".to_string())
    })?;

    to_view(new_list)
}

/// PATCH /api/lists/{listId} - overwrite title and items in place.
/// Single-document write, no cascading fields change, so no transaction.
pub async fn update_list(
    db: &MongoDB,
    user_id: &str,
    list_id: &str,
    title: Option<String>,
    items: Option<Vec<serde_json::Value>>,
) -> Result<ListView, ApiError> {
    let title = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    let (title, items) = match (title, items) {
        (Some(title), Some(items)) => (title, items),
        _ => {
            return Err(ApiError::Validation(
                "Please add title and items (array) to your request body.".to_string(),
            ))
        }
    };

    let caller = parse_caller_id(user_id)?;
    let mut list = find_list(db, list_id).await?;

    if list.creator != caller {
        return Err(ApiError::Forbidden(
            "You are not authorized to update this list.".to_string(),
        ));
    }

    let items_bson = mongodb::bson::to_bson(&items).map_err(|e| {
        log::error!("❌ Failed to encode items for list {}: {}", list_id, e);
        ApiError::Internal("Updating list failed, please try again.".to_string())
    })?;

    db.collection::<List>(LISTS_COLLECTION)
        .update_one(
            doc! { "_id": list.id },
            doc! { "$set": { "title": &title, "items": items_bson } },
        )
        .await
        .map_err(|e| {
            log::error!("❌ Database error updating list {}: {}", list_id, e);
            ApiError::Internal("Updating list failed, please try again.".to_string())
        })?;

    list.title = title;
    list.items = items;
    to_view(list)
}

/// DELETE /api/lists/{listId} - remove a list and its reference from the
/// owner's `lists`, as a single all-or-nothing transaction.
pub async fn delete_list(db: &MongoDB, user_id: &str, list_id: &str) -> Result<(), ApiError> {
    let caller = parse_caller_id(user_id)?;
    let list = find_list(db, list_id).await?;

    if list.creator != caller {
        return Err(ApiError::Forbidden(
            "You are not authorized to delete this list.".to_string(),
        ));
    }

    let users = db.collection::<User>(USERS_COLLECTION);
    let owner = users
        .find_one(doc! { "_id": list.creator })
        .await
        .map_err(|e| {
            log::error!("❌ Database error fetching owner of list {}: {}", list_id, e);
            ApiError::Internal("Could not delete list, please try again.".to_string())
        })?;

    if owner.is_none() {
        log::error!("❌ List {} has no owner document ({})", list_id, list.creator);
        return Err(ApiError::Internal(
            "Could not delete list, please try again.".to_string(),
        ));
    }

    let list_oid = list.id.ok_or_else(|| {
        ApiError::Internal("Could not delete list, please try again.".to_string())
    })?;

    delete_list_txn(db, list_oid, list.creator).await.map_err(|e| {
        log::error!("❌ Delete transaction failed, aborted: {}", e);
        ApiError::Internal("Could not delete list, please try again.".to_string())
    })?;

    Ok(())
}
