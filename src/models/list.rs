use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Documento da collection "lists".
///
/// Invariant: `creator` always names a User whose `lists` array contains
/// this document's id. Creation and deletion run inside a multi-document
/// transaction to keep both sides in step.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct List {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// Item values are opaque to the backend; only "is a sequence" is enforced
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    /// Immutable after creation
    pub creator: ObjectId,
}
