use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Documento da collection "users".
///
/// `lists` holds the ids of every List this user created, in creation
/// order. The create/delete paths in `list_service` are the only code
/// allowed to mutate it, always inside the same transaction that touches
/// the List document itself.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// bcrypt hash, never the plain password
    pub password: String,
    #[serde(default)]
    pub lists: Vec<ObjectId>,
}
