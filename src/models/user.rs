use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document stored in the `users` collection. Field names match the
/// existing collection, including the capitalised `Blocked`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Absent on records created before the field existed; backfilled to
    /// false on the next sign-in, never overwritten once set.
    #[serde(rename = "Blocked", skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
}

/// Identity handed to consumers after sign-in. `is_admin` is derived from
/// the allow-list at sign-in time and never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct SessionIdentity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: String,
    pub blocked: bool,
    pub is_admin: bool,
}
