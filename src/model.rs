use chrono::{DateTime, Utc};

// Data model representing a user account
#[derive(Debug, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) name: String,
    // bcrypt hash, never serialized into responses
    #[serde(skip_serializing)]
    pub(crate) password_hash: String,
}

// Data model representing a Todo item
#[derive(Debug, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) completed: bool,
    pub(crate) user_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

// Identity reconstituted from a verified session token; the auth
// middleware inserts this into request extensions
#[derive(Debug, Clone, serde::Serialize)]
pub struct CurrentUser {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) name: String,
}
