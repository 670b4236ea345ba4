use serde::{Deserialize, Serialize};

/// A persisted task record. `id` is assigned by the store on creation and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Request body shared by create and update. Updates overwrite both mutable
/// fields wholesale; an omitted `completed` means `false`, not "keep".
#[derive(Debug, Deserialize)]
pub struct TodoPayload {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Confirmation body for deletions.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
