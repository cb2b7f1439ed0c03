//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub lastname: String,
    pub firstname: Option<String>,
    pub bio: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuthor {
    pub lastname: String,
    pub firstname: Option<String>,
    pub bio: Option<String>,
}

/// Update author request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAuthor {
    pub lastname: Option<String>,
    pub firstname: Option<String>,
    pub bio: Option<String>,
}
