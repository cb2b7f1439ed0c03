//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::Author;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub isbn: String,
    pub genre: Option<String>,
    pub available_copies: i32,
}

/// Book with its author expanded, for read responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author: Author,
    pub isbn: String,
    pub genre: Option<String>,
    pub available_copies: i32,
}

/// Create book request; the author is referenced by bare id on write
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub author_id: i32,
    pub isbn: String,
    pub genre: Option<String>,
    #[validate(range(min = 0, message = "available_copies must not be negative"))]
    pub available_copies: i32,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    #[validate(range(min = 0, message = "available_copies must not be negative"))]
    pub available_copies: Option<i32>,
}
