//! Member model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::user::User;

/// Member model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: i32,
    pub user_id: i32,
    pub membership_date: NaiveDate,
}

/// Member with its user identity expanded, for read responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberDetails {
    pub id: i32,
    pub user: User,
    pub membership_date: NaiveDate,
}

/// Create member request; the user is referenced by bare id on write
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMember {
    pub user_id: i32,
    /// Defaults to today when omitted
    pub membership_date: Option<NaiveDate>,
}
