//! Members repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        member::{CreateMember, Member, MemberDetails},
        user::User,
    },
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

const MEMBER_DETAILS_SELECT: &str = r#"
    SELECT m.id, m.membership_date,
           u.id AS user_id, u.username AS user_username, u.email AS user_email
    FROM members m
    JOIN users u ON m.user_id = u.id
"#;

fn details_from_row(row: &sqlx::postgres::PgRow) -> MemberDetails {
    MemberDetails {
        id: row.get("id"),
        user: User {
            id: row.get("user_id"),
            username: row.get("user_username"),
            email: row.get("user_email"),
        },
        membership_date: row.get("membership_date"),
    }
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all members with their user identities expanded
    pub async fn list(&self) -> AppResult<Vec<MemberDetails>> {
        let rows = sqlx::query(&format!("{} ORDER BY u.username", MEMBER_DETAILS_SELECT))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Get member by ID with its user identity expanded
    pub async fn get_details(&self, id: i32) -> AppResult<MemberDetails> {
        let row = sqlx::query(&format!("{} WHERE m.id = $1", MEMBER_DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))?;

        Ok(details_from_row(&row))
    }

    /// Create a new member
    pub async fn create(&self, member: &CreateMember) -> AppResult<MemberDetails> {
        let membership_date = member
            .membership_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO members (user_id, membership_date)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(member.user_id)
        .bind(membership_date)
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }
}
