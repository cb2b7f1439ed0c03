//! Member management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        member::{CreateMember, MemberDetails},
        user::{CreateUser, User},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository.users.create(&user).await
    }

    pub async fn list_members(&self) -> AppResult<Vec<MemberDetails>> {
        self.repository.members.list().await
    }

    pub async fn get_member(&self, id: i32) -> AppResult<MemberDetails> {
        self.repository.members.get_details(id).await
    }

    /// Create a member; the referenced user must exist
    pub async fn create_member(&self, member: CreateMember) -> AppResult<MemberDetails> {
        self.repository.users.get_by_id(member.user_id).await?;
        self.repository.members.create(&member).await
    }
}
