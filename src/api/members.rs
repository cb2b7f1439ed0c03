//! Member management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::member::{CreateMember, MemberDetails},
};

/// List all members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    responses(
        (status = 200, description = "All members with users expanded", body = Vec<MemberDetails>)
    )
)]
pub async fn list_members(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<MemberDetails>>> {
    let members = state.services.members.list_members().await?;
    Ok(Json(members))
}

/// Get a member by ID
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member with user expanded", body = MemberDetails),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MemberDetails>> {
    let member = state.services.members.get_member(id).await?;
    Ok(Json(member))
}

/// Create a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = MemberDetails),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<MemberDetails>)> {
    let member = state.services.members.create_member(request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}
