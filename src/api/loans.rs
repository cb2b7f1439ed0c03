//! Loan management and notification endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, ExtendLoan, LoanDetails},
    services::notifications::{ReminderOutcome, SweepSummary},
};

/// Loan response with computed due date
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Loan ID
    pub id: i32,
    /// Due date (ISO 8601 date)
    pub due_date: NaiveDate,
    /// Status message
    pub message: String,
}

/// Return response with loan details
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Loan details
    pub loan: LoanDetails,
}

/// Reminder outcome reported as a status string
#[derive(Serialize, ToSchema)]
pub struct ReminderResponse {
    /// One of "sent", "not_found", "already_returned"
    pub status: String,
    /// Human-readable detail
    pub detail: String,
}

/// Get loans for a specific member
#[utoipa::path(
    get,
    path = "/members/{id}/loans",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member's loans", body = Vec<LoanDetails>),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member_loans(
    State(state): State<crate::AppState>,
    Path(member_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.get_member_loans(member_id).await?;
    Ok(Json(loans))
}

/// Get a loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan with book and member expanded", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get_loan(loan_id).await?;
    Ok(Json(loan))
}

/// Create a new loan (borrow a book)
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 404, description = "Book or member not found"),
        (status = 409, description = "No available copies")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let (loan_id, due_date) = state.services.loans.create_loan(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            id: loan_id,
            due_date,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state.services.loans.return_loan(loan_id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        loan,
    }))
}

/// Extend a loan's due date by 1 to 30 days
#[utoipa::path(
    post,
    path = "/loans/{id}/extend",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = ExtendLoan,
    responses(
        (status = 200, description = "Due date extended", body = LoanResponse),
        (status = 400, description = "additional_days out of range"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn extend_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
    Json(request): Json<ExtendLoan>,
) -> AppResult<Json<LoanResponse>> {
    let additional_days = request.additional_days;
    let due_date = state.services.loans.extend_loan(loan_id, request).await?;

    Ok(Json(LoanResponse {
        id: loan_id,
        due_date,
        message: format!("Due date extended by {} days", additional_days),
    }))
}

/// Send a reminder email for a specific loan.
///
/// Missing or already-returned loans are reported as a status, not an
/// error; a delivery failure surfaces as 502.
#[utoipa::path(
    post,
    path = "/loans/{id}/remind",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Reminder outcome", body = ReminderResponse),
        (status = 502, description = "Email delivery failed")
    )
)]
pub async fn remind_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReminderResponse>> {
    let outcome = state.services.notifications.send_reminder(loan_id).await?;

    let response = match outcome {
        ReminderOutcome::Sent { recipient } => ReminderResponse {
            status: "sent".to_string(),
            detail: format!("Reminder sent to {}", recipient),
        },
        ReminderOutcome::NotFound => ReminderResponse {
            status: "not_found".to_string(),
            detail: format!("Loan with id {} not found", loan_id),
        },
        ReminderOutcome::AlreadyReturned => ReminderResponse {
            status: "already_returned".to_string(),
            detail: "Loan already returned".to_string(),
        },
    };

    Ok(Json(response))
}

/// Run the overdue sweep now
#[utoipa::path(
    post,
    path = "/loans/sweep",
    tag = "loans",
    responses(
        (status = 200, description = "Sweep summary", body = SweepSummary)
    )
)]
pub async fn sweep_overdue(
    State(state): State<crate::AppState>,
) -> AppResult<Json<SweepSummary>> {
    let summary = state.services.notifications.sweep_overdue().await?;
    Ok(Json(summary))
}
