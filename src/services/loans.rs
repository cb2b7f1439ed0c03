//! Loan management service

use chrono::NaiveDate;
use validator::Validate;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    jobs::{JobQueue, NotificationJob},
    models::loan::{CreateLoan, ExtendLoan, LoanDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
    jobs: JobQueue,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig, jobs: JobQueue) -> Self {
        Self {
            repository,
            config,
            jobs,
        }
    }

    /// Get a single loan with book and member expanded
    pub async fn get_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(loan_id).await
    }

    /// Get loans for a member
    pub async fn get_member_loans(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify member exists
        self.repository.members.get_by_id(member_id).await?;
        self.repository.loans.get_member_loans(member_id).await
    }

    /// Create a new loan and queue the creation notice
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<(i32, NaiveDate)> {
        // Verify member exists
        self.repository.members.get_by_id(loan.member_id).await?;

        let (loan_id, due_date) = self
            .repository
            .loans
            .create(&loan, self.config.loan_period_days)
            .await?;

        // The loan row exists at this point; a closed queue loses the
        // notice, not the loan
        if let Err(e) = self.jobs.submit(NotificationJob::LoanCreated(loan_id)) {
            tracing::warn!(loan_id, "Could not queue loan creation notice: {}", e);
        }

        Ok((loan_id, due_date))
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.return_loan(loan_id).await
    }

    /// Extend a loan's due date. Bounds are checked before any state
    /// change; the repository applies the shift only after validation.
    pub async fn extend_loan(&self, loan_id: i32, request: ExtendLoan) -> AppResult<NaiveDate> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository
            .loans
            .extend_loan(loan_id, request.additional_days)
            .await
    }
}
