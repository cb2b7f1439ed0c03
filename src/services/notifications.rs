//! Loan notification workflow
//!
//! Three entry points: a notice when a loan is created, an on-demand
//! reminder for a single loan, and the periodic overdue sweep. All
//! messages go to the member's linked user email, which is the single
//! canonical notification address.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::loan::LoanDetails,
    repository::Repository,
    services::email::Mailer,
};

/// Result of a single-loan notification attempt. A missing or already
/// returned loan is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    Sent { recipient: String },
    NotFound,
    AlreadyReturned,
}

/// Counts for one overdue sweep: loans scanned vs reminders delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepSummary {
    pub scanned: usize,
    pub sent: usize,
}

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
    mailer: Arc<dyn Mailer>,
}

impl NotificationsService {
    pub fn new(repository: Repository, mailer: Arc<dyn Mailer>) -> Self {
        Self { repository, mailer }
    }

    /// Send the "loaned successfully" notice for a freshly created loan
    pub async fn notify_loan_created(&self, loan_id: i32) -> AppResult<ReminderOutcome> {
        let loan = match self.repository.loans.get_details(loan_id).await {
            Ok(loan) => loan,
            Err(AppError::NotFound(_)) => {
                tracing::warn!(loan_id, "Loan not found, skipping creation notice");
                return Ok(ReminderOutcome::NotFound);
            }
            Err(e) => return Err(e),
        };

        let (subject, body) = loan_created_message(&loan);
        let recipient = loan.member.user.email.clone();
        self.mailer.send(&recipient, &subject, &body).await?;

        tracing::info!(loan_id, recipient = %recipient, "Loan creation notice sent");
        Ok(ReminderOutcome::Sent { recipient })
    }

    /// Send a reminder for a specific loan. Delivery failures propagate:
    /// this is a single unit of work with no batch to protect.
    pub async fn send_reminder(&self, loan_id: i32) -> AppResult<ReminderOutcome> {
        let loan = match self.repository.loans.get_details(loan_id).await {
            Ok(loan) => loan,
            Err(AppError::NotFound(_)) => {
                tracing::warn!(loan_id, "Loan not found, no reminder sent");
                return Ok(ReminderOutcome::NotFound);
            }
            Err(e) => return Err(e),
        };

        try_send_reminder(self.mailer.as_ref(), &loan).await
    }

    /// Scan all active loans for overdue ones and send each member a
    /// reminder. Per-loan delivery failures are logged and counted as
    /// not-sent; they never abort the rest of the sweep.
    pub async fn sweep_overdue(&self) -> AppResult<SweepSummary> {
        let today = Utc::now().date_naive();
        self.sweep_overdue_at(today).await
    }

    /// Sweep with an explicit reference date
    pub async fn sweep_overdue_at(&self, today: NaiveDate) -> AppResult<SweepSummary> {
        let overdue = self.repository.loans.find_overdue(today).await?;
        let summary = deliver_overdue_reminders(self.mailer.as_ref(), &overdue).await;

        tracing::info!(
            scanned = summary.scanned,
            sent = summary.sent,
            "Overdue sweep complete"
        );
        Ok(summary)
    }
}

async fn try_send_reminder(mailer: &dyn Mailer, loan: &LoanDetails) -> AppResult<ReminderOutcome> {
    if loan.is_returned {
        tracing::info!(loan_id = loan.id, "Loan already returned, no reminder sent");
        return Ok(ReminderOutcome::AlreadyReturned);
    }

    let (subject, body) = reminder_message(loan);
    let recipient = loan.member.user.email.clone();
    mailer.send(&recipient, &subject, &body).await?;

    tracing::info!(loan_id = loan.id, recipient = %recipient, "Reminder sent");
    Ok(ReminderOutcome::Sent { recipient })
}

async fn deliver_overdue_reminders(mailer: &dyn Mailer, loans: &[LoanDetails]) -> SweepSummary {
    let mut sent = 0;

    for loan in loans {
        let (subject, body) = overdue_message(loan);
        match mailer.send(&loan.member.user.email, &subject, &body).await {
            Ok(()) => sent += 1,
            Err(e) => {
                tracing::warn!(
                    loan_id = loan.id,
                    recipient = %loan.member.user.email,
                    "Failed to send overdue reminder: {}",
                    e
                );
            }
        }
    }

    SweepSummary {
        scanned: loans.len(),
        sent,
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn loan_created_message(loan: &LoanDetails) -> (String, String) {
    let subject = "Book Loaned Successfully".to_string();
    let body = format!(
        "Hello {username},\n\n\
         You have successfully loaned \"{title}\".\n\
         Please return it by {due_date}.\n",
        username = loan.member.user.username,
        title = loan.book.title,
        due_date = format_date(loan.due_date),
    );
    (subject, body)
}

fn reminder_message(loan: &LoanDetails) -> (String, String) {
    let subject = format!("Loan Reminder: {}", loan.book.title);
    let body = format!(
        "Dear {username},\n\n\
         This is a reminder about your current book loan:\n\n\
         Book Title: {title}\n\
         Loan Date: {loan_date}\n\
         Due Date: {due_date}\n\n\
         Please return the book by the due date or extend your loan period if needed.\n\n\
         Thank you,\n\
         Libris Library",
        username = loan.member.user.username,
        title = loan.book.title,
        loan_date = loan.loan_date,
        due_date = format_date(loan.due_date),
    );
    (subject, body)
}

fn overdue_message(loan: &LoanDetails) -> (String, String) {
    let subject = format!("Overdue Book Reminder: {}", loan.book.title);
    let body = format!(
        "Dear {username},\n\n\
         This is a friendly reminder that the following book is overdue:\n\n\
         Book Title: {title}\n\
         Loan Date: {loan_date}\n\
         Due Date: {due_date}\n\
         Days Overdue: {days_overdue}\n\n\
         Please return the book as soon as possible to avoid any late fees.\n\n\
         If you need to extend your loan period, please use our loan extension \
         feature before the due date.\n\n\
         Thank you for your cooperation.\n\n\
         Best regards,\n\
         Libris Library",
        username = loan.member.user.username,
        title = loan.book.title,
        loan_date = loan.loan_date,
        due_date = format_date(loan.due_date),
        days_overdue = loan.days_overdue,
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        author::Author,
        book::BookDetails,
        loan::{Loan, LoanDetails},
        member::MemberDetails,
        user::User,
    };
    use crate::services::email::MockMailer;
    use chrono::Duration;

    fn loan_details(id: i32, email: &str, days_past_due: i64, is_returned: bool) -> LoanDetails {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let loan = Loan {
            id,
            book_id: 10,
            member_id: 20,
            loan_date: today - Duration::days(days_past_due + 14),
            due_date: Some(today - Duration::days(days_past_due)),
            return_date: is_returned.then_some(today),
            is_returned,
        };
        let book = BookDetails {
            id: 10,
            title: "Dune".to_string(),
            author: Author {
                id: 1,
                lastname: "Herbert".to_string(),
                firstname: Some("Frank".to_string()),
                bio: None,
            },
            isbn: "9780441172719".to_string(),
            genre: Some("Science Fiction".to_string()),
            available_copies: 0,
        };
        let member = MemberDetails {
            id: 20,
            user: User {
                id: 30,
                username: "paul".to_string(),
                email: email.to_string(),
            },
            membership_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        LoanDetails::from_parts(loan, book, member, today)
    }

    #[tokio::test]
    async fn test_sweep_isolates_delivery_failures() {
        let loans = vec![
            loan_details(1, "works@example.org", 3, false),
            loan_details(2, "broken@example.org", 7, false),
        ];

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(2).returning(|to, _, _| {
            if to == "broken@example.org" {
                Err(AppError::EmailDelivery("connection refused".to_string()))
            } else {
                Ok(())
            }
        });

        let summary = deliver_overdue_reminders(&mailer, &loans).await;
        assert_eq!(summary, SweepSummary { scanned: 2, sent: 1 });
    }

    #[tokio::test]
    async fn test_sweep_empty_set() {
        let mailer = MockMailer::new();
        let summary = deliver_overdue_reminders(&mailer, &[]).await;
        assert_eq!(summary, SweepSummary { scanned: 0, sent: 0 });
    }

    #[tokio::test]
    async fn test_reminder_skips_returned_loan() {
        let loan = loan_details(1, "paul@example.org", 3, true);

        // No delivery may be attempted for a returned loan
        let mailer = MockMailer::new();

        let outcome = try_send_reminder(&mailer, &loan).await.unwrap();
        assert_eq!(outcome, ReminderOutcome::AlreadyReturned);
    }

    #[tokio::test]
    async fn test_reminder_sends_to_member_user_email() {
        let loan = loan_details(1, "paul@example.org", 3, false);

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|to, subject, _| to == "paul@example.org" && subject == "Loan Reminder: Dune")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let outcome = try_send_reminder(&mailer, &loan).await.unwrap();
        assert_eq!(
            outcome,
            ReminderOutcome::Sent {
                recipient: "paul@example.org".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_reminder_delivery_failure_propagates() {
        let loan = loan_details(1, "paul@example.org", 3, false);

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_, _, _| Err(AppError::EmailDelivery("timeout".to_string())));

        let result = try_send_reminder(&mailer, &loan).await;
        assert!(matches!(result, Err(AppError::EmailDelivery(_))));
    }

    #[test]
    fn test_overdue_message_contains_days_overdue() {
        let loan = loan_details(1, "paul@example.org", 7, false);
        let (subject, body) = overdue_message(&loan);

        assert_eq!(subject, "Overdue Book Reminder: Dune");
        assert!(body.contains("Days Overdue: 7"));
        assert!(body.contains("Book Title: Dune"));
        assert!(body.contains("Dear paul"));
    }

    #[test]
    fn test_created_message_names_book_and_due_date() {
        let loan = loan_details(1, "paul@example.org", -5, false);
        let (subject, body) = loan_created_message(&loan);

        assert_eq!(subject, "Book Loaned Successfully");
        assert!(body.contains("\"Dune\""));
        assert!(body.contains("2025-06-20"));
    }
}
