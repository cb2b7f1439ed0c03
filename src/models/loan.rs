//! Loan model, derived overdue state, and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookDetails;
use super::member::MemberDetails;

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub is_returned: bool,
}

/// Loan with book and member expanded and overdue state computed.
///
/// `is_overdue` and `days_overdue` are recomputed from the stored fields
/// every time a `LoanDetails` is built; they are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub book: BookDetails,
    pub member: MemberDetails,
    pub loan_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub is_returned: bool,
    pub is_overdue: bool,
    pub days_overdue: i64,
}

impl LoanDetails {
    /// Assemble the read representation, deriving overdue state for `today`.
    /// A loan without a due date is never reported overdue.
    pub fn from_parts(
        loan: Loan,
        book: BookDetails,
        member: MemberDetails,
        today: NaiveDate,
    ) -> Self {
        let overdue = loan
            .due_date
            .map(|d| is_overdue(d, loan.is_returned, today))
            .unwrap_or(false);
        let days = loan
            .due_date
            .map(|d| days_overdue(d, loan.is_returned, today))
            .unwrap_or(0);

        Self {
            id: loan.id,
            book,
            member,
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            is_returned: loan.is_returned,
            is_overdue: overdue,
            days_overdue: days,
        }
    }
}

/// Create loan request; book and member are referenced by bare id on write.
/// `loan_date` and `due_date` are computed at creation and read-only.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub book_id: i32,
    pub member_id: i32,
}

/// Extend-due-date payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExtendLoan {
    #[validate(range(
        min = 1,
        max = 30,
        message = "additional_days must be between 1 and 30"
    ))]
    pub additional_days: i64,
}

/// A loan is overdue when it is still out and its due date is strictly
/// before `today`. Due today means not overdue.
pub fn is_overdue(due_date: NaiveDate, is_returned: bool, today: NaiveDate) -> bool {
    !is_returned && due_date < today
}

/// Whole days past the due date, 0 when the loan is not overdue
pub fn days_overdue(due_date: NaiveDate, is_returned: bool, today: NaiveDate) -> i64 {
    if is_overdue(due_date, is_returned, today) {
        (today - due_date).num_days()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::author::Author;
    use crate::models::user::User;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_returned_loan_never_overdue() {
        let today = date(2025, 6, 15);
        assert!(!is_overdue(date(2020, 1, 1), true, today));
        assert_eq!(days_overdue(date(2020, 1, 1), true, today), 0);
    }

    #[test]
    fn test_due_today_not_overdue() {
        let today = date(2025, 6, 15);
        assert!(!is_overdue(today, false, today));
        assert_eq!(days_overdue(today, false, today), 0);
    }

    #[test]
    fn test_due_tomorrow_not_overdue() {
        let today = date(2025, 6, 15);
        assert!(!is_overdue(today + Duration::days(1), false, today));
    }

    #[test]
    fn test_days_overdue_counts_whole_days() {
        let today = date(2025, 6, 15);
        for n in 1..=60 {
            let due = today - Duration::days(n);
            assert!(is_overdue(due, false, today));
            assert_eq!(days_overdue(due, false, today), n);
        }
    }

    #[test]
    fn test_extend_bounds() {
        assert!(ExtendLoan { additional_days: 0 }.validate().is_err());
        assert!(ExtendLoan { additional_days: -3 }.validate().is_err());
        assert!(ExtendLoan { additional_days: 1 }.validate().is_ok());
        assert!(ExtendLoan { additional_days: 30 }.validate().is_ok());
        assert!(ExtendLoan { additional_days: 31 }.validate().is_err());
    }

    #[test]
    fn test_extend_error_names_constraint() {
        let err = ExtendLoan { additional_days: 31 }.validate().unwrap_err();
        assert!(err.to_string().contains("between 1 and 30"));
    }

    fn sample_details(due_date: Option<NaiveDate>, is_returned: bool, today: NaiveDate) -> LoanDetails {
        let loan = Loan {
            id: 1,
            book_id: 2,
            member_id: 3,
            loan_date: today - Duration::days(20),
            due_date,
            return_date: is_returned.then(|| today - Duration::days(1)),
            is_returned,
        };
        let book = BookDetails {
            id: 2,
            title: "The Left Hand of Darkness".to_string(),
            author: Author {
                id: 4,
                lastname: "Le Guin".to_string(),
                firstname: Some("Ursula K.".to_string()),
                bio: None,
            },
            isbn: "9780441478125".to_string(),
            genre: Some("Science Fiction".to_string()),
            available_copies: 1,
        };
        let member = MemberDetails {
            id: 3,
            user: User {
                id: 5,
                username: "genly".to_string(),
                email: "genly@example.org".to_string(),
            },
            membership_date: date(2024, 1, 1),
        };
        LoanDetails::from_parts(loan, book, member, today)
    }

    #[test]
    fn test_serialized_overdue_fields_match_recomputation() {
        let today = date(2025, 6, 15);
        let cases = [
            (Some(today - Duration::days(7)), false),
            (Some(today - Duration::days(7)), true),
            (Some(today), false),
            (Some(today + Duration::days(3)), false),
            (None, false),
        ];

        for (due, returned) in cases {
            let details = sample_details(due, returned, today);
            let json = serde_json::to_value(&details).unwrap();

            let expected_overdue = due.map(|d| is_overdue(d, returned, today)).unwrap_or(false);
            let expected_days = due.map(|d| days_overdue(d, returned, today)).unwrap_or(0);

            assert_eq!(json["is_overdue"], serde_json::json!(expected_overdue));
            assert_eq!(json["days_overdue"], serde_json::json!(expected_days));
        }
    }

    #[test]
    fn test_loan_without_due_date_not_overdue() {
        let today = date(2025, 6, 15);
        let details = sample_details(None, false, today);
        assert!(!details.is_overdue);
        assert_eq!(details.days_overdue, 0);
    }
}
