//! Loans repository for database operations

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookDetails},
        loan::{CreateLoan, Loan, LoanDetails},
        member::MemberDetails,
        user::User,
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

const LOAN_DETAILS_SELECT: &str = r#"
    SELECT l.id, l.book_id, l.member_id, l.loan_date, l.due_date,
           l.return_date, l.is_returned,
           b.title AS book_title, b.isbn AS book_isbn, b.genre AS book_genre,
           b.available_copies AS book_available_copies,
           a.id AS author_id, a.lastname AS author_lastname,
           a.firstname AS author_firstname, a.bio AS author_bio,
           m.membership_date,
           u.id AS user_id, u.username AS user_username, u.email AS user_email
    FROM loans l
    JOIN books b ON l.book_id = b.id
    JOIN authors a ON b.author_id = a.id
    JOIN members m ON l.member_id = m.id
    JOIN users u ON m.user_id = u.id
"#;

fn details_from_row(row: &sqlx::postgres::PgRow, today: NaiveDate) -> LoanDetails {
    let loan = Loan {
        id: row.get("id"),
        book_id: row.get("book_id"),
        member_id: row.get("member_id"),
        loan_date: row.get("loan_date"),
        due_date: row.get("due_date"),
        return_date: row.get("return_date"),
        is_returned: row.get("is_returned"),
    };
    let book = BookDetails {
        id: loan.book_id,
        title: row.get("book_title"),
        author: Author {
            id: row.get("author_id"),
            lastname: row.get("author_lastname"),
            firstname: row.get("author_firstname"),
            bio: row.get("author_bio"),
        },
        isbn: row.get("book_isbn"),
        genre: row.get("book_genre"),
        available_copies: row.get("book_available_copies"),
    };
    let member = MemberDetails {
        id: loan.member_id,
        user: User {
            id: row.get("user_id"),
            username: row.get("user_username"),
            email: row.get("user_email"),
        },
        membership_date: row.get("membership_date"),
    };

    LoanDetails::from_parts(loan, book, member, today)
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loan by ID with book and member expanded
    pub async fn get_details(&self, id: i32) -> AppResult<LoanDetails> {
        let row = sqlx::query(&format!("{} WHERE l.id = $1", LOAN_DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        Ok(details_from_row(&row, Utc::now().date_naive()))
    }

    /// Get loans for a member
    pub async fn get_member_loans(&self, member_id: i32) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query(&format!(
            "{} WHERE l.member_id = $1 ORDER BY l.loan_date DESC",
            LOAN_DETAILS_SELECT
        ))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        Ok(rows.iter().map(|row| details_from_row(row, today)).collect())
    }

    /// Find active loans whose due date is strictly before `today`.
    ///
    /// Active loans without a due date are invalid records: they are
    /// excluded from the result and logged, never treated as overdue.
    pub async fn find_overdue(&self, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        let missing: Vec<i32> = sqlx::query_scalar(
            "SELECT id FROM loans WHERE is_returned = FALSE AND due_date IS NULL",
        )
        .fetch_all(&self.pool)
        .await?;
        for id in missing {
            tracing::warn!(loan_id = id, "Active loan has no due date, skipping overdue check");
        }

        let rows = sqlx::query(&format!(
            "{} WHERE l.is_returned = FALSE AND l.due_date IS NOT NULL AND l.due_date < $1 ORDER BY l.due_date",
            LOAN_DETAILS_SELECT
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| details_from_row(row, today)).collect())
    }

    /// Create a new loan. The loan date is today and the due date is
    /// computed from the configured loan period; both are fixed here and
    /// read-only afterwards. Takes one available copy of the book.
    pub async fn create(&self, loan: &CreateLoan, loan_period_days: i64) -> AppResult<(i32, NaiveDate)> {
        let today = Utc::now().date_naive();
        let due_date = today + Duration::days(loan_period_days);

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(loan.book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", loan.book_id)))?;

        if book.available_copies <= 0 {
            return Err(AppError::Conflict(format!(
                "No available copies of \"{}\"",
                book.title
            )));
        }

        sqlx::query("UPDATE books SET available_copies = available_copies - 1 WHERE id = $1")
            .bind(loan.book_id)
            .execute(&self.pool)
            .await?;

        let loan_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO loans (book_id, member_id, loan_date, due_date, is_returned)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id
            "#,
        )
        .bind(loan.book_id)
        .bind(loan.member_id)
        .bind(today)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok((loan_id, due_date))
    }

    /// Return a loan: sets is_returned and return_date together and puts
    /// the copy back in circulation
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<LoanDetails> {
        let today = Utc::now().date_naive();

        let loan = self.get_by_id(loan_id).await?;

        if loan.is_returned {
            return Err(AppError::Conflict("Loan already returned".to_string()));
        }

        sqlx::query("UPDATE loans SET is_returned = TRUE, return_date = $1 WHERE id = $2")
            .bind(today)
            .bind(loan_id)
            .execute(&self.pool)
            .await?;

        sqlx::query("UPDATE books SET available_copies = available_copies + 1 WHERE id = $1")
            .bind(loan.book_id)
            .execute(&self.pool)
            .await?;

        self.get_details(loan_id).await
    }

    /// Push a loan's due date forward by `additional_days`.
    /// The caller is responsible for bounds validation.
    pub async fn extend_loan(&self, loan_id: i32, additional_days: i64) -> AppResult<NaiveDate> {
        let loan = self.get_by_id(loan_id).await?;

        if loan.is_returned {
            return Err(AppError::Conflict("Cannot extend a returned loan".to_string()));
        }

        let due_date = loan
            .due_date
            .ok_or_else(|| AppError::Conflict(format!("Loan {} has no due date to extend", loan_id)))?;

        let new_due_date = due_date + Duration::days(additional_days);

        sqlx::query("UPDATE loans SET due_date = $1 WHERE id = $2")
            .bind(new_due_date)
            .bind(loan_id)
            .execute(&self.pool)
            .await?;

        Ok(new_due_date)
    }
}
