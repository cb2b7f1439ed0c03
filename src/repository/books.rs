//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{BookDetails, CreateBook, UpdateBook},
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

const BOOK_DETAILS_SELECT: &str = r#"
    SELECT b.id, b.title, b.isbn, b.genre, b.available_copies,
           a.id AS author_id, a.lastname AS author_lastname,
           a.firstname AS author_firstname, a.bio AS author_bio
    FROM books b
    JOIN authors a ON b.author_id = a.id
"#;

fn details_from_row(row: &sqlx::postgres::PgRow) -> BookDetails {
    BookDetails {
        id: row.get("id"),
        title: row.get("title"),
        author: Author {
            id: row.get("author_id"),
            lastname: row.get("author_lastname"),
            firstname: row.get("author_firstname"),
            bio: row.get("author_bio"),
        },
        isbn: row.get("isbn"),
        genre: row.get("genre"),
        available_copies: row.get("available_copies"),
    }
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all books with their authors expanded
    pub async fn list(&self) -> AppResult<Vec<BookDetails>> {
        let rows = sqlx::query(&format!("{} ORDER BY b.title", BOOK_DETAILS_SELECT))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Get book by ID with its author expanded
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let row = sqlx::query(&format!("{} WHERE b.id = $1", BOOK_DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(details_from_row(&row))
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<BookDetails> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author_id, isbn, genre, available_copies)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(book.available_copies)
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Update a book
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<BookDetails> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = COALESCE($1, title),
                author_id = COALESCE($2, author_id),
                isbn = COALESCE($3, isbn),
                genre = COALESCE($4, genre),
                available_copies = COALESCE($5, available_copies)
            WHERE id = $6
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(book.available_copies)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        self.get_details(id).await
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
