use sqlx::SqlitePool;
use thiserror::Error;

use super::models::Book;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("There is no book with an isbn '{0}'")]
    NotFound(String),

    #[error("A book with isbn '{0}' already exists")]
    Conflict(String),

    #[error("book store failure: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Sole access path to the `books` table
///
/// Every operation is a single statement; uniqueness races are settled by the
/// primary key, not by the store.
#[derive(Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year
             FROM books
             ORDER BY title, isbn",
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = books.len(), "listed books");
        Ok(books)
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year
             FROM books
             WHERE isbn = ?",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(isbn.to_string()))
    }

    pub async fn create(&self, book: &Book) -> StoreResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &book.isbn))?;

        tracing::debug!(isbn = %created.isbn, "created book");
        Ok(created)
    }

    /// Replace every column of the book stored under `isbn`, including the key itself
    pub async fn update(&self, isbn: &str, book: &Book) -> StoreResult<Book> {
        let updated = sqlx::query_as::<_, Book>(
            "UPDATE books
             SET isbn = ?, amazon_url = ?, author = ?, language = ?,
                 pages = ?, publisher = ?, title = ?, year = ?
             WHERE isbn = ?
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &book.isbn))?
        .ok_or_else(|| StoreError::NotFound(isbn.to_string()))?;

        tracing::debug!(isbn, new_isbn = %updated.isbn, "updated book");
        Ok(updated)
    }

    pub async fn remove(&self, isbn: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(isbn.to_string()));
        }

        tracing::debug!(isbn, "removed book");
        Ok(())
    }
}

fn write_error(err: sqlx::Error, isbn: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(isbn.to_string())
        }
        _ => StoreError::Database(err),
    }
}
