//! HTTP handlers for the books collection.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use bookstore_http::AppError;

use super::models::{BookResponse, BooksResponse, MessageResponse};
use super::store::{BookStore, StoreError};
use super::validation::{validate_book, ValidationError};

/// Routes served by the books module
///
/// The collection answers with and without a trailing slash.
pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/", get(list_books).post(create_book))
        .route(
            "/books/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found(err.to_string()),
            StoreError::Conflict(_) => AppError::conflict(
                vec![json!({ "field": "isbn", "error": "already exists" })],
                err.to_string(),
            ),
            StoreError::Database(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        let details = err
            .details
            .into_iter()
            .map(|d| json!({ "field": d.field, "error": d.error }))
            .collect();
        AppError::validation(details, message)
    }
}

fn read_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

async fn list_books(State(store): State<BookStore>) -> Result<Json<BooksResponse>, AppError> {
    let books = store.list_all().await?;
    Ok(Json(BooksResponse { books }))
}

async fn get_book(
    State(store): State<BookStore>,
    Path(isbn): Path<String>,
) -> Result<Json<BookResponse>, AppError> {
    let book = store.get_by_isbn(&isbn).await?;
    Ok(Json(BookResponse { book }))
}

async fn create_book(
    State(store): State<BookStore>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let candidate = validate_book(&read_body(payload)?)?;
    let book = store.create(&candidate).await?;
    tracing::info!(isbn = %book.isbn, "book created");
    Ok((StatusCode::CREATED, Json(BookResponse { book })))
}

async fn update_book(
    State(store): State<BookStore>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let candidate = validate_book(&read_body(payload)?)?;
    let book = store.update(&isbn, &candidate).await?;
    tracing::info!(isbn = %isbn, new_isbn = %book.isbn, "book updated");
    Ok(Json(BookResponse { book }))
}

async fn delete_book(
    State(store): State<BookStore>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    store.remove(&isbn).await?;
    tracing::info!(isbn = %isbn, "book deleted");
    Ok(Json(MessageResponse {
        message: "Book deleted".to_string(),
    }))
}
