pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use sqlx::SqlitePool;

use store::BookStore;

/// Books catalog module: CRUD over the `books` table keyed by ISBN
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE books (
                    isbn       TEXT PRIMARY KEY NOT NULL,
                    amazon_url TEXT NOT NULL,
                    author     TEXT NOT NULL,
                    language   TEXT NOT NULL,
                    pages      INTEGER NOT NULL CHECK (pages > 0),
                    publisher  TEXT NOT NULL,
                    title      TEXT NOT NULL,
                    year       INTEGER NOT NULL
                )
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{}", schema) }
            }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book_body = serde_json::json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    });
    let isbn_param = serde_json::json!([{
        "name": "isbn",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    }]);

    serde_json::json!({
        "paths": {
            "/books/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("All books", "BooksResponse"),
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": book_body,
                    "responses": {
                        "201": json_response("Created book", "BookResponse"),
                        "400": error_response("Payload failed validation"),
                        "409": error_response("ISBN already exists")
                    }
                }
            },
            "/books/{isbn}": {
                "get": {
                    "summary": "Get a book by ISBN",
                    "tags": ["Books"],
                    "parameters": isbn_param,
                    "responses": {
                        "200": json_response("The book", "BookResponse"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "parameters": isbn_param,
                    "requestBody": book_body,
                    "responses": {
                        "200": json_response("Updated book", "BookResponse"),
                        "400": error_response("Payload failed validation"),
                        "404": error_response("Book not found"),
                        "409": error_response("ISBN already exists")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": isbn_param,
                    "responses": {
                        "200": json_response("Deletion confirmation", "MessageResponse"),
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "isbn": { "type": "string", "minLength": 1 },
                        "amazon_url": { "type": "string" },
                        "author": { "type": "string" },
                        "language": { "type": "string" },
                        "pages": { "type": "integer", "format": "int32", "minimum": 1 },
                        "publisher": { "type": "string" },
                        "title": { "type": "string" },
                        "year": { "type": "integer", "format": "int32" }
                    },
                    "required": [
                        "isbn", "amazon_url", "author", "language",
                        "pages", "publisher", "title", "year"
                    ]
                },
                "BookResponse": {
                    "type": "object",
                    "properties": { "book": { "$ref": "#/components/schemas/Book" } },
                    "required": ["book"]
                },
                "BooksResponse": {
                    "type": "object",
                    "properties": {
                        "books": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        }
                    },
                    "required": ["books"]
                },
                "MessageResponse": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } },
                    "required": ["message"]
                }
            }
        }
    })
}

/// Create the books module over an existing pool
pub fn create_module(pool: SqlitePool) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(BookStore::new(pool)))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_fragment_lists_every_route() {
        let fragment = openapi_fragment();
        let paths = fragment["paths"].as_object().unwrap();

        assert!(paths["/books/"]["get"].is_object());
        assert!(paths["/books/"]["post"].is_object());
        for verb in ["get", "put", "delete"] {
            assert!(paths["/books/{isbn}"][verb].is_object(), "missing {verb}");
        }
        assert_eq!(
            fragment["components"]["schemas"]["Book"]["required"]
                .as_array()
                .unwrap()
                .len(),
            8
        );
    }
}
