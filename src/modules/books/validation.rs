//! Schema checks for book write payloads.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::models::Book;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Integer,
}

/// The complete set of fields a book payload may carry
const BOOK_FIELDS: &[(&str, FieldKind)] = &[
    ("isbn", FieldKind::Text),
    ("amazon_url", FieldKind::Text),
    ("author", FieldKind::Text),
    ("language", FieldKind::Text),
    ("pages", FieldKind::Integer),
    ("publisher", FieldKind::Text),
    ("title", FieldKind::Text),
    ("year", FieldKind::Integer),
];

/// One offending field, rendered into the `details` of a 400 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

impl FieldError {
    fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("book payload failed validation ({} problem(s))", .details.len())]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

/// Check a request body against the book schema and convert it
///
/// Every problem is reported, not only the first. The body is never altered.
pub fn validate_book(body: &Value) -> Result<Book, ValidationError> {
    let Some(object) = body.as_object() else {
        return Err(ValidationError {
            details: vec![FieldError::new("$", "expected a JSON object")],
        });
    };

    let mut details = Vec::new();

    for &(field, kind) in BOOK_FIELDS {
        if let Some(error) = check_field(object, field, kind) {
            details.push(FieldError::new(field, error));
        }
    }

    for key in object.keys() {
        if !BOOK_FIELDS.iter().any(|(field, _)| *field == key.as_str()) {
            details.push(FieldError::new(key.as_str(), "is not an allowed field"));
        }
    }

    if !details.is_empty() {
        return Err(ValidationError { details });
    }

    serde_json::from_value(body.clone()).map_err(|e| ValidationError {
        details: vec![FieldError::new("$", e.to_string())],
    })
}

fn check_field(object: &Map<String, Value>, field: &str, kind: FieldKind) -> Option<&'static str> {
    let value = match object.get(field) {
        None | Some(Value::Null) => return Some("is required"),
        Some(value) => value,
    };

    match kind {
        FieldKind::Text => match value.as_str() {
            None => Some("must be a string"),
            Some("") if field == "isbn" => Some("must not be empty"),
            Some(_) => None,
        },
        FieldKind::Integer => match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
            None => Some("must be a 32-bit integer"),
            Some(n) if field == "pages" && n <= 0 => Some("must be greater than 0"),
            Some(_) => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn way_of_kings() -> Value {
        json!({
            "isbn": "5555555555",
            "amazon_url": "http://a.co/safewf",
            "author": "Brandon Sanderson",
            "language": "english",
            "pages": 987,
            "publisher": "Princeton University Press",
            "title": "The Way of Kings",
            "year": 2014
        })
    }

    fn fields(err: &ValidationError) -> Vec<(&str, &str)> {
        err.details
            .iter()
            .map(|d| (d.field.as_str(), d.error.as_str()))
            .collect()
    }

    #[test]
    fn accepts_complete_payload_unchanged() {
        let book = validate_book(&way_of_kings()).unwrap();

        assert_eq!(book.isbn, "5555555555");
        assert_eq!(book.pages, 987);
        assert_eq!(book.year, 2014);
        assert_eq!(serde_json::to_value(&book).unwrap(), way_of_kings());
    }

    #[test]
    fn rejects_extraneous_field() {
        let mut body = way_of_kings();
        body["extra_field"] = json!("not allowed");

        let err = validate_book(&body).unwrap_err();
        assert_eq!(fields(&err), vec![("extra_field", "is not an allowed field")]);
    }

    #[test]
    fn reports_every_missing_field() {
        let err = validate_book(&json!({ "isbn": "1" })).unwrap_err();

        let missing: Vec<&str> = err.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(
            missing,
            vec!["amazon_url", "author", "language", "pages", "publisher", "title", "year"]
        );
        assert!(err.details.iter().all(|d| d.error == "is required"));
    }

    #[test]
    fn null_counts_as_missing() {
        let mut body = way_of_kings();
        body["author"] = Value::Null;

        let err = validate_book(&body).unwrap_err();
        assert_eq!(fields(&err), vec![("author", "is required")]);
    }

    #[test]
    fn rejects_wrong_types() {
        let mut body = way_of_kings();
        body["pages"] = json!("987");
        body["year"] = json!(2014.5);
        body["title"] = json!(42);

        let err = validate_book(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                ("pages", "must be a 32-bit integer"),
                ("title", "must be a string"),
                ("year", "must be a 32-bit integer"),
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_integers() {
        let mut body = way_of_kings();
        body["year"] = json!(i64::from(i32::MAX) + 1);

        let err = validate_book(&body).unwrap_err();
        assert_eq!(fields(&err), vec![("year", "must be a 32-bit integer")]);
    }

    #[test]
    fn pages_must_be_positive() {
        let mut body = way_of_kings();
        body["pages"] = json!(0);

        let err = validate_book(&body).unwrap_err();
        assert_eq!(fields(&err), vec![("pages", "must be greater than 0")]);
    }

    #[test]
    fn isbn_must_not_be_empty() {
        let mut body = way_of_kings();
        body["isbn"] = json!("");

        let err = validate_book(&body).unwrap_err();
        assert_eq!(fields(&err), vec![("isbn", "must not be empty")]);
    }

    #[test]
    fn rejects_non_object_body() {
        let err = validate_book(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(fields(&err), vec![("$", "expected a JSON object")]);
    }
}
