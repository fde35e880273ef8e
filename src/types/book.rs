use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A book record, identified by its `isbn`.
///
/// Doubles as the create payload, so every field is required and unknown fields are rejected.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    ToSchema,
    Validate,
    sqlx::FromRow,
)]
#[serde(deny_unknown_fields)]
pub struct Book {
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub isbn: String,
    #[validate(url(message = "Must be a valid URL"))]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "Must be at least 1"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub title: String,
    #[validate(range(min = 0, max = 9999, message = "Must be between 0 and 9999"))]
    pub year: i32,
}

/// Update payload: the full set of book fields.
///
/// The isbn is taken from the path. If the body carries one, it must match.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, ToSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[validate(url(message = "Must be a valid URL"))]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "Must be at least 1"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub title: String,
    #[validate(range(min = 0, max = 9999, message = "Must be between 0 and 9999"))]
    pub year: i32,
}

impl UpdateBook {
    /// Returns `false` if the body names an isbn other than `isbn`.
    pub fn matches_isbn(&self, isbn: &str) -> bool {
        self.isbn.as_deref().map_or(true, |own| own == isbn)
    }

    pub fn into_book(self, isbn: String) -> Book {
        Book {
            isbn,
            amazon_url: self.amazon_url,
            author: self.author,
            language: self.language,
            pages: self.pages,
            publisher: self.publisher,
            title: self.title,
            year: self.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book {
            isbn: "1234567".to_string(),
            amazon_url: "https://amazon.com/test".to_string(),
            author: "Tester".to_string(),
            language: "English".to_string(),
            pages: 250,
            publisher: "Test Publisher".to_string(),
            title: "The Test Book".to_string(),
            year: 2024,
        }
    }

    #[test]
    fn valid_book_passes_validation() {
        assert!(book().validate().is_ok());
    }

    #[test]
    fn invalid_fields_are_reported() {
        let book = Book {
            amazon_url: "not a url".to_string(),
            pages: 0,
            title: String::new(),
            year: 10000,
            ..book()
        };

        let errors = book.validate().expect_err("book is invalid");
        let fields = errors.field_errors();

        assert!(fields.contains_key("amazon_url"));
        assert!(fields.contains_key("pages"));
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("year"));
        assert!(!fields.contains_key("author"));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let result = serde_json::from_str::<Book>(r#"{"author": "Taco Man"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected_on_create() {
        let mut value = serde_json::to_value(book()).expect("serializable");
        value["random"] = serde_json::json!("RANDOM FIELD");

        assert!(serde_json::from_value::<Book>(value).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<UpdateBook>(
            r#"{
                "amazon_url": "https://amazon.com/taco",
                "author": "Taco Man",
                "language": "English",
                "pages": 300,
                "publisher": "Taco Publisher",
                "title": "The First Taco Born",
                "year": 2022,
                "random": "RANDOM FIELD"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_keeps_the_path_isbn() {
        let update = UpdateBook {
            isbn: None,
            amazon_url: "https://amazon.com/taco".to_string(),
            author: "Taco Man".to_string(),
            language: "English".to_string(),
            pages: 300,
            publisher: "Taco Publisher".to_string(),
            title: "The First Taco Born".to_string(),
            year: 2022,
        };

        assert!(update.matches_isbn("1234567"));

        let updated = update.into_book("1234567".to_string());
        assert_eq!(updated.isbn, "1234567");
        assert_eq!(updated.title, "The First Taco Born");
    }

    #[test]
    fn update_with_other_isbn_does_not_match() {
        let update: UpdateBook = serde_json::from_value(serde_json::json!({
            "isbn": "999",
            "amazon_url": "https://amazon.com/taco",
            "author": "Taco Man",
            "language": "English",
            "pages": 300,
            "publisher": "Taco Publisher",
            "title": "The First Taco Born",
            "year": 2022
        }))
        .expect("valid update");

        assert!(update.matches_isbn("999"));
        assert!(!update.matches_isbn("1234567"));
    }
}
