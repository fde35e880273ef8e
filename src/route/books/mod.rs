use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ErrorVerbosityProvider, ResourceError, ResourceErrorProvider, RouteError},
    state::ApiState,
    types::book::Book,
};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum BookErrorType {
    NotFound {
        #[serde(skip)]
        isbn: String,
    },
    IsbnMismatch {
        #[serde(skip)]
        path_isbn: String,
        #[serde(skip)]
        body_isbn: String,
    },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookErrorContext {
    pub reason: String,
}

/// Body of a [`BookError`] that is not an [`ApiError`](crate::error::ApiError).
///
/// Only describes the serialized [`ResourceError`] in the OpenAPI document.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct BookErrorResponse {
    /// `NotFound` or `IsbnMismatch`.
    error_type: String,
    message: String,
    context: Option<BookErrorContext>,
}

impl ResourceErrorProvider for BookErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BookErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
            BookErrorType::IsbnMismatch { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            BookErrorType::NotFound { .. } => "Book not found",
            BookErrorType::IsbnMismatch { .. } => "Isbn can not be changed",
        }
    }

    fn context(&self) -> Self::Context {
        match self {
            BookErrorType::NotFound { isbn } => BookErrorContext {
                reason: format!("Book with isbn {isbn} not found"),
            },
            BookErrorType::IsbnMismatch {
                path_isbn,
                body_isbn,
            } => BookErrorContext {
                reason: format!("Body isbn {body_isbn} does not match path isbn {path_isbn}"),
            },
        }
    }
}

pub type BookError = RouteError<BookErrorType, BookErrorContext>;

fn book_error(state: &ApiState, error_type: BookErrorType) -> BookError {
    tracing::warn!(?error_type, "Book error");

    ResourceError::new(state.error_verbosity(), error_type).into()
}
