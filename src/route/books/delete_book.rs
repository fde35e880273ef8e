use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{extractor::path::ApiPath, server_error, state::ApiState};

use super::{book_error, BookError, BookErrorResponse, BookErrorType};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteBookResponse {
    pub message: String,
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "The book was deleted", body = DeleteBookResponse),
        (status = 404, description = "No book with this isbn", body = BookErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_book(
    ApiPath(isbn): ApiPath<String>,
    State(state): State<ApiState>,
) -> Result<DeleteBookResponse, BookError> {
    let deleted = state
        .books()
        .delete(&isbn)
        .await
        .map_err(server_error!(state))?;

    if !deleted {
        return Err(book_error(&state, BookErrorType::NotFound { isbn }));
    }

    tracing::info!("Book deleted");

    Ok(DeleteBookResponse {
        message: "Book deleted".to_string(),
    })
}
