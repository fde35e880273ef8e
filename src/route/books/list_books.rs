use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, server_error, state::ApiState, types::book::Book};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

impl IntoResponse for BooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Lists all books, ordered by title.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BooksResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_books(State(state): State<ApiState>) -> Result<BooksResponse, ApiError> {
    let books = state.books().list().await.map_err(server_error!(state))?;

    tracing::debug!(count = books.len(), "Listed books");

    Ok(BooksResponse { books })
}
