use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::ApiError,
    extractor::{json::ApiJson, validated::Validated},
    server_error,
    state::ApiState,
    types::book::Book,
};

use super::BookResponse;

/// [`BookResponse`] with [`StatusCode::CREATED`].
pub struct CreateBookResponse(BookResponse);

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "The created book", body = BookResponse),
        (status = 400, description = "The body does not match the book schema", body = ApiError),
        (status = 500, description = "The book could not be stored", body = ApiError),
    )
)]
#[tracing::instrument(skip_all, fields(isbn = %book.isbn))]
pub async fn create_book(
    State(state): State<ApiState>,
    Validated(ApiJson(book)): Validated<ApiJson<Book>>,
) -> Result<CreateBookResponse, ApiError> {
    let book = state
        .books()
        .create(&book)
        .await
        .map_err(server_error!(state))?;

    tracing::info!("Book created");

    Ok(CreateBookResponse(BookResponse { book }))
}
