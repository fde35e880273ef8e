use axum::extract::State;

use crate::{extractor::path::ApiPath, server_error, state::ApiState};

use super::{book_error, BookError, BookErrorResponse, BookErrorType, BookResponse};

#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 404, description = "No book with this isbn", body = BookErrorResponse),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_book(
    ApiPath(isbn): ApiPath<String>,
    State(state): State<ApiState>,
) -> Result<BookResponse, BookError> {
    let book = state
        .books()
        .get(&isbn)
        .await
        .map_err(server_error!(state))?;

    match book {
        Some(book) => Ok(BookResponse { book }),
        None => Err(book_error(&state, BookErrorType::NotFound { isbn })),
    }
}
