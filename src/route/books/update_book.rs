use axum::extract::State;

use crate::{
    error::ApiError,
    extractor::{json::ApiJson, path::ApiPath, validated::Validated},
    server_error,
    state::ApiState,
    types::book::UpdateBook,
};

use super::{book_error, BookError, BookErrorResponse, BookErrorType, BookResponse};

/// Replaces every field of a book but its isbn.
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "The updated book", body = BookResponse),
        (status = 400, description = "The body does not match the update schema", body = ApiError),
        (status = 404, description = "No book with this isbn", body = BookErrorResponse),
    )
)]
#[tracing::instrument(skip(state, update))]
pub async fn update_book(
    ApiPath(isbn): ApiPath<String>,
    State(state): State<ApiState>,
    Validated(ApiJson(update)): Validated<ApiJson<UpdateBook>>,
) -> Result<BookResponse, BookError> {
    if !update.matches_isbn(&isbn) {
        return Err(book_error(
            &state,
            BookErrorType::IsbnMismatch {
                path_isbn: isbn,
                body_isbn: update.isbn.unwrap_or_default(),
            },
        ));
    }

    let book = update.into_book(isbn);

    let updated = state
        .books()
        .update(&book)
        .await
        .map_err(server_error!(state))?;

    match updated {
        Some(book) => {
            tracing::info!("Book updated");

            Ok(BookResponse { book })
        }
        None => Err(book_error(
            &state,
            BookErrorType::NotFound { isbn: book.isbn },
        )),
    }
}
