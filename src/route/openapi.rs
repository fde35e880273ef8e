use axum::Json;
use utoipa::OpenApi;

use crate::{
    error::{
        ApiError, BodyError, InternalServerError, MethodNotAllowedError, NotFoundError,
        PathError, ValidationError,
    },
    types::book::{Book, UpdateBook},
};

use super::books::{
    create_book, delete_book, delete_book::DeleteBookResponse, get_book, list_books,
    list_books::BooksResponse, update_book, BookErrorContext, BookErrorResponse, BookResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books::list_books,
        get_book::get_book,
        create_book::create_book,
        update_book::update_book,
        delete_book::delete_book,
    ),
    components(schemas(
        Book,
        UpdateBook,
        BookResponse,
        BooksResponse,
        DeleteBookResponse,
        BookErrorResponse,
        BookErrorContext,
        ApiError,
        InternalServerError,
        BodyError,
        PathError,
        ValidationError,
        MethodNotAllowedError,
        NotFoundError
    )),
    tags((name = "books", description = "Book records identified by isbn"))
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
