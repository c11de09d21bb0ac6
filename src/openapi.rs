use utoipa::OpenApi;

use crate::{
    book::Book,
    error::{ApplicationError, ApplicationErrorResponse},
    route::books::{
        create_book, delete_book, get_book, list_books, update_book, BookDeletedResponse,
        BookResponse, BooksResponse,
    },
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
        BooksResponse,
        BookResponse,
        BookDeletedResponse,
        ApplicationError,
        ApplicationErrorResponse,
    )),
    tags((name = "books", description = "Book catalog"))
)]
pub struct ApiDoc;
