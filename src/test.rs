use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    book::Book,
    error::ErrorVerbosity,
    schema::Schema,
    server::{app, ServerConfig},
    state::ApiState,
    store::{memory::MemoryBookStore, BookStore},
};

#[tokio::test]
async fn example_config_is_valid() {
    ServerConfig::from_config_file("config.example.yaml")
        .await
        .expect("Example config is not parsable");
}

fn test_book() -> Book {
    Book {
        isbn: String::from("12"),
        amazon_url: String::from("http://a.co/eobPtX2"),
        author: String::from("test author"),
        language: String::from("english"),
        pages: 300,
        publisher: String::from("test publisher"),
        title: String::from("test book"),
        year: 2020,
    }
}

fn new_book() -> Value {
    json!({
        "isbn": "0691161518",
        "amazon_url": "http://a.co/eobPtX2",
        "author": "Matthew Lane",
        "language": "english",
        "pages": 264,
        "publisher": "Princeton University Press",
        "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
        "year": 2017
    })
}

/// An app with [`test_book`] in its store.
async fn test_app() -> Router {
    let store = MemoryBookStore::new();
    store.create(test_book()).await.unwrap();

    let state = ApiState::new(ErrorVerbosity::Full, Schema::book().unwrap(), Arc::new(store));

    app(state, false)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let body = match bytes.is_empty() {
        true => Value::Null,
        false => serde_json::from_slice(&bytes).unwrap(),
    };

    (status, body)
}

fn validation_error(descriptors: &[&str]) -> Value {
    json!({
        "error": { "message": descriptors, "status": 400 },
        "message": descriptors,
    })
}

#[tokio::test]
async fn list_books() {
    let (status, body) = send(test_app().await, Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [test_book()] }));
}

#[tokio::test]
async fn get_book() {
    let (status, body) = send(test_app().await, Method::GET, "/books/12", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": test_book() }));
}

#[tokio::test]
async fn get_book_with_unknown_isbn_is_not_found() {
    let (status, body) = send(test_app().await, Method::GET, "/books/11111111", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "error": { "message": "There is no book with an isbn '11111111'", "status": 404 },
            "message": "There is no book with an isbn '11111111'",
        })
    );
}

#[tokio::test]
async fn create_book() {
    let app = test_app().await;

    let (status, body) = send(app.clone(), Method::POST, "/books", Some(new_book())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "book": new_book() }));

    let (status, body) = send(app, Method::GET, "/books/0691161518", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": new_book() }));
}

#[tokio::test]
async fn create_book_missing_a_required_property() {
    let mut book = new_book();
    book.as_object_mut().unwrap().remove("isbn");

    let (status, body) = send(test_app().await, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        validation_error(&[r#"instance requires property "isbn""#])
    );
}

#[tokio::test]
async fn create_book_with_a_wrong_type() {
    let mut book = new_book();
    book["author"] = json!(111);

    let (status, body) = send(test_app().await, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        validation_error(&["instance.author is not of a type(s) string"])
    );
}

#[tokio::test]
async fn create_book_reports_every_violation() {
    let book = json!({ "isbn": 691161518, "title": "Power-Up" });

    let (status, body) = send(test_app().await, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        validation_error(&[
            "instance.isbn is not of a type(s) string",
            r#"instance requires property "amazon_url""#,
            r#"instance requires property "author""#,
            r#"instance requires property "language""#,
            r#"instance requires property "pages""#,
            r#"instance requires property "publisher""#,
            r#"instance requires property "year""#,
        ])
    );
}

#[tokio::test]
async fn rejected_book_is_not_stored() {
    let app = test_app().await;
    let mut book = new_book();
    book["year"] = json!("2017");

    let (status, _) = send(app.clone(), Method::POST, "/books", Some(book)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app, Method::GET, "/books/0691161518", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_book_with_an_existing_isbn_is_a_conflict() {
    let mut book = new_book();
    book["isbn"] = json!("12");

    let (status, body) = send(test_app().await, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["status"], 409);
}

#[tokio::test]
async fn create_book_with_malformed_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"isbn\": "))
        .unwrap();

    let response = test_app().await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_book_without_json_content_type() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .body(Body::from(new_book().to_string()))
        .unwrap();

    let response = test_app().await.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["status"], 415);
    assert_eq!(body["error"]["message"], body["message"]);
}

#[tokio::test]
async fn create_book_with_integers_written_as_floats() {
    let mut book = new_book();
    book["pages"] = json!(264.0);
    book["year"] = json!(2017.0);

    let (status, body) = send(test_app().await, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "book": new_book() }));
    assert_eq!(body["book"]["pages"], json!(264));
}

#[tokio::test]
async fn create_book_with_pages_out_of_range() {
    let mut book = new_book();
    book["pages"] = json!(i64::MAX);

    let (status, body) = send(test_app().await, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn update_book() {
    let app = test_app().await;
    let mut book = new_book();
    book["isbn"] = json!("12");

    let (status, body) = send(app.clone(), Method::PUT, "/books/12", Some(book.clone())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": book }));

    let (_, body) = send(app, Method::GET, "/books/12", None).await;

    assert_eq!(body, json!({ "book": book }));
}

#[tokio::test]
async fn update_book_with_unknown_isbn_is_not_found() {
    let mut book = new_book();
    book["isbn"] = json!("12");

    let (status, _) = send(test_app().await, Method::PUT, "/books/1011111111", Some(book)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_book_is_validated() {
    let mut book = new_book();
    book.as_object_mut().unwrap().remove("title");

    let (status, body) = send(test_app().await, Method::PUT, "/books/12", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        validation_error(&[r#"instance requires property "title""#])
    );
}

#[tokio::test]
async fn delete_book() {
    let app = test_app().await;

    let (status, body) = send(app.clone(), Method::DELETE, "/books/12", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted" }));

    let (status, _) = send(app, Method::GET, "/books/12", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_book_with_unknown_isbn_is_not_found() {
    let (status, _) = send(test_app().await, Method::DELETE, "/books/11111111", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = send(test_app().await, Method::GET, "/authors", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": { "message": "Not Found", "status": 404 }, "message": "Not Found" })
    );
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let (status, body) = send(test_app().await, Method::PATCH, "/books/12", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["status"], 405);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(test_app().await, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books/{isbn}"].is_object());
}
