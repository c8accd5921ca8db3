//! The REST movie service: query, mutation and header-verification routes
//! resolved over plain HTTP.

use axum::{extract::Request, routing::any, Json, Router};
use http::{HeaderName, Method};
use serde_json::{json, Value};

use crate::verify::{ExpectedRequest, RawRequest, VerificationError};

pub(crate) fn routes() -> Router {
    // Handlers accept any method so that a mismatched verb reaches the
    // verifier and is reported in the response body, not as a bare 405.
    Router::new()
        // queries
        .route("/favMovies/:id", any(fav_movies))
        .route("/favMoviesPost/:id", any(fav_movies_post))
        .route("/verifyHeaders", any(verify_headers))
        // mutations
        .route("/favMoviesCreate", any(fav_movies_create))
        .route("/favMoviesUpdate/:id", any(fav_movies_update))
        .route("/favMoviesDelete/:id", any(fav_movies_delete))
}

/// The two-movie listing shared by the query routes, keyed by the field name
/// the engine under test expects the result under.
fn movie_listing(result_key: &str) -> Value {
    let movies = json!([
        {
            "id": "0x3",
            "name": "Star Wars",
            "director": [{ "id": "0x4", "name": "George Lucas" }]
        },
        {
            "id": "0x5",
            "name": "Star Trek",
            "director": [{ "id": "0x6", "name": "J.J. Abrams" }]
        }
    ]);

    let mut document = serde_json::Map::new();
    document.insert(result_key.to_string(), movies);
    Value::Object(document)
}

fn forwarded_header_expectation() -> Vec<(HeaderName, Option<Vec<&'static str>>)> {
    vec![
        (HeaderName::from_static("x-app-token"), Some(vec!["app-token"])),
        (HeaderName::from_static("x-user-id"), Some(vec!["123"])),
        (HeaderName::from_static("accept-encoding"), None),
        (HeaderName::from_static("user-agent"), None),
    ]
}

async fn fav_movies(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    request.verify(&ExpectedRequest {
        method: Method::GET,
        url_suffix: "/0x123?name=Author&num=10",
        body: "",
        headers: None,
    })?;

    Ok(Json(movie_listing("myFavoriteMovies")))
}

async fn fav_movies_post(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    request.verify(&ExpectedRequest {
        method: Method::POST,
        url_suffix: "/0x123?name=Author&num=10",
        body: "",
        headers: None,
    })?;

    Ok(Json(movie_listing("myFavoriteMoviesPost")))
}

async fn verify_headers(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    request.verify(&ExpectedRequest {
        method: Method::GET,
        url_suffix: "/verifyHeaders",
        body: "",
        headers: Some(forwarded_header_expectation()),
    })?;

    Ok(Json(json!({
        "verifyHeaders": [{ "id": "0x3", "name": "Star Wars" }]
    })))
}

async fn fav_movies_create(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    request.verify(&ExpectedRequest {
        method: Method::POST,
        url_suffix: "/favMoviesCreate",
        body: r#"{"movies":[{"director":[{"name":"Dir1"}],"name":"Mov1"},{"name":"Mov2"}]}"#,
        headers: None,
    })?;

    Ok(Json(json!({
        "createMyFavouriteMovies": [
            {
                "id": "0x1",
                "name": "Mov1",
                "director": [{ "id": "0x2", "name": "Dir1" }]
            },
            {
                "id": "0x3",
                "name": "Mov2"
            }
        ]
    })))
}

async fn fav_movies_update(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    request.verify(&ExpectedRequest {
        method: Method::PATCH,
        url_suffix: "/favMoviesUpdate/0x1",
        body: r#"{"director":[{"name":"Dir1"}],"name":"Mov1"}"#,
        headers: None,
    })?;

    Ok(Json(json!({
        "updateMyFavouriteMovie": {
            "id": "0x1",
            "name": "Mov1",
            "director": [{ "id": "0x2", "name": "Dir1" }]
        }
    })))
}

async fn fav_movies_delete(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    request.verify(&ExpectedRequest {
        method: Method::DELETE,
        url_suffix: "/favMoviesDelete/0x1",
        body: "",
        headers: Some(forwarded_header_expectation()),
    })?;

    Ok(Json(json!({
        "deleteMyFavouriteMovie": { "id": "0x1", "name": "Mov1" }
    })))
}
