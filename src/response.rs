//! Rendering of method outcomes.

use crate::config::MediaType;
use crate::synth::Outcome;
use axum::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// Status for an operation that returns nothing: created for POST, ok otherwise.
pub fn empty_status(method: &Method) -> StatusCode {
    if *method == Method::POST {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

/// Lists and present entities as JSON; an absent entity or a void result as an empty body.
pub fn render_outcome(method: &Method, produces: Option<MediaType>, outcome: Outcome) -> Response {
    let mut response = match outcome {
        Outcome::List(users) => (StatusCode::OK, Json(users)).into_response(),
        Outcome::Single(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Outcome::Single(None) => StatusCode::OK.into_response(),
        Outcome::None => empty_status(method).into_response(),
    };
    if let Some(media) = produces {
        if response.headers().contains_key(CONTENT_TYPE) {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, axum::http::HeaderValue::from_static(media.as_str()));
        }
    }
    response
}
