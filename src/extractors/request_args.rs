//! Collect everything a bound route may read its arguments from.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{header::CONTENT_TYPE, StatusCode},
};
use std::collections::HashMap;

/// Path params, query params, content type and raw body of one request.
#[derive(Clone, Debug, Default)]
pub struct RequestArgs {
    pub path: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[async_trait]
impl<S> FromRequest<S> for RequestArgs
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let path = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, state).await {
            Ok(Path(p)) => p,
            // routes without placeholders have no path params
            Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
            Err(e) => return Err(AppError::BadRequest(e.body_text())),
        };
        let Query(query) = Query::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let body = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(body_rejection)?;
        Ok(RequestArgs {
            path,
            query,
            content_type,
            body,
        })
    }
}

fn body_rejection(e: BytesRejection) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}
