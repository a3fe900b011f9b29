//! Mount a registered routing table into an axum router.
//! Entries sharing a path template share one method router; `{name}` placeholders become `:name`.

use crate::error::AppError;
use crate::extractors::RequestArgs;
use crate::handlers::dispatch::dispatch;
use crate::router::RoutingTable;
use axum::{
    http::{Method, Uri},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use std::collections::HashMap;

fn method_filter(method: &Method) -> Option<MethodFilter> {
    Some(match *method {
        Method::GET => MethodFilter::GET,
        Method::POST => MethodFilter::POST,
        Method::PUT => MethodFilter::PUT,
        Method::PATCH => MethodFilter::PATCH,
        Method::DELETE => MethodFilter::DELETE,
        Method::HEAD => MethodFilter::HEAD,
        Method::OPTIONS => MethodFilter::OPTIONS,
        _ => return None,
    })
}

/// `/users/{id}` -> `/users/:id`. Trailing slashes are kept.
pub fn axum_path(template: &str) -> String {
    template
        .split('/')
        .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!(":{}", name),
            None => seg.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

async fn no_route(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {} {}", method, uri.path()))
}

pub fn surface_routes(table: &RoutingTable) -> Result<Router, AppError> {
    let mut by_path: HashMap<String, MethodRouter> = HashMap::new();
    for entry in table.entries() {
        let filter = method_filter(&entry.key.method)
            .ok_or_else(|| AppError::Internal(format!("cannot mount method {}", entry.key.method)))?;
        let bound = entry.clone();
        let handler = move |args: RequestArgs| {
            let entry = bound.clone();
            async move { dispatch(&entry, args).await }
        };
        let path = axum_path(&entry.key.path);
        let method_router = match by_path.remove(&path) {
            Some(existing) => existing.on(filter, handler),
            None => on(filter, handler),
        };
        by_path.insert(path, method_router);
    }
    let router = by_path
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| router.route(&path, method_router))
        .fallback(no_route);
    Ok(router)
}
