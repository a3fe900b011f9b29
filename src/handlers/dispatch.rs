//! Generic handler: extract arguments per parameter metadata, invoke the bound method, render the outcome.

use crate::config::{MediaType, SourceKind, ValueType};
use crate::error::AppError;
use crate::extractors::RequestArgs;
use crate::model::User;
use crate::response::render_outcome;
use crate::router::RouteEntry;
use crate::synth::{ArgValue, BoundParameter};
use axum::response::Response;

fn check_content_type(entry: &RouteEntry, args: &RequestArgs) -> Result<(), AppError> {
    let Some(expected) = entry.consumes else {
        return Ok(());
    };
    let essence = args
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(|s| s.trim().to_ascii_lowercase());
    match (expected, essence.as_deref()) {
        (MediaType::Json, Some("application/json")) => Ok(()),
        (media, found) => Err(AppError::UnsupportedMediaType(format!(
            "expected {}, got {}",
            media.as_str(),
            found.unwrap_or("none")
        ))),
    }
}

fn raw_value<'a>(param: &BoundParameter, args: &'a RequestArgs) -> Result<&'a str, AppError> {
    let (map, what) = match param.source {
        SourceKind::PathSegment => (&args.path, "path segment"),
        SourceKind::QueryParam => (&args.query, "query parameter"),
        SourceKind::RequestBody => {
            return Err(AppError::Internal(format!("'{}' is not a keyed parameter", param.name)))
        }
    };
    map.get(&param.name)
        .map(String::as_str)
        .ok_or_else(|| AppError::BadRequest(format!("missing {} '{}'", what, param.name)))
}

fn convert_scalar(param: &BoundParameter, raw: &str) -> Result<ArgValue, AppError> {
    match param.value_type {
        ValueType::Long => raw
            .trim()
            .parse::<i64>()
            .map(ArgValue::Long)
            .map_err(|_| AppError::BadRequest(format!("invalid value for '{}': {}", param.name, raw))),
        ValueType::Text => Ok(ArgValue::Text(raw.to_string())),
        ValueType::Entity => serde_json::from_str::<User>(raw)
            .map(ArgValue::Entity)
            .map_err(|e| AppError::BadRequest(format!("invalid value for '{}': {}", param.name, e))),
    }
}

fn convert_body(param: &BoundParameter, args: &RequestArgs) -> Result<ArgValue, AppError> {
    if args.body.is_empty() {
        return Err(AppError::BadRequest(format!("request body '{}' is required", param.name)));
    }
    match param.value_type {
        ValueType::Entity => serde_json::from_slice::<User>(&args.body)
            .map(ArgValue::Entity)
            .map_err(|e| AppError::BadRequest(format!("invalid body: {}", e))),
        ValueType::Long => serde_json::from_slice::<i64>(&args.body)
            .map(ArgValue::Long)
            .map_err(|e| AppError::BadRequest(format!("invalid body: {}", e))),
        ValueType::Text => serde_json::from_slice::<String>(&args.body)
            .map(ArgValue::Text)
            .map_err(|e| AppError::BadRequest(format!("invalid body: {}", e))),
    }
}

/// Build the argument list for `entry` in declared parameter order.
pub fn extract_arguments(entry: &RouteEntry, args: &RequestArgs) -> Result<Vec<ArgValue>, AppError> {
    let method = entry
        .handler
        .method()
        .ok_or_else(|| AppError::Internal(format!("dangling route {}", entry.key)))?;
    method
        .parameters
        .iter()
        .map(|param| match param.source {
            SourceKind::RequestBody => convert_body(param, args),
            SourceKind::PathSegment | SourceKind::QueryParam => convert_scalar(param, raw_value(param, args)?),
        })
        .collect()
}

pub async fn dispatch(entry: &RouteEntry, args: RequestArgs) -> Result<Response, AppError> {
    check_content_type(entry, &args)?;
    let arguments = extract_arguments(entry, &args)?;
    tracing::debug!(route = %entry.key, handler = ?entry.handler, "dispatch");
    let outcome = entry.handler.surface.invoke(entry.handler.index, arguments).await?;
    Ok(render_outcome(&entry.key.method, entry.produces, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::users_surface;
    use crate::router::{RouteBinding, RouteKey, RouteRegistrar, RoutingTable};
    use crate::store::{InMemoryUserStore, UserStore};
    use crate::synth::Synthesizer;
    use axum::http::Method;
    use std::sync::Arc;

    fn table() -> RoutingTable {
        let config = users_surface();
        let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let surface = Arc::new(
            Synthesizer::new()
                .synthesize(&config.type_name, &config.operations, Some(store))
                .unwrap(),
        );
        let mut table = RoutingTable::new();
        let bindings = RouteBinding::from_configs(&config.routes).unwrap();
        RouteRegistrar::new(&mut table).register(&surface, &bindings).unwrap();
        table
    }

    fn args(query: &[(&str, &str)], body: &str) -> RequestArgs {
        RequestArgs {
            query: query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            content_type: Some("application/json; charset=utf-8".into()),
            body: body.as_bytes().to_vec().into(),
            ..Default::default()
        }
    }

    #[test]
    fn arguments_follow_parameter_order_and_sources() {
        let table = table();
        let put = table.get(&RouteKey::new(Method::PUT, "/users")).unwrap();
        let values = extract_arguments(put, &args(&[("id", "3")], r#"{"firstName":"A","lastName":"B","nickName":"C"}"#)).unwrap();
        assert_eq!(values, vec![ArgValue::Long(3), ArgValue::Entity(User::new("A", "B", "C"))]);

        let patch = table.get(&RouteKey::new(Method::PATCH, "/users")).unwrap();
        let values = extract_arguments(patch, &args(&[("id", "3"), ("nickName", "Z")], "")).unwrap();
        assert_eq!(values, vec![ArgValue::Long(3), ArgValue::Text("Z".into())]);
    }

    #[test]
    fn missing_or_malformed_values_are_bad_requests() {
        let table = table();
        let patch = table.get(&RouteKey::new(Method::PATCH, "/users")).unwrap();
        assert!(matches!(extract_arguments(patch, &args(&[("id", "3")], "")), Err(AppError::BadRequest(_))));
        assert!(matches!(
            extract_arguments(patch, &args(&[("id", "x"), ("nickName", "Z")], "")),
            Err(AppError::BadRequest(_))
        ));
        let post = table.get(&RouteKey::new(Method::POST, "/users")).unwrap();
        assert!(matches!(extract_arguments(post, &args(&[], "[1,2]")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let table = table();
        let post = table.get(&RouteKey::new(Method::POST, "/users")).unwrap();
        assert!(check_content_type(post, &args(&[], "{}")).is_ok());
        let mut plain = args(&[], "{}");
        plain.content_type = None;
        assert!(matches!(check_content_type(post, &plain), Err(AppError::UnsupportedMediaType(_))));
    }
}
