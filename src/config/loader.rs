//! Load a surface from JSON, or use the built-in users surface.

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::path::Path;

/// Parse and validate a surface from a JSON string.
pub fn load_from_str(json: &str) -> Result<SurfaceConfig, ConfigError> {
    let config: SurfaceConfig = serde_json::from_str(json)?;
    validate(&config)?;
    Ok(config)
}

/// Parse and validate a surface from a JSON file.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<SurfaceConfig, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let config = load_from_str(&raw)?;
    tracing::info!(
        path = %path.display(),
        operations = config.operations.len(),
        routes = config.routes.len(),
        "loaded surface config"
    );
    Ok(config)
}

fn param(name: &str, source: SourceKind, value_type: ValueType) -> ParameterSpec {
    ParameterSpec::new(name, source, value_type)
}

fn op(name: &str, result: ResultKind, parameters: Vec<ParameterSpec>, delegate: &str) -> OperationDescriptor {
    OperationDescriptor {
        name: name.into(),
        result,
        parameters,
        delegate: delegate.into(),
    }
}

fn route(
    operation: &str,
    signature: &[ValueType],
    method: &str,
    path: &str,
    produces: Option<MediaType>,
    consumes: Option<MediaType>,
) -> RouteBindingConfig {
    RouteBindingConfig {
        operation: operation.into(),
        signature: signature.to_vec(),
        method: method.into(),
        path: path.into(),
        produces,
        consumes,
    }
}

/// Operation descriptors for the user resource.
pub fn users_operations() -> Vec<OperationDescriptor> {
    use ResultKind as R;
    use SourceKind as S;
    use ValueType as V;
    vec![
        op("getAll", R::List, vec![], "getAll"),
        op("getById", R::Single, vec![param("id", S::QueryParam, V::Long)], "getById"),
        op("save", R::None, vec![param("user", S::RequestBody, V::Entity)], "save"),
        op(
            "update",
            R::None,
            vec![param("id", S::QueryParam, V::Long), param("user", S::RequestBody, V::Entity)],
            "update",
        ),
        op(
            "updateNickName",
            R::None,
            vec![param("id", S::QueryParam, V::Long), param("nickName", S::QueryParam, V::Text)],
            "updateField",
        ),
        op("delete", R::None, vec![param("id", S::PathSegment, V::Long)], "delete"),
    ]
}

/// Route table for the user resource. Trailing slash on list and path-segment id on delete are part of the contract.
pub fn users_routes() -> Vec<RouteBindingConfig> {
    use ValueType as V;
    let json = Some(MediaType::Json);
    vec![
        route("getAll", &[], "GET", "/users/", json, None),
        route("getById", &[V::Long], "GET", "/users", json, None),
        route("save", &[V::Entity], "POST", "/users", None, json),
        route("update", &[V::Long, V::Entity], "PUT", "/users", None, json),
        route("updateNickName", &[V::Long, V::Text], "PATCH", "/users", None, None),
        route("delete", &[V::Long], "DELETE", "/users/{id}", None, None),
    ]
}

/// The built-in users surface.
pub fn users_surface() -> SurfaceConfig {
    SurfaceConfig {
        type_name: "UserDynamicController".into(),
        operations: users_operations(),
        routes: users_routes(),
    }
}
