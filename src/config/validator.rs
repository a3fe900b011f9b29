//! Surface validation: descriptor well-formedness and route syntax.

use crate::config::{SourceKind, SurfaceConfig};
use crate::error::ConfigError;
use axum::http::Method;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Paths served by the common routes.
pub const RESERVED_PATHS: &[&str] = &["/health", "/version", "/routes"];

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"))
}

fn check_identifier(name: &str) -> Result<(), ConfigError> {
    if identifier_re().is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier(name.to_string()))
    }
}

/// Parse a route method. Only methods the dispatch layer can mount are accepted.
pub fn parse_method(raw: &str) -> Result<Method, ConfigError> {
    let method = match raw.to_ascii_uppercase().as_str() {
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        "HEAD" => Method::HEAD,
        "OPTIONS" => Method::OPTIONS,
        _ => return Err(ConfigError::InvalidMethod(raw.to_string())),
    };
    Ok(method)
}

/// Check a path template and return its `{name}` placeholders in order.
/// A single trailing slash is allowed and is significant.
pub fn path_placeholders(path: &str) -> Result<Vec<String>, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    let rest = path.strip_prefix('/').ok_or_else(|| invalid("must start with '/'"))?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for segment in rest.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty segment"));
        }
        if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            check_identifier(inner).map_err(|_| invalid("placeholder must be an identifier"))?;
            if names.iter().any(|n| n == inner) {
                return Err(invalid("placeholder repeated"));
            }
            names.push(inner.to_string());
        } else if segment.contains(['{', '}', ':', '*']) {
            return Err(invalid("placeholders must span a whole segment"));
        }
    }
    Ok(names)
}

pub fn validate(config: &SurfaceConfig) -> Result<(), ConfigError> {
    check_identifier(&config.type_name)?;
    if config.operations.is_empty() {
        return Err(ConfigError::Validation("at least one operation required".into()));
    }

    let mut names = HashSet::new();
    for op in &config.operations {
        check_identifier(&op.name)?;
        if !names.insert(op.name.as_str()) {
            return Err(ConfigError::DuplicateOperation(op.name.clone()));
        }
        let mut params = HashSet::new();
        for p in &op.parameters {
            check_identifier(&p.name)?;
            if !params.insert(p.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "operation '{}' repeats parameter '{}'",
                    op.name, p.name
                )));
            }
        }
        let bodies = op
            .parameters
            .iter()
            .filter(|p| p.source == SourceKind::RequestBody)
            .count();
        if bodies > 1 {
            return Err(ConfigError::MultipleBodies {
                operation: op.name.clone(),
            });
        }
    }

    for route in &config.routes {
        parse_method(&route.method)?;
        if RESERVED_PATHS.contains(&route.path.trim_end_matches('/')) {
            return Err(ConfigError::InvalidPath {
                path: route.path.clone(),
                reason: "reserved".into(),
            });
        }
        let placeholders = path_placeholders(&route.path)?;
        // unknown operations are reported by the registrar
        let Some(op) = config.operation(&route.operation) else {
            continue;
        };
        for p in op.parameters.iter().filter(|p| p.source == SourceKind::PathSegment) {
            if !placeholders.contains(&p.name) {
                return Err(ConfigError::InvalidPath {
                    path: route.path.clone(),
                    reason: format!("missing placeholder for path parameter '{}'", p.name),
                });
            }
        }
    }
    Ok(())
}
