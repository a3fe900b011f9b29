use crate::config::{parse_method, path_placeholders, MediaType, RouteBindingConfig, ValueType};
use crate::error::ConfigError;
use axum::http::Method;
use std::fmt;

/// HTTP method plus exact path template. `/users` and `/users/` are different keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A route for one surface method: which method (name + signature), where, and media expectations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteBinding {
    pub key: RouteKey,
    pub operation: String,
    pub signature: Vec<ValueType>,
    pub produces: Option<MediaType>,
    pub consumes: Option<MediaType>,
}

impl RouteBinding {
    pub fn new(method: Method, path: impl Into<String>, operation: impl Into<String>, signature: Vec<ValueType>) -> Self {
        Self {
            key: RouteKey::new(method, path),
            operation: operation.into(),
            signature,
            produces: None,
            consumes: None,
        }
    }

    pub fn from_config(config: &RouteBindingConfig) -> Result<Self, ConfigError> {
        let method = parse_method(&config.method)?;
        path_placeholders(&config.path)?;
        Ok(Self {
            key: RouteKey::new(method, config.path.clone()),
            operation: config.operation.clone(),
            signature: config.signature.clone(),
            produces: config.produces,
            consumes: config.consumes,
        })
    }

    pub fn from_configs(configs: &[RouteBindingConfig]) -> Result<Vec<Self>, ConfigError> {
        configs.iter().map(Self::from_config).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::users_routes;

    #[test]
    fn trailing_slash_makes_a_distinct_key() {
        assert_ne!(RouteKey::new(Method::GET, "/users"), RouteKey::new(Method::GET, "/users/"));
    }

    #[test]
    fn converts_user_routes() {
        let bindings = RouteBinding::from_configs(&users_routes()).unwrap();
        assert_eq!(bindings.len(), 6);
        assert_eq!(bindings[5].key.to_string(), "DELETE /users/{id}");
        assert_eq!(bindings[2].consumes, Some(MediaType::Json));
    }

    #[test]
    fn invalid_method_is_a_config_error() {
        let mut routes = users_routes();
        routes[0].method = "BREW".into();
        assert!(matches!(
            RouteBinding::from_configs(&routes),
            Err(ConfigError::InvalidMethod(_))
        ));
    }
}
