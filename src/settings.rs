//! Process settings from the environment (`.env` is honored).

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    /// JSON surface file. `None` uses the built-in users surface.
    pub surface_path: Option<PathBuf>,
    /// Seed the store with the demo record before serving.
    pub seed_stub_user: bool,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            surface_path: None,
            seed_stub_user: false,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let bind_addr = lookup("BIND_ADDR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.bind_addr);
        let surface_path = lookup("SURFACE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let seed_stub_user = match lookup("SEED_STUB_USER") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::Load(format!("SEED_STUB_USER: expected a boolean, got '{}'", raw)))?,
            None => defaults.seed_stub_user,
        };
        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Load(format!("BODY_LIMIT_BYTES: expected a size in bytes, got '{}'", raw)))?,
            None => defaults.body_limit_bytes,
        };
        Ok(Self {
            bind_addr,
            surface_path,
            seed_stub_user,
            body_limit_bytes,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
