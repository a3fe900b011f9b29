//! Staged startup: validate, synthesize, register, then serve.
//! Each stage consumes the previous one, so the order cannot be skipped or repeated.

use crate::config::{users_surface, SurfaceConfig};
use crate::error::{AppError, ConfigError, RegistrationError, SynthesisError};
use crate::router::{RouteBinding, RouteRegistrar, RoutingTable};
use crate::routes::{common_routes_with_table, surface_routes};
use crate::settings::Settings;
use crate::state::AppState;
use crate::store::UserStore;
use crate::synth::{HandlerSurface, Synthesizer};
use axum::Router;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// A validated surface config, ready for synthesis.
#[derive(Debug)]
pub struct Bootstrap {
    config: SurfaceConfig,
}

impl Bootstrap {
    pub fn new(config: SurfaceConfig) -> Result<Self, ConfigError> {
        crate::config::validate(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn synthesize(self, synthesizer: &mut Synthesizer, store: Arc<dyn UserStore>) -> Result<Synthesized, SynthesisError> {
        let bindings = RouteBinding::from_configs(&self.config.routes)?;
        let surface = synthesizer.synthesize(&self.config.type_name, &self.config.operations, Some(store))?;
        Ok(Synthesized {
            surface: Arc::new(surface),
            bindings,
        })
    }
}

/// A synthesized surface and the bindings that will publish it.
#[derive(Debug)]
pub struct Synthesized {
    surface: Arc<HandlerSurface>,
    bindings: Vec<RouteBinding>,
}

impl Synthesized {
    pub fn surface(&self) -> &Arc<HandlerSurface> {
        &self.surface
    }

    /// Register into a fresh routing table.
    pub fn register(self) -> Result<Registered, RegistrationError> {
        self.register_into(RoutingTable::new())
    }

    /// Register into an existing table, e.g. one already holding another surface.
    pub fn register_into(self, mut table: RoutingTable) -> Result<Registered, RegistrationError> {
        RouteRegistrar::new(&mut table).register(&self.surface, &self.bindings)?;
        let unrouted = table.unrouted_operations(&self.surface);
        if !unrouted.is_empty() {
            tracing::warn!(type_name = %self.surface.type_name(), ?unrouted, "operations without a route");
        }
        Ok(Registered {
            surface: self.surface,
            table: Arc::new(table),
        })
    }
}

/// A surface published into a routing table. The table is frozen from here on.
#[derive(Debug)]
pub struct Registered {
    surface: Arc<HandlerSurface>,
    table: Arc<RoutingTable>,
}

impl Registered {
    pub fn surface(&self) -> &Arc<HandlerSurface> {
        &self.surface
    }

    pub fn table(&self) -> &Arc<RoutingTable> {
        &self.table
    }

    /// Surface routes plus the common routes.
    pub fn into_router(self) -> Result<Router, AppError> {
        let state = AppState {
            table: self.table.clone(),
        };
        Ok(Router::new()
            .merge(common_routes_with_table(state))
            .merge(surface_routes(&self.table)?))
    }
}

/// Load the configured surface (or the built-in users surface).
pub async fn load_surface(settings: &Settings) -> Result<SurfaceConfig, ConfigError> {
    match &settings.surface_path {
        Some(path) => crate::config::load_from_path(path).await,
        None => Ok(users_surface()),
    }
}

/// Run every startup stage against `store` and return the app, ready to serve.
pub fn build_app(config: SurfaceConfig, settings: &Settings, store: Arc<dyn UserStore>) -> Result<Router, AppError> {
    let mut synthesizer = Synthesizer::new();
    let registered = Bootstrap::new(config)?
        .synthesize(&mut synthesizer, store)?
        .register()?;
    tracing::info!(routes = registered.table().len(), "routing table ready");
    Ok(registered
        .into_router()?
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes)))
}
