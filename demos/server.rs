//! Demo server: reads settings from env, builds the users surface (or SURFACE_PATH), registers it, serves.

use dynroute_sdk::{build_app, load_surface, InMemoryUserStore, Settings, UserStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dynroute_sdk=info")),
        )
        .init();

    let store: Arc<dyn UserStore> = if settings.seed_stub_user {
        Arc::new(InMemoryUserStore::with_stub_user())
    } else {
        Arc::new(InMemoryUserStore::new())
    };

    let surface = load_surface(&settings).await?;
    let app = build_app(surface, &settings, store)?;

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
