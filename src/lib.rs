//! dynroute SDK: synthesize a handler surface from operation descriptors and publish it into a routing table.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod router;
pub mod routes;
pub mod settings;
pub mod state;
pub mod store;
pub mod synth;

pub use bootstrap::{build_app, load_surface, Bootstrap, Registered, Synthesized};
pub use config::{load_from_path, load_from_str, users_surface, SurfaceConfig};
pub use error::{AppError, ConfigError, RegistrationError, SynthesisError};
pub use model::User;
pub use router::{RouteBinding, RouteKey, RouteRegistrar, RoutingTable};
pub use routes::{common_routes_with_table, surface_routes};
pub use settings::Settings;
pub use state::AppState;
pub use store::{InMemoryUserStore, StoreOp, UserStore};
pub use synth::{HandlerSurface, Synthesizer};
