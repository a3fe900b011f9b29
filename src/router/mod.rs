//! Route keys, the routing table, and the registrar that publishes a surface into it.

mod binding;
mod registrar;
mod table;

pub use binding::{RouteBinding, RouteKey};
pub use registrar::RouteRegistrar;
pub use table::{MethodRef, RouteEntry, RoutingTable};
