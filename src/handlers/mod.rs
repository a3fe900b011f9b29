//! HTTP handlers: generic dispatch to bound surface methods, and routing-table introspection.

pub mod dispatch;
pub mod introspect;
pub use dispatch::*;
pub use introspect::*;
