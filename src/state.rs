//! Shared state for the common routes. The routing table is read-only once serving starts.

use crate::router::RoutingTable;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RoutingTable>,
}
