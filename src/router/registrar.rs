use crate::error::RegistrationError;
use crate::router::binding::RouteBinding;
use crate::router::table::{MethodRef, RouteEntry, RoutingTable};
use crate::synth::HandlerSurface;
use std::sync::Arc;

/// Publishes surface methods into a routing table.
pub struct RouteRegistrar<'a> {
    table: &'a mut RoutingTable,
}

impl<'a> RouteRegistrar<'a> {
    pub fn new(table: &'a mut RoutingTable) -> Self {
        Self { table }
    }

    /// Resolve every binding and publish them in order. Entries are staged on a copy of the
    /// table, so on any failure the table is left as it was.
    pub fn register(&mut self, surface: &Arc<HandlerSurface>, bindings: &[RouteBinding]) -> Result<(), RegistrationError> {
        let mut staged = self.table.clone();
        for binding in bindings {
            let index = surface
                .resolve(&binding.operation, &binding.signature)
                .ok_or_else(|| RegistrationError::MethodNotFound {
                    surface: surface.type_name().to_string(),
                    operation: binding.operation.clone(),
                    signature: binding
                        .signature
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                })?;
            staged.insert(RouteEntry {
                key: binding.key.clone(),
                produces: binding.produces,
                consumes: binding.consumes,
                handler: MethodRef {
                    surface: surface.clone(),
                    index,
                },
            })?;
        }
        *self.table = staged;

        for entry in &self.table.entries()[self.table.len() - bindings.len()..] {
            tracing::info!(route = %entry.key, handler = ?entry.handler, "registered route");
        }
        tracing::info!(
            type_name = %surface.type_name(),
            routes = bindings.len(),
            "registered request handlers for surface"
        );
        Ok(())
    }
}
