use crate::config::MediaType;
use crate::error::RegistrationError;
use crate::router::binding::RouteKey;
use crate::synth::{HandlerSurface, SynthesizedMethod};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A surface method bound to its instance.
#[derive(Clone)]
pub struct MethodRef {
    pub surface: Arc<HandlerSurface>,
    pub index: usize,
}

impl MethodRef {
    pub fn method(&self) -> Option<&SynthesizedMethod> {
        self.surface.method(self.index)
    }

    pub fn name(&self) -> &str {
        self.method().map(|m| m.name.as_str()).unwrap_or_default()
    }
}

impl fmt::Debug for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.surface.type_name(), self.name())
    }
}

#[derive(Clone, Debug)]
pub struct RouteEntry {
    pub key: RouteKey,
    pub produces: Option<MediaType>,
    pub consumes: Option<MediaType>,
    pub handler: MethodRef,
}

/// Template with placeholder names erased: `/users/{id}` becomes `/users/{}`.
fn template_shape(path: &str) -> String {
    path.split('/')
        .map(|seg| if seg.starts_with('{') && seg.ends_with('}') { "{}" } else { seg })
        .collect::<Vec<_>>()
        .join("/")
}

/// Route key to bound method. Append-only; duplicate keys are rejected.
#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    entries: Vec<Arc<RouteEntry>>,
    index: HashMap<RouteKey, usize>,
    shapes: HashMap<String, String>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: RouteEntry) -> Result<(), RegistrationError> {
        if self.index.contains_key(&entry.key) {
            return Err(RegistrationError::RouteCollision {
                method: entry.key.method.to_string(),
                path: entry.key.path.clone(),
            });
        }
        let shape = template_shape(&entry.key.path);
        if let Some(existing) = self.shapes.get(&shape) {
            if *existing != entry.key.path {
                return Err(RegistrationError::AmbiguousTemplate {
                    path: entry.key.path.clone(),
                    existing: existing.clone(),
                });
            }
        }
        self.shapes.insert(shape, entry.key.path.clone());
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(Arc::new(entry));
        Ok(())
    }

    pub fn contains(&self, key: &RouteKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &RouteKey) -> Option<&Arc<RouteEntry>> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[Arc<RouteEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn routes_for(&self, operation: &str) -> usize {
        self.entries.iter().filter(|e| e.handler.name() == operation).count()
    }

    /// Methods of `surface` that no entry points at.
    pub fn unrouted_operations(&self, surface: &HandlerSurface) -> Vec<String> {
        surface
            .methods()
            .iter()
            .filter(|m| {
                !self
                    .entries
                    .iter()
                    .any(|e| e.handler.surface.type_name() == surface.type_name() && e.handler.name() == m.name)
            })
            .map(|m| m.name.clone())
            .collect()
    }
}
