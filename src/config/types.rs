//! Declarative surface types matching the JSON surface file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a parameter's value comes from in the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PathSegment,
    QueryParam,
    RequestBody,
}

/// Scalar-or-entity parameter type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Long,
    Text,
    Entity,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Long => "long",
            ValueType::Text => "text",
            ValueType::Entity => "entity",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    List,
    Single,
    None,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultKind::List => "list",
            ResultKind::Single => "single",
            ResultKind::None => "none",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "application/json")]
    Json,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub source: SourceKind,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, source: SourceKind, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            source,
            value_type,
        }
    }
}

/// One operation to expose on the synthesized surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    pub result: ResultKind,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    /// Store operation name, e.g. "getById".
    pub delegate: String,
}

impl OperationDescriptor {
    pub fn signature(&self) -> Vec<ValueType> {
        self.parameters.iter().map(|p| p.value_type).collect()
    }
}

/// Route for one operation, as written in the surface file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteBindingConfig {
    pub operation: String,
    #[serde(default)]
    pub signature: Vec<ValueType>,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub produces: Option<MediaType>,
    #[serde(default)]
    pub consumes: Option<MediaType>,
}

/// Operation descriptor set plus the route table for one surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub type_name: String,
    pub operations: Vec<OperationDescriptor>,
    #[serde(default)]
    pub routes: Vec<RouteBindingConfig>,
}

impl SurfaceConfig {
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|o| o.name == name)
    }
}
