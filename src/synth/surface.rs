//! The synthesized handler surface and its methods.

use crate::config::{ResultKind, SourceKind, ValueType};
use crate::error::AppError;
use crate::model::User;
use crate::store::UserStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Store call a method forwards to. `UpdateField` carries the field it writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delegate {
    GetAll,
    GetById,
    Save,
    Update,
    UpdateField { field: String },
    Delete,
}

/// A parameter with its extraction metadata, consumed by the dispatch layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoundParameter {
    pub name: String,
    pub source: SourceKind,
    pub value_type: ValueType,
}

/// An argument extracted from a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgValue {
    Long(i64),
    Text(String),
    Entity(User),
}

impl ArgValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ArgValue::Long(_) => ValueType::Long,
            ArgValue::Text(_) => ValueType::Text,
            ArgValue::Entity(_) => ValueType::Entity,
        }
    }
}

/// What a method returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    List(Vec<User>),
    Single(Option<User>),
    None,
}

#[derive(Clone, Debug)]
pub struct SynthesizedMethod {
    pub name: String,
    pub parameters: Vec<BoundParameter>,
    pub result: ResultKind,
    pub delegate: Delegate,
}

impl SynthesizedMethod {
    pub fn signature(&self) -> Vec<ValueType> {
        self.parameters.iter().map(|p| p.value_type).collect()
    }

    /// Forward `args` to the store in declaration order and return the result unchanged.
    pub async fn invoke(&self, store: &dyn UserStore, args: Vec<ArgValue>) -> Result<Outcome, AppError> {
        let found: Vec<ValueType> = args.iter().map(ArgValue::value_type).collect();
        if found != self.signature() {
            return Err(AppError::Internal(format!(
                "{} called with {:?}, expects {:?}",
                self.name,
                found,
                self.signature()
            )));
        }
        let mut args = args.into_iter();
        let outcome = match &self.delegate {
            Delegate::GetAll => Outcome::List(store.get_all().await?),
            Delegate::GetById => Outcome::Single(store.get_by_id(take_long(&mut args)?).await?),
            Delegate::Save => {
                store.save(take_entity(&mut args)?).await?;
                Outcome::None
            }
            Delegate::Update => {
                let id = take_long(&mut args)?;
                store.update(id, take_entity(&mut args)?).await?;
                Outcome::None
            }
            Delegate::UpdateField { field } => {
                let id = take_long(&mut args)?;
                store.update_field(id, field, take_text(&mut args)?).await?;
                Outcome::None
            }
            Delegate::Delete => {
                store.delete(take_long(&mut args)?).await?;
                Outcome::None
            }
        };
        Ok(outcome)
    }
}

fn take_long(args: &mut impl Iterator<Item = ArgValue>) -> Result<i64, AppError> {
    match args.next() {
        Some(ArgValue::Long(n)) => Ok(n),
        other => Err(AppError::Internal(format!("expected long argument, got {:?}", other))),
    }
}

fn take_text(args: &mut impl Iterator<Item = ArgValue>) -> Result<String, AppError> {
    match args.next() {
        Some(ArgValue::Text(s)) => Ok(s),
        other => Err(AppError::Internal(format!("expected text argument, got {:?}", other))),
    }
}

fn take_entity(args: &mut impl Iterator<Item = ArgValue>) -> Result<User, AppError> {
    match args.next() {
        Some(ArgValue::Entity(u)) => Ok(u),
        other => Err(AppError::Internal(format!("expected entity argument, got {:?}", other))),
    }
}

/// One synthesized handler: named methods sharing a single bound store.
pub struct HandlerSurface {
    type_name: String,
    controller: bool,
    methods: Vec<SynthesizedMethod>,
    store: Arc<dyn UserStore>,
}

impl HandlerSurface {
    pub(crate) fn new(type_name: String, methods: Vec<SynthesizedMethod>, store: Arc<dyn UserStore>) -> Self {
        Self {
            type_name,
            controller: true,
            methods,
            store,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Marks the surface's methods as route-eligible. Carries no path information.
    pub fn is_controller(&self) -> bool {
        self.controller
    }

    pub fn methods(&self) -> &[SynthesizedMethod] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> Option<&SynthesizedMethod> {
        self.methods.get(index)
    }

    /// Find a method by name and exact parameter type signature.
    pub fn resolve(&self, name: &str, signature: &[ValueType]) -> Option<usize> {
        self.methods
            .iter()
            .position(|m| m.name == name && m.signature() == signature)
    }

    pub async fn invoke(&self, index: usize, args: Vec<ArgValue>) -> Result<Outcome, AppError> {
        let method = self
            .methods
            .get(index)
            .ok_or_else(|| AppError::Internal(format!("{} has no method #{}", self.type_name, index)))?;
        method.invoke(self.store.as_ref(), args).await
    }
}

impl fmt::Debug for HandlerSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSurface")
            .field("type_name", &self.type_name)
            .field("controller", &self.controller)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}
