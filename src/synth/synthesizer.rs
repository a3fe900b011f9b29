//! Builds a `HandlerSurface` from descriptors and a bound store.

use crate::config::{OperationDescriptor, ResultKind, ValueType};
use crate::error::SynthesisError;
use crate::model::User;
use crate::store::{StoreOp, UserStore};
use crate::synth::surface::{BoundParameter, Delegate, HandlerSurface, SynthesizedMethod};
use std::collections::HashSet;
use std::sync::Arc;

/// Parameter types and result kind of each store operation.
pub fn delegate_signature(op: StoreOp) -> (&'static [ValueType], ResultKind) {
    use ValueType::*;
    match op {
        StoreOp::GetAll => (&[], ResultKind::List),
        StoreOp::GetById => (&[Long], ResultKind::Single),
        StoreOp::Save => (&[Entity], ResultKind::None),
        StoreOp::Update => (&[Long, Entity], ResultKind::None),
        StoreOp::UpdateField => (&[Long, Text], ResultKind::None),
        StoreOp::Delete => (&[Long], ResultKind::None),
    }
}

fn names(types: &[ValueType]) -> Vec<String> {
    types.iter().map(ToString::to_string).collect()
}

/// Constructs surfaces. Type names are unique for the life of the synthesizer.
#[derive(Debug, Default)]
pub struct Synthesizer {
    constructed: HashSet<String>,
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_constructed(&self, type_name: &str) -> bool {
        self.constructed.contains(type_name)
    }

    /// Build a surface whose methods mirror `descriptors` and delegate to `store`.
    /// Nothing is recorded unless every descriptor resolves.
    pub fn synthesize(
        &mut self,
        type_name: &str,
        descriptors: &[OperationDescriptor],
        store: Option<Arc<dyn UserStore>>,
    ) -> Result<HandlerSurface, SynthesisError> {
        let store = store.ok_or(SynthesisError::UnresolvedBackend)?;
        if self.constructed.contains(type_name) {
            return Err(SynthesisError::DuplicateTypeName(type_name.to_string()));
        }

        let mut methods = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            methods.push(build_method(descriptor, store.as_ref())?);
        }

        self.constructed.insert(type_name.to_string());
        let surface = HandlerSurface::new(type_name.to_string(), methods, store);
        tracing::info!(
            type_name = %surface.type_name(),
            methods = surface.methods().len(),
            "synthesized handler surface"
        );
        Ok(surface)
    }
}

fn build_method(descriptor: &OperationDescriptor, store: &dyn UserStore) -> Result<SynthesizedMethod, SynthesisError> {
    let op = StoreOp::from_name(&descriptor.delegate).ok_or_else(|| SynthesisError::UnknownDelegate {
        operation: descriptor.name.clone(),
        delegate: descriptor.delegate.clone(),
    })?;
    if !store.supports(op) {
        return Err(SynthesisError::UnsupportedDelegate {
            operation: descriptor.name.clone(),
            delegate: descriptor.delegate.clone(),
        });
    }

    let (expected, result) = delegate_signature(op);
    let found = descriptor.signature();
    if found != expected {
        return Err(SynthesisError::SignatureMismatch {
            operation: descriptor.name.clone(),
            delegate: descriptor.delegate.clone(),
            expected: names(expected),
            found: names(&found),
        });
    }
    if descriptor.result != result {
        return Err(SynthesisError::ResultMismatch {
            operation: descriptor.name.clone(),
            delegate: descriptor.delegate.clone(),
            expected: result.to_string(),
            found: descriptor.result.to_string(),
        });
    }

    let delegate = match op {
        StoreOp::GetAll => Delegate::GetAll,
        StoreOp::GetById => Delegate::GetById,
        StoreOp::Save => Delegate::Save,
        StoreOp::Update => Delegate::Update,
        StoreOp::UpdateField => {
            // the text parameter names the field it writes
            let field = descriptor.parameters[1].name.clone();
            if !User::is_mutable_field(&field) {
                return Err(SynthesisError::UnknownField {
                    operation: descriptor.name.clone(),
                    field,
                });
            }
            Delegate::UpdateField { field }
        }
        StoreOp::Delete => Delegate::Delete,
    };

    Ok(SynthesizedMethod {
        name: descriptor.name.clone(),
        parameters: descriptor
            .parameters
            .iter()
            .map(|p| BoundParameter {
                name: p.name.clone(),
                source: p.source,
                value_type: p.value_type,
            })
            .collect(),
        result: descriptor.result,
        delegate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{users_operations, ParameterSpec, SourceKind};
    use crate::error::AppError;
    use crate::store::InMemoryUserStore;
    use crate::synth::{ArgValue, Outcome};
    use async_trait::async_trait;

    fn store() -> Option<Arc<dyn UserStore>> {
        Some(Arc::new(InMemoryUserStore::new()))
    }

    #[test]
    fn builds_one_method_per_descriptor_in_order() {
        let ops = users_operations();
        let surface = Synthesizer::new().synthesize("Users", &ops, store()).unwrap();
        assert!(surface.is_controller());
        let names: Vec<&str> = surface.methods().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getAll", "getById", "save", "update", "updateNickName", "delete"]);
        let patch = &surface.methods()[4];
        assert_eq!(patch.delegate, Delegate::UpdateField { field: "nickName".into() });
        assert_eq!(patch.parameters[1].source, SourceKind::QueryParam);
    }

    #[test]
    fn resolves_by_name_and_signature() {
        let surface = Synthesizer::new().synthesize("Users", &users_operations(), store()).unwrap();
        assert_eq!(surface.resolve("update", &[ValueType::Long, ValueType::Entity]), Some(3));
        assert_eq!(surface.resolve("update", &[ValueType::Long]), None);
        assert_eq!(surface.resolve("missing", &[]), None);
    }

    #[test]
    fn missing_backend_fails() {
        let err = Synthesizer::new().synthesize("Users", &users_operations(), None).unwrap_err();
        assert!(matches!(err, SynthesisError::UnresolvedBackend));
    }

    #[test]
    fn type_names_are_unique_per_synthesizer() {
        let mut synth = Synthesizer::new();
        synth.synthesize("Users", &users_operations(), store()).unwrap();
        let err = synth.synthesize("Users", &users_operations(), store()).unwrap_err();
        assert!(matches!(err, SynthesisError::DuplicateTypeName(n) if n == "Users"));
        assert!(synth.synthesize("Users2", &users_operations(), store()).is_ok());
    }

    #[test]
    fn failed_synthesis_does_not_claim_the_name() {
        let mut synth = Synthesizer::new();
        let mut ops = users_operations();
        ops[0].delegate = "findAll".into();
        assert!(matches!(
            synth.synthesize("Users", &ops, store()),
            Err(SynthesisError::UnknownDelegate { .. })
        ));
        assert!(!synth.has_constructed("Users"));
    }

    #[test]
    fn signature_and_result_must_match_delegate() {
        let mut ops = users_operations();
        ops[1].parameters[0].value_type = ValueType::Text;
        assert!(matches!(
            Synthesizer::new().synthesize("A", &ops, store()),
            Err(SynthesisError::SignatureMismatch { .. })
        ));

        let mut ops = users_operations();
        ops[0].result = ResultKind::Single;
        assert!(matches!(
            Synthesizer::new().synthesize("B", &ops, store()),
            Err(SynthesisError::ResultMismatch { .. })
        ));
    }

    #[test]
    fn update_field_must_name_a_mutable_field() {
        let mut ops = users_operations();
        ops[4].parameters[1] = ParameterSpec::new("email", SourceKind::QueryParam, ValueType::Text);
        assert!(matches!(
            Synthesizer::new().synthesize("Users", &ops, store()),
            Err(SynthesisError::UnknownField { field, .. }) if field == "email"
        ));
    }

    struct ReadOnlyStore(InMemoryUserStore);

    #[async_trait]
    impl UserStore for ReadOnlyStore {
        async fn get_all(&self) -> Result<Vec<User>, AppError> {
            self.0.get_all().await
        }
        async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
            self.0.get_by_id(id).await
        }
        async fn save(&self, _user: User) -> Result<User, AppError> {
            Err(AppError::BadRequest("read only".into()))
        }
        async fn update(&self, _id: i64, _user: User) -> Result<User, AppError> {
            Err(AppError::BadRequest("read only".into()))
        }
        async fn update_field(&self, _id: i64, _field: &str, _value: String) -> Result<User, AppError> {
            Err(AppError::BadRequest("read only".into()))
        }
        async fn delete(&self, _id: i64) -> Result<bool, AppError> {
            Err(AppError::BadRequest("read only".into()))
        }
        fn supports(&self, op: StoreOp) -> bool {
            matches!(op, StoreOp::GetAll | StoreOp::GetById)
        }
    }

    #[test]
    fn unsupported_delegate_fails() {
        let store: Arc<dyn UserStore> = Arc::new(ReadOnlyStore(InMemoryUserStore::new()));
        let err = Synthesizer::new()
            .synthesize("Users", &users_operations(), Some(store.clone()))
            .unwrap_err();
        assert!(matches!(err, SynthesisError::UnsupportedDelegate { delegate, .. } if delegate == "save"));
        let read_ops: Vec<_> = users_operations().into_iter().take(2).collect();
        assert!(Synthesizer::new().synthesize("Reader", &read_ops, Some(store)).is_ok());
    }

    #[tokio::test]
    async fn methods_delegate_to_the_shared_store() {
        let backing = Arc::new(InMemoryUserStore::new());
        let shared: Arc<dyn UserStore> = backing.clone();
        let surface = Synthesizer::new()
            .synthesize("Users", &users_operations(), Some(shared))
            .unwrap();

        let save = surface.resolve("save", &[ValueType::Entity]).unwrap();
        let out = surface
            .invoke(save, vec![ArgValue::Entity(User::new("A", "B", "C"))])
            .await
            .unwrap();
        assert_eq!(out, Outcome::None);
        assert_eq!(backing.len(), 1);

        let patch = surface.resolve("updateNickName", &[ValueType::Long, ValueType::Text]).unwrap();
        surface
            .invoke(patch, vec![ArgValue::Long(1), ArgValue::Text("Z".into())])
            .await
            .unwrap();

        let get = surface.resolve("getById", &[ValueType::Long]).unwrap();
        match surface.invoke(get, vec![ArgValue::Long(1)]).await.unwrap() {
            Outcome::Single(Some(user)) => assert_eq!(user.nick_name, "Z"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn invoke_rejects_wrong_arguments() {
        let surface = Synthesizer::new().synthesize("Users", &users_operations(), store()).unwrap();
        let err = surface.invoke(1, vec![ArgValue::Text("1".into())]).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(surface.invoke(99, vec![]).await.is_err());
    }
}
