//! Backing store boundary and the in-memory implementation.

use crate::error::AppError;
use crate::model::User;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Store operations a descriptor may delegate to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetAll,
    GetById,
    Save,
    Update,
    UpdateField,
    Delete,
}

impl StoreOp {
    pub const ALL: [StoreOp; 6] = [
        StoreOp::GetAll,
        StoreOp::GetById,
        StoreOp::Save,
        StoreOp::Update,
        StoreOp::UpdateField,
        StoreOp::Delete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StoreOp::GetAll => "getAll",
            StoreOp::GetById => "getById",
            StoreOp::Save => "save",
            StoreOp::Update => "update",
            StoreOp::UpdateField => "updateField",
            StoreOp::Delete => "delete",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// CRUD over users. Implementations must be safe under concurrent calls.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<User>, AppError>;

    /// `Ok(None)` when the id is absent.
    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Assigns a fresh id (any id on the input is ignored) and returns the stored record.
    async fn save(&self, user: User) -> Result<User, AppError>;

    /// Replace all mutable fields. `NotFound` when the id is absent.
    async fn update(&self, id: i64, user: User) -> Result<User, AppError>;

    /// Replace one mutable field by wire name. `NotFound` when the id is absent.
    async fn update_field(&self, id: i64, field: &str, value: String) -> Result<User, AppError>;

    /// Remove if present. Returns whether a record was removed; absent ids are not an error.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    fn supports(&self, _op: StoreOp) -> bool {
        true
    }
}

/// Thread-safe keyed collection with monotonically increasing ids starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    next_id: AtomicI64,
    users: RwLock<BTreeMap<i64, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo record (id 1).
    pub fn with_stub_user() -> Self {
        let store = Self::new();
        let stub = store.insert(User::new("stubFirstName", "stubLastName", "stubNickName"));
        tracing::info!(user = ?stub, "seeded stub user");
        store
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, mut user: User) -> User {
        // id allocation and insert share the write lock so ids appear in the map in order
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        user.id = Some(id);
        users.insert(id, user.clone());
        user
    }

    fn modify<F>(&self, id: i64, f: F) -> Result<User, AppError>
    where
        F: FnOnce(&mut User) -> Result<(), AppError>,
    {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
        f(user)?;
        Ok(user.clone())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_all(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, AppError> {
        let saved = self.insert(user);
        tracing::debug!(id = ?saved.id, "saved user");
        Ok(saved)
    }

    async fn update(&self, id: i64, user: User) -> Result<User, AppError> {
        self.modify(id, |existing| {
            existing.replace_fields(user);
            Ok(())
        })
    }

    async fn update_field(&self, id: i64, field: &str, value: String) -> Result<User, AppError> {
        if !User::is_mutable_field(field) {
            return Err(AppError::BadRequest(format!("unknown field '{}'", field)));
        }
        self.modify(id, |existing| {
            existing.set_field(field, value);
            Ok(())
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        Ok(users.remove(&id).is_some())
    }
}
