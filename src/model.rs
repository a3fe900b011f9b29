//! The managed resource.

use serde::{Deserialize, Serialize};

/// Fields that `updateField` may target, in wire (camelCase) form.
pub const MUTABLE_FIELDS: &[&str] = &["firstName", "lastName", "nickName"];

/// A user record. `id` is absent until the store assigns one on save.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nick_name: String,
}

impl User {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, nick_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            nick_name: nick_name.into(),
        }
    }

    pub fn is_mutable_field(name: &str) -> bool {
        MUTABLE_FIELDS.contains(&name)
    }

    /// Set one mutable field by its wire name. Returns false for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        match name {
            "firstName" => self.first_name = value,
            "lastName" => self.last_name = value,
            "nickName" => self.nick_name = value,
            _ => return false,
        }
        true
    }

    /// Copy every mutable field from `other`, keeping this record's id.
    pub fn replace_fields(&mut self, other: User) {
        self.first_name = other.first_name;
        self.last_name = other.last_name;
        self.nick_name = other.nick_name;
    }
}
