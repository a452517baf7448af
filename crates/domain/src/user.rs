//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User domain entity.
///
/// `id`, `created_at` and `version` are assigned by the store: `id`
/// on insert and immutable afterwards, `created_at` once at insert,
/// `version` starting at 1 and incremented on every successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency counter used to detect lost updates.
    pub version: i64,
}

/// User creation data transfer object.
///
/// Carries raw candidate values; validation happens in the service.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// User full name
    pub name: String,
    /// User email address
    pub email: String,
    /// User age in years
    pub age: i32,
}

/// User update data transfer object.
///
/// `None` means "leave the field unchanged" and is distinct from an
/// empty string, which is a candidate value and fails validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    /// New full name
    pub name: Option<String>,
    /// New email address
    pub email: Option<String>,
    /// New age in years
    pub age: Option<i32>,
}

impl UserPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}
