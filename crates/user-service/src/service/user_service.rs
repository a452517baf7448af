//! User service - orchestrates validation, uniqueness checks and
//! store calls. The only API the outer application uses.

use async_trait::async_trait;
use std::sync::Arc;

use domain::validation::{self, AGE_RULE, EMAIL_RULE, NAME_RULE};
use domain::{NewUser, UserPatch, UserRecord};

use crate::errors::{AppError, AppResult};
use crate::repository::UserRepository;

/// User service trait for dependency injection.
///
/// All inputs are raw and untrusted; strings are expected to arrive
/// already trimmed by the caller (see `register`/`modify`), except
/// `find_by_email`, which trims before the lookup.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user after validating all fields and checking
    /// email uniqueness. Returns the persisted record with assigned
    /// id, timestamp and initial version.
    async fn register(&self, name: String, email: String, age: i32) -> AppResult<UserRecord>;

    /// Look up a user by ID. Absence is `Ok(None)`, not an error.
    async fn get_by_id(&self, id: i64) -> AppResult<Option<UserRecord>>;

    /// List all users in insertion order.
    async fn list_all(&self) -> AppResult<Vec<UserRecord>>;

    /// Apply the supplied fields of `patch` to an existing user.
    /// Unsupplied fields are left unchanged.
    async fn modify(&self, id: i64, patch: UserPatch) -> AppResult<UserRecord>;

    /// Delete a user. Returns `false` when no such id existed.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Exact-match lookup by email. Absence is `Ok(None)`.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;
}

/// Concrete implementation of UserService using the repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Validate registration input, first failing field wins.
    /// Evaluation order is fixed: name, then email, then age.
    fn validate_new_user(name: &str, email: &str, age: i32) -> AppResult<()> {
        if !validation::is_valid_name(name) {
            return Err(AppError::validation("name", NAME_RULE));
        }
        if !validation::is_valid_email(email) {
            return Err(AppError::validation("email", EMAIL_RULE));
        }
        if !validation::is_valid_age(age) {
            return Err(AppError::validation("age", AGE_RULE));
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, name: String, email: String, age: i32) -> AppResult<UserRecord> {
        Self::validate_new_user(&name, &email, age)?;

        // Best-effort pre-check; the UNIQUE constraint on the email
        // column backstops the race between check and insert.
        if self.repo.exists_by_email(&email).await? {
            return Err(AppError::Conflict(email));
        }

        self.repo.insert(NewUser { name, email, age }).await
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<UserRecord>> {
        if id <= 0 {
            return Err(AppError::validation("id", "id must be a positive number"));
        }
        self.repo.find_by_id(id).await
    }

    async fn list_all(&self) -> AppResult<Vec<UserRecord>> {
        self.repo.list().await
    }

    async fn modify(&self, id: i64, patch: UserPatch) -> AppResult<UserRecord> {
        let mut record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))?;

        // Fields are applied in name, email, age order; the first
        // failing field aborts before anything is persisted.
        if let Some(name) = patch.name {
            if !validation::is_valid_name(&name) {
                return Err(AppError::validation("name", NAME_RULE));
            }
            record.name = name;
        }

        if let Some(email) = patch.email {
            if !validation::is_valid_email(&email) {
                return Err(AppError::validation("email", EMAIL_RULE));
            }
            // Re-check uniqueness only when the address actually
            // changes; keeping the current one must not conflict
            // with itself.
            if email != record.email {
                if self.repo.exists_by_email(&email).await? {
                    return Err(AppError::Conflict(email));
                }
                record.email = email;
            }
        }

        if let Some(age) = patch.age {
            if !validation::is_valid_age(age) {
                return Err(AppError::validation("age", AGE_RULE));
            }
            record.age = age;
        }

        self.repo.update(record).await
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        if id <= 0 {
            return Err(AppError::validation("id", "id must be a positive number"));
        }
        self.repo.delete_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("email", "email must not be blank"));
        }
        self.repo.find_by_email(email).await
    }
}
