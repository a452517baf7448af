//! User repository implementation with optimistic locking.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity, Model};
use crate::errors::{AppError, AppResult};
use domain::{NewUser, UserRecord};

#[cfg(feature = "test-utils")]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Each method is one atomic unit of work against the backing store;
/// no transaction spans more than one call.
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new record, assigning id, creation timestamp and
    /// initial version
    async fn insert(&self, new_user: NewUser) -> AppResult<UserRecord>;

    /// Find a record by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<UserRecord>>;

    /// Find a record by exact email match
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Check whether an email is already taken
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// List all records in insertion order
    async fn list(&self) -> AppResult<Vec<UserRecord>>;

    /// Persist field changes, guarded by the optimistic version
    /// counter read at fetch time
    async fn update(&self, record: UserRecord) -> AppResult<UserRecord>;

    /// Remove a record; returns whether a row was deleted
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;
}

/// Outcome of the guarded update statement, resolved inside the
/// update transaction.
enum UpdateOutcome {
    Updated(Model),
    Missing,
    Stale,
}

/// Concrete implementation of UserRepository over SeaORM.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn insert(&self, new_user: NewUser) -> AppResult<UserRecord> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            age: Set(new_user.age),
            created_at: Set(Utc::now()),
            version: Set(1),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        tracing::info!(id = model.id, "created user");
        Ok(UserRecord::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<UserRecord>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(UserRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(UserRecord::from))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn list(&self) -> AppResult<Vec<UserRecord>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(UserRecord::from).collect())
    }

    async fn update(&self, record: UserRecord) -> AppResult<UserRecord> {
        let id = record.id;
        let expected_version = record.version;

        // Guarded update and the zero-rows diagnosis share one
        // transaction, so a concurrent writer cannot change the answer
        // between the two statements.
        let outcome = self
            .db
            .transaction::<_, UpdateOutcome, DbErr>(move |txn| {
                Box::pin(async move {
                    let result = UserEntity::update_many()
                        .col_expr(user::Column::Name, Expr::value(record.name))
                        .col_expr(user::Column::Email, Expr::value(record.email))
                        .col_expr(user::Column::Age, Expr::value(record.age))
                        .col_expr(user::Column::Version, Expr::value(expected_version + 1))
                        .filter(user::Column::Id.eq(id))
                        .filter(user::Column::Version.eq(expected_version))
                        .exec(txn)
                        .await?;

                    if result.rows_affected == 0 {
                        // Row gone vs. version stale
                        let exists = UserEntity::find_by_id(id).one(txn).await?.is_some();
                        return Ok(if exists {
                            UpdateOutcome::Stale
                        } else {
                            UpdateOutcome::Missing
                        });
                    }

                    let model = UserEntity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| DbErr::RecordNotFound(format!("user {id} after update")))?;
                    Ok(UpdateOutcome::Updated(model))
                })
            })
            .await
            .map_err(AppError::from)?;

        match outcome {
            UpdateOutcome::Updated(model) => {
                tracing::info!(id, "updated user");
                Ok(UserRecord::from(model))
            }
            UpdateOutcome::Stale => {
                tracing::warn!(id, expected_version, "optimistic lock conflict");
                Err(AppError::Concurrency(id))
            }
            UpdateOutcome::Missing => Err(AppError::NotFound(id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected > 0 {
            tracing::info!(id, "deleted user");
        }
        Ok(result.rows_affected > 0)
    }
}
