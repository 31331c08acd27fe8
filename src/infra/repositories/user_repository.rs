//! User repository - persistence contract and SeaORM implementation.
//!
//! The contract is the seam mocked in tests; `UserStore` is the concrete
//! Postgres-backed store. Staff flags are recomputed from the role on every
//! write so they can never drift from it.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, Unchanged,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{Email, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};

use super::entities::user::{ActiveModel, Column, Entity as UserEntity, Model};

/// Persistence contract for the User aggregate.
///
/// Each call is individually atomic; there are no cross-call transaction
/// guarantees. `add` surfaces a unique-email violation as a conflict even
/// when a prior `exists_by_email` answered false.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new aggregate; returns it with the store-assigned id.
    async fn add(&self, user: &User) -> AppResult<User>;

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool>;

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    /// Fails with `NotFound` when the id is unknown.
    async fn get_by_id(&self, id: i64) -> AppResult<User>;

    /// Full overwrite of mutable fields by id.
    async fn update(&self, user: &User) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_entity(model: Model) -> AppResult<User> {
    Ok(User::from_store(
        model.id,
        Email::new(&model.email)?,
        model.name,
        model.bio,
        model.password_hash,
        model.is_verified,
        model.verification_token,
        UserRole::from(model.role.as_str()),
    ))
}

fn map_insert_err(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("User"),
        _ => AppError::from(e),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn add(&self, user: &User) -> AppResult<User> {
        let flags = user.staff_flags();
        let now = Utc::now();

        let active = ActiveModel {
            id: NotSet,
            email: Set(user.email.to_string()),
            name: Set(user.name.clone()),
            bio: Set(user.bio.clone()),
            password_hash: Set(user.password_hash().to_string()),
            is_verified: Set(user.is_verified),
            verification_token: Set(user.verification_token.clone()),
            role: Set(user.role.to_string()),
            is_staff: Set(flags.is_staff),
            is_superuser: Set(flags.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await.map_err(map_insert_err)?;
        to_entity(model)
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        let found = UserEntity::find()
            .filter(Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;

        model.map(to_entity).transpose()
    }

    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;
        to_entity(model)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let id = user
            .id
            .ok_or_else(|| AppError::internal("Cannot update an unpersisted user"))?;
        let flags = user.staff_flags();

        let active = ActiveModel {
            id: Unchanged(id),
            email: Set(user.email.to_string()),
            name: Set(user.name.clone()),
            bio: Set(user.bio.clone()),
            password_hash: Set(user.password_hash().to_string()),
            is_verified: Set(user.is_verified),
            verification_token: Set(user.verification_token.clone()),
            role: Set(user.role.to_string()),
            is_staff: Set(flags.is_staff),
            is_superuser: Set(flags.is_superuser),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        };

        match active.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(map_insert_err(e)),
        }
    }
}
