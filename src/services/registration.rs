//! Registration use case: unregistered → pending-verification.

use std::sync::Arc;

use crate::domain::{EventBus, User, UserRegistered};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Creates accounts and announces them on the event bus.
pub struct RegistrationService {
    user_repository: Arc<dyn UserRepository>,
    bus: Arc<EventBus>,
}

impl RegistrationService {
    pub fn new(user_repository: Arc<dyn UserRepository>, bus: Arc<EventBus>) -> Self {
        Self {
            user_repository,
            bus,
        }
    }

    /// Register a new account.
    ///
    /// The `exists_by_email` pre-check gives a friendly conflict for the
    /// common case; the store's unique index is the authority when the
    /// check races with a concurrent insert.
    pub async fn register_user(&self, email: &str, name: &str, password: &str) -> AppResult<User> {
        let candidate = User::register(email, name, password)?;

        if self.user_repository.exists_by_email(&candidate.email).await? {
            return Err(AppError::conflict("User"));
        }

        let user = self.user_repository.add(&candidate).await?;

        tracing::info!(user_id = ?user.id, "User registered");

        self.bus
            .dispatch(
                &UserRegistered {
                    user_id: user.id.unwrap_or_default(),
                    email: user.email.to_string(),
                    verification_token: user.verification_token.clone().unwrap_or_default(),
                }
                .into(),
            )
            .await;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventBus;
    use crate::infra::MockUserRepository;

    fn service(repo: MockUserRepository) -> RegistrationService {
        RegistrationService::new(Arc::new(repo), Arc::new(EventBus::new()))
    }

    #[tokio::test]
    async fn existing_email_is_a_conflict_before_insert() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(true));
        repo.expect_add().never();

        let result = service(repo)
            .register_user("taken@example.com", "Taken", "password123")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn store_conflict_survives_a_stale_pre_check() {
        // exists_by_email raced with a concurrent insert
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(false));
        repo.expect_add()
            .returning(|_| Err(AppError::conflict("User")));

        let result = service(repo)
            .register_user("raced@example.com", "Raced", "password123")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn invalid_email_never_reaches_the_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().never();
        repo.expect_add().never();

        let result = service(repo)
            .register_user("not-an-email", "Nobody", "password123")
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn registered_user_carries_the_store_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(false));
        repo.expect_add().returning(|user| {
            let mut stored = user.clone();
            stored.id = Some(7);
            Ok(stored)
        });

        let user = service(repo)
            .register_user("new@example.com", "New", "password123")
            .await
            .unwrap();

        assert_eq!(user.id, Some(7));
    }
}
