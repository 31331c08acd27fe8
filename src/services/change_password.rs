//! Password change use case.

use std::sync::Arc;

use crate::domain::{EventBus, PasswordChanged, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

pub struct ChangePasswordService {
    user_repository: Arc<dyn UserRepository>,
    bus: Arc<EventBus>,
}

impl ChangePasswordService {
    pub fn new(user_repository: Arc<dyn UserRepository>, bus: Arc<EventBus>) -> Self {
        Self {
            user_repository,
            bus,
        }
    }

    /// Replace the password after checking the old one.
    ///
    /// The stored hash is untouched when the old password does not match.
    pub async fn change_password(
        &self,
        mut user: User,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<User> {
        if !user.check_password(old_password) {
            return Err(AppError::InvalidOldPassword);
        }

        user.set_password(new_password)?;
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = ?user.id, "Password changed");

        self.bus
            .dispatch(
                &PasswordChanged {
                    user_id: user.id.unwrap_or_default(),
                    email: user.email.to_string(),
                }
                .into(),
            )
            .await;

        Ok(user)
    }
}
