//! Email verification use case: pending-verification → verified.

use std::sync::Arc;

use crate::domain::{Email, EmailVerified, EventBus, User, UserRegistered};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

pub struct EmailVerificationService {
    user_repository: Arc<dyn UserRepository>,
    bus: Arc<EventBus>,
}

impl EmailVerificationService {
    pub fn new(user_repository: Arc<dyn UserRepository>, bus: Arc<EventBus>) -> Self {
        Self {
            user_repository,
            bus,
        }
    }

    /// Confirm an address with its verification token.
    ///
    /// Unknown address and wrong token both fail with the same error so the
    /// endpoint cannot be used to probe for accounts. Verification is a
    /// terminal transition: the token is cleared on success, so a repeat
    /// call with the stale token fails.
    pub async fn verify_email(&self, email: &str, token: &str) -> AppResult<User> {
        let email = Email::new(email)?;
        let user = self.user_repository.find_by_email(&email).await?;

        let mut user = match user {
            Some(user) if user.verification_token.as_deref() == Some(token) => user,
            _ => return Err(AppError::InvalidVerificationToken),
        };

        user.mark_verified();
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = ?user.id, "Email verified");

        self.bus
            .dispatch(
                &EmailVerified {
                    user_id: user.id.unwrap_or_default(),
                    email: user.email.to_string(),
                }
                .into(),
            )
            .await;

        Ok(user)
    }

    /// Issue a fresh verification token and re-announce the registration,
    /// which re-triggers the verification email handler.
    ///
    /// Already-verified accounts are returned unchanged.
    pub async fn resend_verification_email(&self, email: &str) -> AppResult<User> {
        let email = Email::new(email)?;
        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AppError::NotFound)?;

        if user.is_verified {
            return Ok(user);
        }

        let token = user.refresh_verification_token().to_string();
        self.user_repository.update(&user).await?;

        self.bus
            .dispatch(
                &UserRegistered {
                    user_id: user.id.unwrap_or_default(),
                    email: user.email.to_string(),
                    verification_token: token,
                }
                .into(),
            )
            .await;

        Ok(user)
    }
}
