//! Profile update use case.

use std::sync::Arc;

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Whitelisted profile fields.
///
/// The email is the account identity and cannot be changed here; the field
/// exists only so the attempt can be rejected explicitly instead of being
/// silently dropped by deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProfileUpdate {
    /// New display name
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    /// New biography (at most 500 characters)
    pub bio: Option<String>,
    /// Not updatable via this path
    #[schema(value_type = Option<String>)]
    pub email: Option<String>,
}

pub struct UserProfileService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserProfileService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Apply a whitelisted profile update to the account with `id`.
    pub async fn update_profile(&self, id: i64, changes: ProfileUpdate) -> AppResult<User> {
        if changes.email.is_some() {
            return Err(AppError::validation(
                "The email address cannot be changed via this route",
            ));
        }

        let mut user = self.user_repository.get_by_id(id).await?;

        if let Some(bio) = &changes.bio {
            user.set_bio(bio)?;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }

        self.user_repository.update(&user).await?;
        Ok(user)
    }

    /// Fetch a profile by id.
    pub async fn get_profile(&self, id: i64) -> AppResult<User> {
        self.user_repository.get_by_id(id).await
    }
}
