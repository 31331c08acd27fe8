//! User aggregate and related types.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    MAX_BIO_LENGTH, ROLE_ADMIN, ROLE_CUSTOMER, ROLE_RESTAURANT_OWNER, VERIFICATION_TOKEN_BYTES,
};
use crate::errors::{AppError, AppResult};

use super::email::Email;
use super::password::Password;

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    RestaurantOwner,
    Admin,
}

/// Staff/superuser flags derived from a role.
///
/// Recomputed at every persistence write; never stored on the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffFlags {
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserRole {
    /// Derive the staff flags this role implies.
    pub fn staff_flags(self) -> StaffFlags {
        match self {
            UserRole::Admin => StaffFlags {
                is_staff: true,
                is_superuser: true,
            },
            UserRole::RestaurantOwner => StaffFlags {
                is_staff: true,
                is_superuser: false,
            },
            UserRole::Customer => StaffFlags {
                is_staff: false,
                is_superuser: false,
            },
        }
    }

}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_RESTAURANT_OWNER => UserRole::RestaurantOwner,
            _ => UserRole::Customer,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Customer => ROLE_CUSTOMER,
            UserRole::RestaurantOwner => ROLE_RESTAURANT_OWNER,
            UserRole::Admin => ROLE_ADMIN,
        };
        f.write_str(s)
    }
}

/// User aggregate.
///
/// `id` is assigned by the store: `None` until the aggregate has been
/// persisted through [`UserRepository::add`](crate::infra::UserRepository).
#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub email: Email,
    pub name: String,
    pub bio: String,
    password: Password,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub role: UserRole,
}

impl User {
    /// Factory for registration: validates the email, hashes the password
    /// and attaches a fresh verification token.
    pub fn register(email: &str, name: &str, password: &str) -> AppResult<Self> {
        let email = Email::new(email)?;
        let password = Password::new(password)?;

        Ok(Self {
            id: None,
            email,
            name: name.to_string(),
            bio: String::new(),
            password,
            is_verified: false,
            verification_token: Some(generate_verification_token()),
            role: UserRole::Customer,
        })
    }

    /// Rebuild an aggregate from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_store(
        id: i64,
        email: Email,
        name: String,
        bio: String,
        password_hash: String,
        is_verified: bool,
        verification_token: Option<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: Some(id),
            email,
            name,
            bio,
            password: Password::from_hash(password_hash),
            is_verified,
            verification_token,
            role,
        }
    }

    /// Replace the stored password with a hash of `raw`.
    pub fn set_password(&mut self, raw: &str) -> AppResult<()> {
        self.password = Password::new(raw)?;
        Ok(())
    }

    /// Check `raw` against the stored hash. Never errors.
    pub fn check_password(&self, raw: &str) -> bool {
        self.password.verify(raw)
    }

    /// The stored password hash, for persistence.
    pub fn password_hash(&self) -> &str {
        self.password.as_str()
    }

    /// Update the biography.
    ///
    /// # Errors
    /// Fails with a validation error over [`MAX_BIO_LENGTH`] characters.
    pub fn set_bio(&mut self, bio: &str) -> AppResult<()> {
        if bio.chars().count() > MAX_BIO_LENGTH {
            return Err(AppError::validation(format!(
                "Biography must be at most {} characters",
                MAX_BIO_LENGTH
            )));
        }
        self.bio = bio.to_string();
        Ok(())
    }

    /// Mark the email as verified and retire the token.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_token = None;
    }

    /// Attach a fresh verification token (for resends).
    pub fn refresh_verification_token(&mut self) -> &str {
        self.verification_token = Some(generate_verification_token());
        // Just set above
        self.verification_token.as_deref().unwrap_or_default()
    }

    /// Staff flags implied by the current role.
    pub fn staff_flags(&self) -> StaffFlags {
        self.role.staff_flags()
    }
}

/// URL-safe random token for email verification links.
fn generate_verification_token() -> String {
    let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// User response (safe to return to clients)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Store-assigned identifier
    #[schema(example = 42)]
    pub id: i64,
    /// Email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// Biography
    pub bio: String,
    /// Account role
    #[schema(example = "customer")]
    pub role: String,
    /// Whether the email address has been verified
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            email: user.email.to_string(),
            name: user.name,
            bio: user.bio,
            role: user.role.to_string(),
            is_verified: user.is_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_factory_prepares_verification() {
        let user = User::register("new@example.com", "New User", "password123").unwrap();
        assert!(user.id.is_none());
        assert!(!user.is_verified);
        assert!(user.verification_token.is_some());
        assert!(user.check_password("password123"));
    }

    #[test]
    fn admin_implies_staff_and_superuser() {
        let flags = UserRole::Admin.staff_flags();
        assert!(flags.is_staff);
        assert!(flags.is_superuser);
    }

    #[test]
    fn restaurant_owner_is_staff_only() {
        let flags = UserRole::RestaurantOwner.staff_flags();
        assert!(flags.is_staff);
        assert!(!flags.is_superuser);
    }

    #[test]
    fn customer_has_no_elevated_flags() {
        let flags = UserRole::Customer.staff_flags();
        assert!(!flags.is_staff);
        assert!(!flags.is_superuser);
    }

    #[test]
    fn flags_follow_role_changes() {
        let mut user = User::register("flip@example.com", "Flip", "password123").unwrap();
        user.role = UserRole::Admin;
        assert!(user.staff_flags().is_superuser);
        user.role = UserRole::Customer;
        assert!(!user.staff_flags().is_staff);
    }

    #[test]
    fn bio_length_is_bounded() {
        let mut user = User::register("bio@example.com", "Bio", "password123").unwrap();
        assert!(user.set_bio(&"x".repeat(500)).is_ok());
        assert!(user.set_bio(&"x".repeat(501)).is_err());
    }

    #[test]
    fn verification_clears_token() {
        let mut user = User::register("v@example.com", "V", "password123").unwrap();
        user.mark_verified();
        assert!(user.is_verified);
        assert!(user.verification_token.is_none());
    }

    #[test]
    fn tokens_are_unique() {
        let a = generate_verification_token();
        let b = generate_verification_token();
        assert_ne!(a, b);
        assert!(a.len() >= VERIFICATION_TOKEN_BYTES);
    }
}
