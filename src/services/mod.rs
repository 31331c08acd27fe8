//! Application services layer - Use cases and business logic.
//!
//! One domain service per use case, each a small state-transition
//! procedure over the user aggregate, the repository and the event bus.
//! Composition happens in the container.

mod auth;
mod change_password;
pub mod container;
mod logout;
mod profile;
mod registration;
mod restaurants;
mod verification;

pub use auth::{AuthService, Claims, RefreshClaims, TokenResponse};
pub use change_password::ChangePasswordService;
pub use container::{default_bus, Services};
pub use logout::{LogoutOutcome, LogoutService};
pub use profile::{ProfileUpdate, UserProfileService};
pub use registration::RegistrationService;
pub use restaurants::RestaurantService;
pub use verification::EmailVerificationService;
