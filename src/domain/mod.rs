//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns:
//! value objects, aggregates, domain events and the event bus.

pub mod bus;
pub mod email;
pub mod events;
pub mod password;
pub mod restaurant;
pub mod user;

pub use bus::{EventBus, EventHandler};
pub use email::Email;
pub use events::{DomainEvent, EmailVerified, EventKind, PasswordChanged, UserRegistered};
pub use password::Password;
pub use restaurant::{Restaurant, RestaurantResponse};
pub use user::{StaffFlags, User, UserResponse, UserRole};
