//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and repositories
//! - Redis-backed counter and token-revocation stores

pub mod cache;
pub mod db;
pub mod repositories;

pub use cache::{BannedTokenStore, Cache, CounterStore};
pub use db::Database;
pub use repositories::{RestaurantRepository, RestaurantStore, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::{MockBannedTokenStore, MockCounterStore};
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockRestaurantRepository, MockUserRepository};
