//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod restaurant;
pub mod user;

// Re-exports for convenience
#[allow(unused_imports)]
pub use restaurant::{Entity as RestaurantEntity, Model as RestaurantModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
