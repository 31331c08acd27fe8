//! Shared types used across services and handlers.

mod pagination;
mod response;

pub use pagination::{CursorPage, CursorParams, Direction, RestaurantPage};
pub use response::MessageResponse;
