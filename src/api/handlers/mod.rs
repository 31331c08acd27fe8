pub mod auth_handler;
pub mod restaurant_handler;
pub mod user_handler;
