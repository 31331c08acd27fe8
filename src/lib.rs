//! Tableside - Restaurant ordering platform API
//!
//! Accounts, authentication, and restaurant listings for a restaurant
//! ordering platform, built on Axum and SeaORM with a clean architecture
//! layering.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities, value objects, and domain events
//! - **services**: Application use cases
//! - **infra**: Infrastructure concerns (database, Redis)
//! - **jobs**: Background work triggered by domain events
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Email, EventBus, Password, User, UserRole};
pub use errors::{AppError, AppResult};
