//! Side-effect jobs triggered by domain events.

pub mod email;

pub use email::{EmailMessage, Mailer, VerificationEmailHandler};
