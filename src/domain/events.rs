//! Domain events: immutable records of completed account state transitions.
//!
//! Events are transient; they exist only for the duration of the dispatch
//! and are never persisted.

/// A new account was created and awaits email verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistered {
    pub user_id: i64,
    pub email: String,
    pub verification_token: String,
}

/// An account completed email verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVerified {
    pub user_id: i64,
    pub email: String,
}

/// An account's password was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChanged {
    pub user_id: i64,
    pub email: String,
}

/// All domain events, tagged for handler routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    UserRegistered(UserRegistered),
    EmailVerified(EmailVerified),
    PasswordChanged(PasswordChanged),
}

/// Event discriminant used as the registry key on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UserRegistered,
    EmailVerified,
    PasswordChanged,
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::UserRegistered(_) => EventKind::UserRegistered,
            DomainEvent::EmailVerified(_) => EventKind::EmailVerified,
            DomainEvent::PasswordChanged(_) => EventKind::PasswordChanged,
        }
    }
}

impl From<UserRegistered> for DomainEvent {
    fn from(event: UserRegistered) -> Self {
        DomainEvent::UserRegistered(event)
    }
}

impl From<EmailVerified> for DomainEvent {
    fn from(event: EmailVerified) -> Self {
        DomainEvent::EmailVerified(event)
    }
}

impl From<PasswordChanged> for DomainEvent {
    fn from(event: PasswordChanged) -> Self {
        DomainEvent::PasswordChanged(event)
    }
}
