//! Service composition root.
//!
//! Builds the event bus, registers its handlers, and wires repositories
//! and stores into one `Services` value. The bus is constructed here, not
//! as a process-wide singleton, so tests can compose a fresh one.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{EventBus, EventKind};
use crate::infra::{
    BannedTokenStore, RestaurantRepository, RestaurantStore, UserRepository, UserStore,
};
use crate::jobs::{Mailer, VerificationEmailHandler};

use super::auth::AuthService;
use super::change_password::ChangePasswordService;
use super::logout::LogoutService;
use super::profile::UserProfileService;
use super::registration::RegistrationService;
use super::restaurants::RestaurantService;
use super::verification::EmailVerificationService;

/// All application services, wired once at startup.
pub struct Services {
    pub registration: Arc<RegistrationService>,
    pub verification: Arc<EmailVerificationService>,
    pub change_password: Arc<ChangePasswordService>,
    pub auth: Arc<AuthService>,
    pub profile: Arc<UserProfileService>,
    pub logout: Arc<LogoutService>,
    pub restaurants: Arc<RestaurantService>,
}

impl Services {
    /// Wire services over explicit collaborators.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        restaurant_repository: Arc<dyn RestaurantRepository>,
        banned_tokens: Arc<dyn BannedTokenStore>,
        bus: Arc<EventBus>,
        config: Config,
    ) -> Self {
        let auth = Arc::new(AuthService::new(user_repository.clone(), config));

        Self {
            registration: Arc::new(RegistrationService::new(
                user_repository.clone(),
                bus.clone(),
            )),
            verification: Arc::new(EmailVerificationService::new(
                user_repository.clone(),
                bus.clone(),
            )),
            change_password: Arc::new(ChangePasswordService::new(
                user_repository.clone(),
                bus.clone(),
            )),
            auth: auth.clone(),
            profile: Arc::new(UserProfileService::new(user_repository)),
            logout: Arc::new(LogoutService::new(auth, banned_tokens)),
            restaurants: Arc::new(RestaurantService::new(restaurant_repository)),
        }
    }

    /// Build the production wiring from a database connection and cache.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        banned_tokens: Arc<dyn BannedTokenStore>,
        config: Config,
    ) -> Self {
        let user_repository: Arc<dyn UserRepository> = Arc::new(UserStore::new(db.clone()));
        let restaurant_repository: Arc<dyn RestaurantRepository> =
            Arc::new(RestaurantStore::new(db));
        let bus = Arc::new(default_bus(&config));

        Self::new(
            user_repository,
            restaurant_repository,
            banned_tokens,
            bus,
            config,
        )
    }
}

/// The process-start handler wiring: verification emails on registration.
pub fn default_bus(config: &Config) -> EventBus {
    let mut bus = EventBus::new();
    bus.register(
        EventKind::UserRegistered,
        Arc::new(VerificationEmailHandler::new(
            Arc::new(Mailer::new()),
            config.base_verification_url.clone(),
        )),
    );
    bus
}
