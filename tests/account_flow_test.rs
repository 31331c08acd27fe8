//! Account lifecycle tests: registration, verification, login, password
//! change, and profile updates against an in-memory repository.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tableside::config::Config;
use tableside::domain::{
    DomainEvent, Email, EventBus, EventHandler, EventKind, User,
};
use tableside::errors::{AppError, AppResult};
use tableside::infra::{BannedTokenStore, UserRepository};
use tableside::services::{
    AuthService, ChangePasswordService, EmailVerificationService, LogoutService, ProfileUpdate,
    RegistrationService, UserProfileService,
};

/// In-memory user repository backing the service tests.
#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn add(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User"));
        }
        let mut stored = user.clone();
        stored.id = Some(users.len() as i64 + 1);
        users.push(stored.clone());
        Ok(stored)
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| &u.email == email))
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        let users = self.users.lock().unwrap();
        users
            .iter()
            .find(|u| u.id == Some(id))
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(AppError::NotFound),
        }
    }
}

/// Records dispatched event kinds.
struct Recorder {
    seen: Mutex<Vec<EventKind>>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }

    fn kinds(&self) -> Vec<EventKind> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for Recorder {
    async fn handle(&self, event: &DomainEvent) -> AppResult<()> {
        self.seen.lock().unwrap().push(event.kind());
        Ok(())
    }
}

struct Harness {
    repo: Arc<InMemoryUsers>,
    recorder: Arc<Recorder>,
    registration: RegistrationService,
    verification: EmailVerificationService,
    change_password: ChangePasswordService,
    auth: Arc<AuthService>,
    profile: UserProfileService,
}

fn harness() -> Harness {
    let repo = Arc::new(InMemoryUsers::default());
    let recorder = Arc::new(Recorder::new());

    let mut bus = EventBus::new();
    for kind in [
        EventKind::UserRegistered,
        EventKind::EmailVerified,
        EventKind::PasswordChanged,
    ] {
        bus.register(kind, recorder.clone());
    }
    let bus = Arc::new(bus);

    let user_repo: Arc<dyn UserRepository> = repo.clone();
    let auth = Arc::new(AuthService::new(user_repo.clone(), Config::for_tests()));

    Harness {
        registration: RegistrationService::new(user_repo.clone(), bus.clone()),
        verification: EmailVerificationService::new(user_repo.clone(), bus.clone()),
        change_password: ChangePasswordService::new(user_repo.clone(), bus.clone()),
        profile: UserProfileService::new(user_repo),
        auth,
        repo,
        recorder,
    }
}

#[tokio::test]
async fn register_assigns_id_and_dispatches_event() {
    let h = harness();

    let user = h
        .registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();

    assert_eq!(user.id, Some(1));
    assert!(!user.is_verified);
    assert!(user.verification_token.is_some());
    assert_eq!(h.recorder.kinds(), vec![EventKind::UserRegistered]);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let h = harness();

    h.registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();

    let err = h
        .registration
        .register_user("diner@example.com", "Other", "password456")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    // only the first registration produced an event
    assert_eq!(h.recorder.kinds(), vec![EventKind::UserRegistered]);
}

#[tokio::test]
async fn verify_email_marks_account_and_clears_token() {
    let h = harness();

    let user = h
        .registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();
    let token = user.verification_token.clone().unwrap();

    let verified = h
        .verification
        .verify_email("diner@example.com", &token)
        .await
        .unwrap();

    assert!(verified.is_verified);
    assert!(verified.verification_token.is_none());
    assert_eq!(
        h.recorder.kinds(),
        vec![EventKind::UserRegistered, EventKind::EmailVerified]
    );
}

#[tokio::test]
async fn stale_verification_token_is_rejected() {
    let h = harness();

    h.registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();

    let err = h
        .verification
        .verify_email("diner@example.com", "not-the-token")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidVerificationToken));
}

#[tokio::test]
async fn verify_email_for_unknown_account_is_rejected() {
    let h = harness();

    let err = h
        .verification
        .verify_email("ghost@example.com", "whatever")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidVerificationToken));
}

#[tokio::test]
async fn resend_verification_rotates_the_token() {
    let h = harness();

    let user = h
        .registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();
    let original = user.verification_token.clone().unwrap();

    let refreshed = h
        .verification
        .resend_verification_email("diner@example.com")
        .await
        .unwrap();

    let rotated = refreshed.verification_token.unwrap();
    assert_ne!(rotated, original);
    // old link must no longer verify
    let err = h
        .verification
        .verify_email("diner@example.com", &original)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidVerificationToken));
}

#[tokio::test]
async fn resend_verification_is_a_noop_for_verified_accounts() {
    let h = harness();

    let user = h
        .registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();
    let token = user.verification_token.clone().unwrap();
    h.verification
        .verify_email("diner@example.com", &token)
        .await
        .unwrap();
    let events_before = h.recorder.kinds().len();

    let unchanged = h
        .verification
        .resend_verification_email("diner@example.com")
        .await
        .unwrap();

    assert!(unchanged.is_verified);
    assert!(unchanged.verification_token.is_none());
    assert_eq!(h.recorder.kinds().len(), events_before);
}

#[tokio::test]
async fn login_requires_verified_account() {
    let h = harness();

    let user = h
        .registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();

    let err = h
        .auth
        .login("diner@example.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotVerified));

    let token = user.verification_token.clone().unwrap();
    h.verification
        .verify_email("diner@example.com", &token)
        .await
        .unwrap();

    let (logged_in, tokens) = h
        .auth
        .login("diner@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(logged_in.id, Some(1));
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
}

#[tokio::test]
async fn login_distinguishes_unknown_account_from_bad_password() {
    let h = harness();

    let user = h
        .registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();
    let token = user.verification_token.clone().unwrap();
    h.verification
        .verify_email("diner@example.com", &token)
        .await
        .unwrap();

    let unknown = h
        .auth
        .login("ghost@example.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(unknown, AppError::NotFound));

    let bad_password = h
        .auth
        .login("diner@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(bad_password, AppError::InvalidCredentials));
}

#[tokio::test]
async fn change_password_requires_the_old_password() {
    let h = harness();

    h.registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();
    let user = h.repo.get_by_id(1).await.unwrap();

    let err = h
        .change_password
        .change_password(user.clone(), "wrong-old", "new-password-1")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidOldPassword));

    let updated = h
        .change_password
        .change_password(user, "password123", "new-password-1")
        .await
        .unwrap();
    assert!(updated.check_password("new-password-1"));
    assert!(!updated.check_password("password123"));

    // persisted, not just in-memory on the aggregate
    let reloaded = h.repo.get_by_id(1).await.unwrap();
    assert!(reloaded.check_password("new-password-1"));
    assert!(h.recorder.kinds().contains(&EventKind::PasswordChanged));
}

#[tokio::test]
async fn profile_update_applies_whitelisted_fields_only() {
    let h = harness();

    h.registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();

    let updated = h
        .profile
        .update_profile(
            1,
            ProfileUpdate {
                name: Some("New Name".to_string()),
                bio: Some("Loves pasta".to_string()),
                email: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.bio, "Loves pasta");

    let err = h
        .profile
        .update_profile(
            1,
            ProfileUpdate {
                name: None,
                bio: None,
                email: Some("other@example.com".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // the rejected update must not have touched the account
    let reloaded = h.repo.get_by_id(1).await.unwrap();
    assert_eq!(reloaded.email.as_str(), "diner@example.com");
}

#[tokio::test]
async fn profile_update_rejects_oversized_bio() {
    let h = harness();

    h.registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();

    let err = h
        .profile
        .update_profile(
            1,
            ProfileUpdate {
                name: None,
                bio: Some("x".repeat(501)),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

/// Banned-token store that records bans.
#[derive(Default)]
struct InMemoryBans {
    banned: Mutex<Vec<String>>,
}

#[async_trait]
impl BannedTokenStore for InMemoryBans {
    async fn ban(&self, jti: &str, _ttl_seconds: u64) -> AppResult<()> {
        self.banned.lock().unwrap().push(jti.to_string());
        Ok(())
    }

    async fn is_banned(&self, jti: &str) -> AppResult<bool> {
        Ok(self.banned.lock().unwrap().iter().any(|b| b == jti))
    }
}

#[tokio::test]
async fn logout_bans_the_refresh_token_and_never_errors() {
    let h = harness();
    let bans = Arc::new(InMemoryBans::default());
    let logout = LogoutService::new(h.auth.clone(), bans.clone());

    let user = h
        .registration
        .register_user("diner@example.com", "Diner", "password123")
        .await
        .unwrap();
    let token = user.verification_token.clone().unwrap();
    h.verification
        .verify_email("diner@example.com", &token)
        .await
        .unwrap();
    let (_, tokens) = h
        .auth
        .login("diner@example.com", "password123")
        .await
        .unwrap();

    let outcome = logout.logout(&tokens.refresh_token).await;
    assert!(outcome.success);
    assert_eq!(bans.banned.lock().unwrap().len(), 1);

    // a second revocation of the same token reports failure
    let outcome = logout.logout(&tokens.refresh_token).await;
    assert!(!outcome.success);
    assert_eq!(bans.banned.lock().unwrap().len(), 1);

    // garbage tokens report failure instead of erroring
    let outcome = logout.logout("not-a-jwt").await;
    assert!(!outcome.success);
    assert_eq!(bans.banned.lock().unwrap().len(), 1);
}
