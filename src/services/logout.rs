//! Logout use case: refresh-token revocation.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::infra::BannedTokenStore;

use super::auth::AuthService;

/// Result value for logout: this use case is exception-safe by contract,
/// it always reports an outcome and never surfaces an error.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutOutcome {
    pub success: bool,
    pub message: String,
}

impl LogoutOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            message: "User logged out successfully".to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub struct LogoutService {
    auth: Arc<AuthService>,
    banned_tokens: Arc<dyn BannedTokenStore>,
}

impl LogoutService {
    pub fn new(auth: Arc<AuthService>, banned_tokens: Arc<dyn BannedTokenStore>) -> Self {
        Self {
            auth,
            banned_tokens,
        }
    }

    /// Revoke a refresh token by banning its jti for the token's remaining
    /// validity. Invalid tokens, repeat revocations and store failures come
    /// back as an error outcome instead of an `Err`.
    pub async fn logout(&self, refresh_token: &str) -> LogoutOutcome {
        let claims = match self.auth.verify_refresh_token(refresh_token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "Logout with invalid refresh token");
                return LogoutOutcome::failed("Invalid refresh token");
            }
        };

        match self.banned_tokens.is_banned(&claims.jti).await {
            Ok(true) => return LogoutOutcome::failed("Token already revoked"),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to check refresh token revocation");
                return LogoutOutcome::failed("Could not revoke the token");
            }
        }

        let remaining = (claims.exp - Utc::now().timestamp()).max(0) as u64;
        match self.banned_tokens.ban(&claims.jti, remaining).await {
            Ok(()) => LogoutOutcome::succeeded(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to revoke refresh token");
                LogoutOutcome::failed("Could not revoke the token")
            }
        }
    }
}
