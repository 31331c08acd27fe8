//! Login and JWT issuance/verification.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    Config, REFRESH_TOKEN_EXPIRATION_DAYS, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER,
};
use crate::domain::{Email, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Access token claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Refresh token claims payload; `jti` is the revocation handle.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i64,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// JWT refresh token (revocable via logout)
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    /// Authenticate an account.
    ///
    /// Failure order: unknown address, wrong password, unverified account.
    /// Only a verified account with matching credentials gets tokens.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, TokenResponse)> {
        let email = Email::new(email)?;
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.check_password(password) {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(AppError::NotVerified);
        }

        let tokens = self.generate_tokens(&user)?;
        Ok((user, tokens))
    }

    /// Issue an access/refresh token pair for a user.
    pub fn generate_tokens(&self, user: &User) -> AppResult<TokenResponse> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::internal("Cannot issue tokens for an unpersisted user"))?;
        let now = Utc::now();
        let access_expires = now + Duration::hours(self.config.jwt_expiration_hours);
        let refresh_expires = now + Duration::days(REFRESH_TOKEN_EXPIRATION_DAYS);

        let claims = Claims {
            sub: user_id,
            email: user.email.to_string(),
            role: user.role.to_string(),
            exp: access_expires.timestamp(),
            iat: now.timestamp(),
        };

        let refresh_claims = RefreshClaims {
            sub: user_id,
            jti: Uuid::new_v4().to_string(),
            exp: refresh_expires.timestamp(),
            iat: now.timestamp(),
        };

        let key = EncodingKey::from_secret(self.config.jwt_secret_bytes());
        let access_token = encode(&Header::default(), &claims, &key)?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
        })
    }

    /// Verify an access token and extract its claims.
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Verify a refresh token and extract its claims.
    pub fn verify_refresh_token(&self, token: &str) -> AppResult<RefreshClaims> {
        let token_data = decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
