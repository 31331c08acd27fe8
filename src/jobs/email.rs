//! Outbound email: verification messages triggered by domain events.
//!
//! In development mode (no SMTP configured) emails are logged instead of
//! sent. The verification handler is registered on the event bus at
//! composition time; send failures are isolated by the bus and surfaced
//! through logs, with the resend endpoint as the recovery path.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainEvent, EventHandler};
use crate::errors::AppResult;

/// Email message payload
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// SMTP configuration from environment.
struct EmailConfig {
    smtp_host: Option<String>,
    smtp_from: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@tableside.dev".to_string()),
        }
    }

    fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
    }
}

/// Minimal mailer; logs the message when SMTP is not configured.
#[derive(Default)]
pub struct Mailer;

impl Mailer {
    pub fn new() -> Self {
        Self
    }

    pub async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let config = EmailConfig::from_env();

        tracing::info!(
            to = %message.to,
            from = %config.smtp_from,
            subject = %message.subject,
            "Sending email"
        );

        if !config.is_configured() {
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                config.smtp_from,
                message.to,
                message.subject,
                message.body
            );
        }

        Ok(())
    }
}

/// Sends the verification email when a `UserRegistered` event fires.
pub struct VerificationEmailHandler {
    mailer: Arc<Mailer>,
    base_url: String,
}

impl VerificationEmailHandler {
    pub fn new(mailer: Arc<Mailer>, base_url: String) -> Self {
        Self { mailer, base_url }
    }

    fn verification_link(&self, email: &str, token: &str) -> String {
        format!(
            "{}/verify-email/?email={}&token={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(email),
            urlencoding::encode(token)
        )
    }
}

#[async_trait]
impl EventHandler for VerificationEmailHandler {
    async fn handle(&self, event: &DomainEvent) -> AppResult<()> {
        let DomainEvent::UserRegistered(registered) = event else {
            return Ok(());
        };

        let link = self.verification_link(&registered.email, &registered.verification_token);
        let message = EmailMessage {
            to: registered.email.clone(),
            subject: "Verify your email for Tableside".to_string(),
            body: format!(
                "Hello!\n\nThanks for registering with Tableside. \
                 Please click the link below to verify your email:\n\n{}\n\n\
                 Regards,\nThe Tableside Team",
                link
            ),
        };

        self.mailer.send(&message).await
    }

    fn name(&self) -> &'static str {
        "verification_email"
    }
}
