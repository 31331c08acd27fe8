//! Per-client rate limiting for authentication endpoints.
//!
//! Counters live in Redis behind the [`CounterStore`] trait. The gate fails
//! open: when the client cannot be identified or the counter store is
//! unreachable, the request is allowed through and the incident is logged.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::{RATE_LIMIT_AUTH_MAX_CALLS, RATE_LIMIT_AUTH_WINDOW_SECONDS};
use crate::errors::AppError;
use crate::infra::CounterStore;

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise the connection IP.
fn client_identifier(request: &Request) -> Option<String> {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            let ip = ip.trim();
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        if !real_ip.is_empty() {
            return Some(real_ip.to_string());
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
}

/// Normalize a request path so spelling variants share a counter:
/// lowercased, trailing slash stripped.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Check and record one call for `client` against `path`.
///
/// Returns `Err(AppError::RateLimited)` only when the counter store
/// positively reports the window is exhausted. Every failure mode allows
/// the request.
pub async fn enforce(
    counters: &dyn CounterStore,
    client: Option<&str>,
    path: &str,
    max_calls: u64,
    window_seconds: u64,
) -> Result<u64, AppError> {
    let Some(client) = client else {
        tracing::warn!(path = %path, "rate limit skipped: client not identifiable");
        return Ok(0);
    };

    let key = format!("{}:{}", client, normalize_path(path));

    let count = match counters.current(&key).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "rate limit check failed, allowing request");
            return Ok(0);
        }
    };

    if count >= max_calls {
        tracing::warn!(client = %client, path = %path, count, "rate limit exceeded");
        return Err(AppError::RateLimited {
            retry_after: window_seconds,
        });
    }

    if let Err(e) = counters.record(&key, window_seconds).await {
        tracing::warn!(error = %e, key = %key, "rate limit record failed");
    }

    Ok(count + 1)
}

/// Rate limiting middleware for the authentication routes.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_identifier(&request);
    let path = request.uri().path().to_string();

    let count = enforce(
        state.counters.as_ref(),
        client.as_deref(),
        &path,
        RATE_LIMIT_AUTH_MAX_CALLS,
        RATE_LIMIT_AUTH_WINDOW_SECONDS,
    )
    .await?;

    let mut response = next.run(request).await;

    let remaining = RATE_LIMIT_AUTH_MAX_CALLS.saturating_sub(count);
    let headers = response.headers_mut();
    headers.insert(
        "X-RateLimit-Limit",
        HeaderValue::from_str(&RATE_LIMIT_AUTH_MAX_CALLS.to_string())
            .unwrap_or(HeaderValue::from_static("0")),
    );
    headers.insert(
        "X-RateLimit-Remaining",
        HeaderValue::from_str(&remaining.to_string()).unwrap_or(HeaderValue::from_static("0")),
    );

    Ok(response)
}
