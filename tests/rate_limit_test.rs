//! Rate limiter tests: windowed counting per client and path, failing open
//! when the counter store misbehaves.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use tableside::api::middleware::rate_limit::enforce;
use tableside::errors::{AppError, AppResult};
use tableside::infra::CounterStore;

/// Counter store without expiry, enough for single-window tests.
#[derive(Default)]
struct InMemoryCounters {
    counts: Mutex<HashMap<String, u64>>,
}

#[async_trait]
impl CounterStore for InMemoryCounters {
    async fn current(&self, key: &str) -> AppResult<u64> {
        Ok(*self.counts.lock().unwrap().get(key).unwrap_or(&0))
    }

    async fn record(&self, key: &str, _window_seconds: u64) -> AppResult<()> {
        *self.counts.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }
}

/// Counter store that always errors.
struct BrokenCounters;

#[async_trait]
impl CounterStore for BrokenCounters {
    async fn current(&self, _key: &str) -> AppResult<u64> {
        Err(AppError::internal("store down"))
    }

    async fn record(&self, _key: &str, _window_seconds: u64) -> AppResult<()> {
        Err(AppError::internal("store down"))
    }
}

#[tokio::test]
async fn rejects_after_the_window_is_exhausted() {
    let counters = InMemoryCounters::default();

    for _ in 0..5 {
        enforce(&counters, Some("10.0.0.1"), "/auth/login", 5, 60)
            .await
            .unwrap();
    }

    let err = enforce(&counters, Some("10.0.0.1"), "/auth/login", 5, 60)
        .await
        .unwrap_err();

    match err {
        AppError::RateLimited { retry_after } => assert_eq!(retry_after, 60),
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn rejected_calls_do_not_consume_the_window() {
    let counters = InMemoryCounters::default();

    for _ in 0..5 {
        enforce(&counters, Some("10.0.0.1"), "/auth/login", 5, 60)
            .await
            .unwrap();
    }
    enforce(&counters, Some("10.0.0.1"), "/auth/login", 5, 60)
        .await
        .unwrap_err();

    // the rejection itself must not have incremented the counter
    let count = counters.current("10.0.0.1:/auth/login").await.unwrap();
    assert_eq!(count, 5);
}

#[tokio::test]
async fn other_clients_keep_their_own_window() {
    let counters = InMemoryCounters::default();

    for _ in 0..5 {
        enforce(&counters, Some("10.0.0.1"), "/auth/login", 5, 60)
            .await
            .unwrap();
    }

    enforce(&counters, Some("10.0.0.2"), "/auth/login", 5, 60)
        .await
        .unwrap();
}

#[tokio::test]
async fn other_paths_keep_their_own_window() {
    let counters = InMemoryCounters::default();

    for _ in 0..5 {
        enforce(&counters, Some("10.0.0.1"), "/auth/login", 5, 60)
            .await
            .unwrap();
    }

    enforce(&counters, Some("10.0.0.1"), "/auth/register", 5, 60)
        .await
        .unwrap();
}

#[tokio::test]
async fn trailing_slash_shares_the_counter() {
    let counters = InMemoryCounters::default();

    for _ in 0..5 {
        enforce(&counters, Some("10.0.0.1"), "/auth/login/", 5, 60)
            .await
            .unwrap();
    }

    enforce(&counters, Some("10.0.0.1"), "/auth/login", 5, 60)
        .await
        .unwrap_err();
}

#[tokio::test]
async fn unidentifiable_client_is_allowed() {
    let counters = InMemoryCounters::default();

    for _ in 0..20 {
        enforce(&counters, None, "/auth/login", 5, 60).await.unwrap();
    }

    assert!(counters.counts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn broken_store_fails_open() {
    for _ in 0..20 {
        enforce(&BrokenCounters, Some("10.0.0.1"), "/auth/login", 5, 60)
            .await
            .unwrap();
    }
}
