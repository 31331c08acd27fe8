//! Synchronous in-process event bus.
//!
//! The bus is an explicitly constructed instance wired into services at
//! composition time, so tests get a fresh bus instead of sharing a
//! process-wide registry. Dispatch is in-line: every handler registered for
//! the event's kind runs on the calling task, in registration order, before
//! `dispatch` returns.
//!
//! Handler failures are isolated: they are logged and do not propagate to
//! the use case that triggered the event, so an already-persisted state
//! transition is never masked by a failing side effect.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AppResult;

use super::events::{DomainEvent, EventKind};

/// A subscriber to domain events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent) -> AppResult<()>;

    /// Name used in logs when the handler fails.
    fn name(&self) -> &'static str {
        "event_handler"
    }
}

/// Registry mapping event kind to an ordered list of handlers.
///
/// Multiple handlers per kind are allowed; registration order is delivery
/// order and duplicates are not collapsed.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the list for `kind`.
    pub fn register(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Deliver `event` to every handler registered for its kind, in order.
    pub async fn dispatch(&self, event: &DomainEvent) {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return;
        };

        for handler in handlers {
            if let Err(e) = handler.handle(event).await {
                tracing::error!(
                    handler = handler.name(),
                    event = ?event.kind(),
                    error = %e,
                    "Event handler failed"
                );
            }
        }
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}
