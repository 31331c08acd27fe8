//! Cursor (keyset) pagination over a name-ordered collection.
//!
//! The cursor is the sort-key value of a boundary record; no server-side
//! paging state exists. Callers fetch one extra record past the requested
//! window and the overflow drives the `has_next`/`has_previous` flags.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Paging direction relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Next,
    Prev,
}

/// Query parameters for cursor-paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CursorParams {
    /// Page size (capped at the server maximum)
    pub limit: Option<u64>,
    /// Sort-key value of the boundary record from a previous page
    pub cursor: Option<String>,
    /// Whether to page forward or backward from the cursor
    pub direction: Option<Direction>,
}

impl CursorParams {
    /// Effective page size, defaulted and capped.
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or_default()
    }

    /// Rows to request from the store: one past the window for the
    /// overflow check.
    pub fn fetch_size(&self) -> u64 {
        self.limit() + 1
    }
}

/// One page of results plus boundary cursors, always in ascending
/// display order.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(RestaurantPage = CursorPage<crate::domain::RestaurantResponse>)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Assemble a page from `rows` as returned by the store (in query
    /// order, at most `limit + 1` entries).
    ///
    /// For `Next`, overflow means a following page exists; a preceding page
    /// exists iff the request carried a cursor. For `Prev` the store queried
    /// descending, so the rows are reversed after truncation, overflow means
    /// a preceding page exists, and the inbound cursor itself proves a
    /// following page.
    pub fn assemble<K>(
        mut rows: Vec<T>,
        limit: u64,
        had_cursor: bool,
        direction: Direction,
        key: K,
    ) -> Self
    where
        K: Fn(&T) -> String,
    {
        let limit = limit as usize;
        let overflow = rows.len() > limit;
        rows.truncate(limit);

        let (has_next, has_previous) = match direction {
            Direction::Next => (overflow, had_cursor),
            Direction::Prev => (had_cursor, overflow),
        };

        if direction == Direction::Prev {
            rows.reverse();
        }

        let next_cursor = if has_next {
            rows.last().map(&key)
        } else {
            None
        };
        let previous_cursor = if has_previous {
            rows.first().map(&key)
        } else {
            None
        };

        Self {
            items: rows,
            has_next,
            has_previous,
            next_cursor,
            previous_cursor,
        }
    }

    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_cursor: self.next_cursor,
            previous_cursor: self.previous_cursor,
        }
    }
}
