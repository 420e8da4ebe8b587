//! Request generations for superseded fetches.
//!
//! When a view re-fetches on every input change (search-as-you-type), an
//! older request can resolve after a newer one. Each request takes a
//! [`GenerationToken`] when it starts; only the response holding the latest
//! token is accepted, anything older is dropped.
//!
//! The CLI issues one fetch per invocation and never needs this; it is for
//! long-lived embedders of this crate that re-query on user input.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request within a [`RequestGeneration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationToken(u64);

/// Monotonic request counter for one view.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    /// Creates a counter with no requests issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Starts a new request, superseding every earlier one.
    pub fn begin(&self) -> GenerationToken {
        GenerationToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `token` still belongs to the newest request.
    #[must_use]
    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }

    /// Returns `value` if `token` is current, `None` if it was superseded.
    pub fn accept<T>(&self, token: GenerationToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            log::debug!("Discarding stale response for request {}", token.0);
            None
        }
    }

    /// Runs `request` under a fresh token and keeps its output only if no
    /// newer request started in the meantime.
    pub async fn run<F, T>(&self, request: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let token = self.begin();
        let value = request.await;
        self.accept(token, value)
    }
}
