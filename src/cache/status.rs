//! Per-key request bookkeeping shared by the keyed stores
//!
//! Every request takes a [`Ticket`] carrying a generation number for its key.
//! Only the completion holding the latest generation of its key may change
//! what the store shows, so a slow response cannot overwrite a newer one.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

/// Observable state of the requests issued for one cache key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    /// Whether a request for this key is still in flight
    pub loading: bool,
    /// Message of the latest failed request, cleared when a new one starts
    pub error: Option<String>,
    /// When the latest successful response for this key was applied
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Proof that a request was issued, handed back on completion
#[derive(Debug)]
pub(crate) struct Ticket {
    key: String,
    generation: u64,
}

#[derive(Debug, Default)]
struct KeyState {
    latest: u64,
    in_flight: usize,
    status: RequestStatus,
}

/// Tracks in-flight requests, generations and errors per key
#[derive(Debug, Default)]
pub(crate) struct RequestTracker {
    keys: HashMap<String, KeyState>,
    last_error: Option<String>,
}

impl RequestTracker {
    /// Registers a new request for `key`, superseding any earlier one
    pub fn begin(&mut self, key: &str) -> Ticket {
        let state = self.keys.entry(key.to_string()).or_default();
        state.latest += 1;
        state.in_flight += 1;
        state.status.loading = true;
        state.status.error = None;
        self.last_error = None;

        Ticket {
            key: key.to_string(),
            generation: state.latest,
        }
    }

    /// Completes a request successfully
    ///
    /// Returns whether the ticket is still the latest for its key; callers
    /// must only apply the response when it is.
    pub fn succeed(&mut self, ticket: &Ticket) -> bool {
        let current = self.complete(ticket);
        if current {
            if let Some(state) = self.keys.get_mut(&ticket.key) {
                state.status.fetched_at = Some(Utc::now());
            }
        }
        current
    }

    /// Completes a request with an error
    ///
    /// The message is recorded only when the ticket is still current.
    pub fn fail(&mut self, ticket: &Ticket, message: String) -> bool {
        let current = self.complete(ticket);
        if current {
            if let Some(state) = self.keys.get_mut(&ticket.key) {
                state.status.error = Some(message.clone());
            }
            self.last_error = Some(message);
        }
        current
    }

    fn complete(&mut self, ticket: &Ticket) -> bool {
        let Some(state) = self.keys.get_mut(&ticket.key) else {
            return false;
        };
        state.in_flight = state.in_flight.saturating_sub(1);
        state.status.loading = state.in_flight > 0;
        state.latest == ticket.generation
    }

    /// True while any request of the store is in flight
    pub fn is_loading(&self) -> bool {
        self.keys.values().any(|state| state.in_flight > 0)
    }

    /// Status of one key; default (idle, no error) for unknown keys
    pub fn status(&self, key: &str) -> RequestStatus {
        self.keys
            .get(key)
            .map(|state| state.status.clone())
            .unwrap_or_default()
    }

    /// Message of the most recent failure across all keys
    pub fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

/// Locks a store's state, recovering it if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
