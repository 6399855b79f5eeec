//! Bounded, per-entry-TTL store of live refresh tokens.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::infrastructure::clock::Clock;

/// A live refresh token's owner and expiry.
#[derive(Debug, Clone)]
struct Entry {
    subject_id: String,
    expires_at: DateTime<Utc>,
    /// Position in the recency index.
    stamp: u64,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    /// Recency stamp -> token id, oldest first.
    recency: BTreeMap<u64, String>,
    next_stamp: u64,
}

impl State {
    fn stamp(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }

    fn remove(&mut self, token_id: &str) -> Option<Entry> {
        let entry = self.entries.remove(token_id)?;
        self.recency.remove(&entry.stamp);
        Some(entry)
    }

    fn touch(&mut self, token_id: &str) {
        let stamp = self.stamp();
        if let Some(entry) = self.entries.get_mut(token_id) {
            self.recency.remove(&entry.stamp);
            entry.stamp = stamp;
            self.recency.insert(stamp, token_id.to_string());
        }
    }

    fn evict_least_recent(&mut self) -> bool {
        match self.recency.pop_first() {
            Some((_, token_id)) => {
                self.entries.remove(&token_id);
                true
            }
            None => false,
        }
    }
}

/// Process-wide map from refresh-token identifier to owning subject.
///
/// An entry exists iff its refresh token is the live, unconsumed token of a
/// session. Every operation runs under one internal lock, so `put`, `get`,
/// `invalidate` and `take` are linearizable per key; [`Self::take`] is the
/// single-use point of refresh rotation.
///
/// The store never holds more than `capacity` entries. Inserting into a full
/// store evicts the least recently used entries first. Eviction only forces
/// the affected session to sign in again.
pub struct RefreshTokenCache {
    state: Mutex<State>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenCache {
    /// Creates an empty store holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            capacity: capacity.max(1),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `token_id` for `subject_id`, live for `ttl` from now.
    pub fn put(&self, token_id: &str, subject_id: &str, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.put_until(token_id, subject_id, expires_at);
    }

    /// Registers `token_id` for `subject_id`, live until `expires_at`.
    pub fn put_until(&self, token_id: &str, subject_id: &str, expires_at: DateTime<Utc>) {
        let mut state = self.lock();

        if state.remove(token_id).is_none() {
            let mut evicted = 0u64;
            while state.entries.len() >= self.capacity && state.evict_least_recent() {
                evicted += 1;
            }
            if evicted > 0 {
                debug!(evicted, "Refresh cache full, evicted least recent sessions");
                counter!("refresh_cache_evictions_total").increment(evicted);
            }
        }

        let stamp = state.stamp();
        state.recency.insert(stamp, token_id.to_string());
        state.entries.insert(
            token_id.to_string(),
            Entry {
                subject_id: subject_id.to_string(),
                expires_at,
                stamp,
            },
        );
    }

    /// Returns the owning subject if `token_id` is live.
    ///
    /// Expired entries are dropped on access and reported as absent.
    pub fn get(&self, token_id: &str) -> Option<String> {
        let now = self.clock.now();
        let mut state = self.lock();

        let expires_at = state.entries.get(token_id)?.expires_at;
        if now >= expires_at {
            state.remove(token_id);
            debug!("Refresh cache entry expired on read");
            return None;
        }

        state.touch(token_id);
        state.entries.get(token_id).map(|e| e.subject_id.clone())
    }

    /// Removes `token_id`. Returns whether an entry was present.
    pub fn invalidate(&self, token_id: &str) -> bool {
        self.lock().remove(token_id).is_some()
    }

    /// Removes every entry owned by `subject_id` and returns how many went.
    pub fn invalidate_subject(&self, subject_id: &str) -> usize {
        let mut state = self.lock();

        let owned: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, e)| e.subject_id == subject_id)
            .map(|(id, _)| id.clone())
            .collect();

        for token_id in &owned {
            state.remove(token_id);
        }
        owned.len()
    }

    /// Atomically removes `token_id` and returns its subject if it was live.
    ///
    /// Of any number of concurrent calls with the same id, at most one
    /// observes `Some`.
    pub fn take(&self, token_id: &str) -> Option<String> {
        let now = self.clock.now();
        let entry = self.lock().remove(token_id)?;

        if now >= entry.expires_at {
            return None;
        }
        Some(entry.subject_id)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.lock();

        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, e)| now >= e.expires_at)
            .map(|(id, _)| id.clone())
            .collect();

        for token_id in &expired {
            state.remove(token_id);
        }
        expired.len()
    }

    /// Number of entries currently held, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
