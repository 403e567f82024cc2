//! Pluggable entry storage.
//!
//! The engine only requires the get/set/delete contract in [`Store`]; TTL
//! enforcement, eviction policy, and persistence format are entirely the
//! backend's concern. [`MemoryStore`] is the bundled in-process backend:
//! a `tokio::sync::RwLock`-guarded map with lazy per-entry expiry, suitable
//! for single-process deployments and tests.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::BoxFuture;
use crate::http::{Response, unix_now};

/// Errors a storage backend may surface.
///
/// The engine treats these as non-fatal on the write path (failing to cache
/// must never fail the request) and as a miss on the read path.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The key/value contract the engine requires of a storage backend.
///
/// Implementations decide their own consistency model; the engine adds no
/// locking of its own, so concurrent populates of one key are a last-set-wins
/// race by design.
pub trait Store: Send + Sync {
    /// Returns the stored response for `key`, or `None` when absent or
    /// expired.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Response>, StoreError>>;

    /// Stores `response` under `key` for `ttl_seconds`. Returns `true` when
    /// the entry was accepted.
    ///
    /// A non-positive TTL is a valid input: the backend may discard the
    /// entry or store it already-expired, but must not error.
    fn set<'a>(
        &'a self,
        key: &'a str,
        response: &'a Response,
        ttl_seconds: i64,
    ) -> BoxFuture<'a, Result<bool, StoreError>>;

    /// Removes the entry for `key`. Removing an absent key is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Swaps the stored response for `key` in place, keeping the entry's
    /// remaining lifetime. Returns `false` when the entry is absent, expired,
    /// or the backend does not support in-place updates (the default).
    ///
    /// The engine uses this to persist serve-time bookkeeping such as the
    /// hit counter without restarting the entry's TTL.
    fn replace<'a>(
        &'a self,
        key: &'a str,
        response: &'a Response,
    ) -> BoxFuture<'a, Result<bool, StoreError>> {
        let _ = (key, response);
        Box::pin(async { Ok(false) })
    }
}

struct Entry {
    response: Response,
    stored_at: i64,
    ttl_seconds: i64,
}

impl Entry {
    fn fresh_at(&self, now: i64) -> bool {
        self.ttl_seconds > 0 && now < self.stored_at + self.ttl_seconds
    }
}

/// In-memory store with per-entry TTL.
///
/// Expiry is lazy: an expired entry is dropped the next time it is read.
/// There is no background sweep.
///
/// # Examples
///
/// ```
/// use freshet::store::{MemoryStore, Store};
/// use freshet::http::{Response, StatusCode};
///
/// # async fn demo() -> Result<(), freshet::StoreError> {
/// let store = MemoryStore::new();
/// let response = Response::new(StatusCode::Ok).body("cached");
/// store.set("key", &response, 60).await?;
/// assert!(store.get("key").await?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if no entries are held.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Store for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Response>, StoreError>> {
        Box::pin(async move {
            let now = unix_now();
            {
                let entries = self.entries.read().await;
                match entries.get(key) {
                    Some(entry) if entry.fresh_at(now) => {
                        return Ok(Some(entry.response.clone()));
                    }
                    Some(_) => {} // expired, fall through to evict
                    None => return Ok(None),
                }
            }
            self.entries.write().await.remove(key);
            Ok(None)
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        response: &'a Response,
        ttl_seconds: i64,
    ) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let entry = Entry {
                response: response.clone(),
                stored_at: unix_now(),
                ttl_seconds,
            };
            self.entries.write().await.insert(key.to_owned(), entry);
            Ok(true)
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.entries.write().await.remove(key);
            Ok(())
        })
    }

    fn replace<'a>(
        &'a self,
        key: &'a str,
        response: &'a Response,
    ) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let now = unix_now();
            let mut entries = self.entries.write().await;
            match entries.get_mut(key) {
                Some(entry) if entry.fresh_at(now) => {
                    entry.response = response.clone();
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    fn response(body: &str) -> Response {
        Response::new(StatusCode::Ok).body(body)
    }

    #[tokio::test]
    async fn set_get_round_trip() {
        let store = MemoryStore::new();
        assert!(store.set("k", &response("v"), 60).await.unwrap());
        let got = store.get("k").await.unwrap().unwrap();
        assert_eq!(got.body_ref(), b"v");
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_positive_ttl_is_immediately_expired() {
        let store = MemoryStore::new();
        store.set("zero", &response("v"), 0).await.unwrap();
        store.set("negative", &response("v"), -5).await.unwrap();
        assert!(store.get("zero").await.unwrap().is_none());
        assert!(store.get("negative").await.unwrap().is_none());
        // The expired entries were evicted by the reads.
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn overwrite_replaces_entry() {
        let store = MemoryStore::new();
        store.set("k", &response("old"), 60).await.unwrap();
        store.set("k", &response("new"), 60).await.unwrap();
        let got = store.get("k").await.unwrap().unwrap();
        assert_eq!(got.body_ref(), b"new");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn replace_swaps_response_without_new_entry() {
        let store = MemoryStore::new();
        store.set("k", &response("old"), 60).await.unwrap();
        assert!(store.replace("k", &response("new")).await.unwrap());
        let got = store.get("k").await.unwrap().unwrap();
        assert_eq!(got.body_ref(), b"new");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn replace_refuses_absent_or_expired_entries() {
        let store = MemoryStore::new();
        assert!(!store.replace("nope", &response("v")).await.unwrap());
        store.set("gone", &response("v"), 0).await.unwrap();
        assert!(!store.replace("gone", &response("v2")).await.unwrap());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.set("k", &response("v"), 60).await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
        store.delete("k").await.unwrap(); // absent key is fine
    }
}
