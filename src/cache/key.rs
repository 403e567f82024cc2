//! Cache-key derivation from request attributes.
//!
//! The default strategy hashes a canonical serialization of the request —
//! path, ordered query pairs, header values in header order, body bytes —
//! with SHA-256 and returns the hex digest. Callers that need to ignore
//! volatile headers (request IDs, tracing baggage) or key on a subset of
//! query parameters inject their own strategy via
//! [`HttpCache::key_generator`](super::HttpCache::key_generator); the
//! orchestrator never inspects keys, it only passes them to the store.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::http::Request;

/// A stored key-derivation strategy.
///
/// Any `Fn(&Request) -> String` qualifies; the type system guarantees it is
/// invocable, so strategy validation happens entirely at compile time.
pub type KeyGenerator = Arc<dyn Fn(&Request) -> String + Send + Sync>;

/// The default key strategy: SHA-256 over a canonical request serialization.
///
/// Deterministic and collision-resistant for practical purposes. Empty query
/// strings, header maps, and bodies contribute empty joins rather than
/// errors, so the minimal `GET /` request keys cleanly.
///
/// # Examples
///
/// ```
/// use freshet::cache::default_key;
/// use freshet::http::Request;
///
/// let raw = b"GET /a?x=1 HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let (request, _) = Request::parse(raw).unwrap();
/// assert_eq!(default_key(&request), default_key(&request));
/// ```
pub fn default_key(request: &Request) -> String {
    let query = request
        .query_pairs()
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let header_values = request
        .headers()
        .iter()
        .map(|(_, v)| v)
        .collect::<Vec<_>>()
        .join("~");

    let mut hasher = Sha256::new();
    hasher.update(request.path().as_bytes());
    hasher.update(b"?");
    hasher.update(query.as_bytes());
    hasher.update(b"~");
    hasher.update(header_values.as_bytes());
    hasher.update(b"~");
    hasher.update(request.body());
    hex::encode(hasher.finalize())
}
