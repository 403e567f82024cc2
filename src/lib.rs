//! # freshet
//!
//! An HTTP cache-control decision engine: given a request and the response an
//! upstream transport produced for it, freshet decides whether the response
//! may be stored, for how long it stays fresh (RFC 2616 §13.2.3 / RFC 7234
//! age arithmetic), how to key it, and serves subsequent identical requests
//! from a pluggable store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use freshet::{HttpCache, MemoryStore, Request, Response, StatusCode};
//! use freshet::cache::transport_fn;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Any plain `Fn(&Request) -> Result<Response, TransportError>` can
//!     // stand in as the transport; real clients implement `Transport`.
//!     let cache = HttpCache::new(transport_fn(|_req| {
//!         Ok(Response::new(StatusCode::Ok)
//!             .header("Cache-Control", "max-age=60")
//!             .body("Hello, World!"))
//!     }))
//!     .store(Arc::new(MemoryStore::new()));
//!
//!     let raw = b"GET /greeting HTTP/1.1\r\nHost: localhost\r\n\r\n";
//!     let (mut request, _) = Request::parse(raw)?;
//!
//!     let response = cache.execute(&mut request).await?;
//!     assert_eq!(response.headers().get("x-cache-status"), Some("SAVED"));
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod cache;
pub mod http;
pub mod store;

/// Boxed, `Send` future returned by the collaborator traits
/// ([`Transport`] and [`Store`]).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cache::{CacheError, CacheStatus, HttpCache, Transport, TransportError};
pub use http::{DirectiveSet, Headers, Method, Request, Response, StatusCode};
pub use store::{MemoryStore, Store, StoreError};
