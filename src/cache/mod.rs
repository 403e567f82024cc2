//! The cache-control decision engine.
//!
//! Four pieces, composed around a single `execute` control path:
//!
//! - [`key`] — pure request → cache-key derivation, swappable at construction.
//! - [`policy`] — may this response be stored at all? (`no-cache`/`no-store`/
//!   `private`/`max-age`/`expires` precedence).
//! - [`freshness`] — for how long? RFC 2616 §13.2.3 age arithmetic plus
//!   directive precedence (`max-age` → `s-maxage`+private → `max-stale` →
//!   `expires`).
//! - [`engine`] — the [`HttpCache`] orchestrator wiring a [`Transport`] and a
//!   [`Store`](crate::store::Store) together, with destructive-method bypass
//!   and `x-cache-status` stamping.

pub mod engine;
pub mod freshness;
pub mod key;
pub mod policy;

pub use engine::{
    CacheError, CacheStatus, HttpCache, Transport, TransportError, TransportFn, transport_fn,
};
pub use freshness::lifetime;
pub use key::{KeyGenerator, default_key};
pub use policy::is_cacheable;
