//! The cache orchestrator — wires the transport, store, key strategy, and
//! freshness arithmetic into a single `execute` control path.
//!
//! Control flow per request:
//!
//! - POST/PUT/DELETE bypass the store entirely, run the transport once, and
//!   come back stamped `cache-control: no-cache, must-revalidate`.
//! - Otherwise the store is consulted under the derived key. A hit is served
//!   as-is with `x-cache-status: HIT`; a miss runs the transport, computes a
//!   TTL from the fresh response, and stores it best-effort when eligible.
//!
//! Request-scoped timestamps (fetch start, response receipt) live on the
//! call stack, never on the orchestrator, so concurrent `execute` calls on
//! one shared instance cannot observe each other's clocks.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::BoxFuture;
use crate::cache::{freshness, key};
use crate::http::{Request, Response, unix_now};
use crate::store::Store;

/// Diagnostic header carrying the cache decision for a served response.
pub const X_CACHE_STATUS: &str = "x-cache-status";

/// Diagnostic header counting how often an entry has been served from cache.
pub const X_CACHE_HITS: &str = "x-cache-hits";

/// The terminal cache decision stamped on a response (or request, for the
/// MISS observability stamp).
///
/// A response with none of these is also a valid terminal state: it was not
/// previously cached and not eligible for storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The store had no entry; the transport was invoked.
    Miss,
    /// Served from the store without invoking the transport.
    Hit,
    /// Freshly fetched and handed to the store.
    Saved,
}

impl CacheStatus {
    /// The wire form written into [`X_CACHE_STATUS`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miss => "MISS",
            Self::Hit => "HIT",
            Self::Saved => "SAVED",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by a [`Transport`] while executing a request upstream.
///
/// Transport failures are fatal to the current `execute` call and propagate
/// unchanged; the engine never retries.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Errors surfaced by [`HttpCache::execute`].
///
/// Store failures never appear here — storing is best-effort and a failed
/// write degrades to "not cached this time".
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Executes one request against the origin and returns its response.
///
/// Network clients implement this directly and return a real future; plain
/// functions and test doubles go through [`transport_fn`].
pub trait Transport: Send + Sync {
    /// Execute `request` fully and produce its response.
    fn execute<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, Result<Response, TransportError>>;
}

/// A [`Transport`] backed by a plain function. Built with [`transport_fn`].
pub struct TransportFn<F> {
    f: F,
}

/// Wraps a `Fn(&Request) -> Result<Response, TransportError>` as a
/// [`Transport`].
///
/// # Examples
///
/// ```
/// use freshet::{HttpCache, Response, StatusCode};
/// use freshet::cache::transport_fn;
///
/// let cache = HttpCache::new(transport_fn(|_req| {
///     Ok(Response::new(StatusCode::Ok).body("fresh"))
/// }));
/// # let _ = cache;
/// ```
pub fn transport_fn<F>(f: F) -> TransportFn<F>
where
    F: Fn(&Request) -> Result<Response, TransportError> + Send + Sync,
{
    TransportFn { f }
}

impl<F> Transport for TransportFn<F>
where
    F: Fn(&Request) -> Result<Response, TransportError> + Send + Sync,
{
    fn execute<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, Result<Response, TransportError>> {
        let result = (self.f)(request);
        Box::pin(std::future::ready(result))
    }
}

/// The caching front door around a [`Transport`].
///
/// Holds no per-request state: one instance is shared across concurrent
/// tasks, and every `execute` call keeps its timestamps on its own stack.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use freshet::{HttpCache, MemoryStore, Request, Response, StatusCode};
/// use freshet::cache::transport_fn;
///
/// # async fn demo() -> Result<(), freshet::CacheError> {
/// let cache = HttpCache::new(transport_fn(|_req| {
///     Ok(Response::new(StatusCode::Ok)
///         .header("Cache-Control", "max-age=60")
///         .body("fresh"))
/// }))
/// .store(Arc::new(MemoryStore::new()))
/// .key_generator(|req: &Request| req.path().to_owned());
///
/// let raw = b"GET /resource HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let (mut request, _) = Request::parse(raw).unwrap();
/// let response = cache.execute(&mut request).await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpCache<T> {
    transport: T,
    store: Option<Arc<dyn Store>>,
    key_generator: key::KeyGenerator,
    allow_private: bool,
}

impl<T: Transport> HttpCache<T> {
    /// Creates an engine around `transport` with the default SHA-256 key
    /// strategy, no store (every request is a MISS), and shared-cache
    /// semantics (`private` responses rejected unless `s-maxage` allows).
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            store: None,
            key_generator: Arc::new(key::default_key),
            allow_private: false,
        }
    }

    /// Attaches the store entries are persisted to and served from.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the key-derivation strategy.
    ///
    /// The strategy's contract is [`key::default_key`]'s: pure and
    /// deterministic over the request. Being an ordinary function value it is
    /// validated by the type system at this call site — there is no runtime
    /// "not invocable" failure mode to defer.
    #[must_use]
    pub fn key_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        self.key_generator = Arc::new(generator);
        self
    }

    /// Marks this cache as private (per-user), making `private` responses
    /// storable and enabling the `s-maxage`-with-`private` lifetime rule.
    #[must_use]
    pub fn allow_private(mut self, allow: bool) -> Self {
        self.allow_private = allow;
        self
    }

    /// Returns the cache key the configured strategy derives for `request`.
    pub fn cache_key(&self, request: &Request) -> String {
        (self.key_generator)(request)
    }

    /// Runs `request` through the cache: bypass for destructive methods,
    /// lookup-or-populate for everything else.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Transport`] when the upstream fetch fails. Store
    /// failures are logged and swallowed — a cache miss always still produces
    /// a response as long as the transport succeeds.
    pub async fn execute(&self, request: &mut Request) -> Result<Response, CacheError> {
        if request.method().is_destructive() {
            debug!(method = %request.method(), path = %request.path(), "destructive method — bypassing cache");
            let mut response = self.transport.execute(request).await?;
            response
                .headers_mut()
                .set("cache-control", "no-cache, must-revalidate");
            return Ok(response);
        }

        self.lookup_or_populate(request).await
    }

    /// Deletes the entry the configured key strategy maps `request` to.
    ///
    /// A missing store, a missing entry, and a failing delete all degrade to
    /// a no-op; only the failure is logged.
    pub async fn invalidate(&self, request: &Request) {
        let Some(store) = &self.store else {
            return;
        };
        let cache_key = (self.key_generator)(request);
        if let Err(e) = store.delete(&cache_key).await {
            warn!(key = %cache_key, error = %e, "store delete failed");
        }
    }

    async fn lookup_or_populate(&self, request: &mut Request) -> Result<Response, CacheError> {
        // pragma: no-cache forbids serving from the store, but the fresh
        // result may still be stored afterwards.
        let bypass_read = request
            .headers()
            .get("pragma")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("no-cache"));

        let cache_key = (self.key_generator)(request);

        if let Some(store) = &self.store {
            if bypass_read {
                debug!(key = %cache_key, "pragma: no-cache — skipping store read");
            } else {
                match store.get(&cache_key).await {
                    Ok(Some(mut cached)) => {
                        let hits = cached
                            .headers()
                            .get(X_CACHE_HITS)
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(0)
                            + 1;
                        cached.headers_mut().set(X_CACHE_HITS, hits.to_string());
                        // Persist the incremented count before the HIT stamp
                        // so the stored copy keeps its original status. The
                        // write-back keeps the entry's remaining lifetime and
                        // is best-effort like every other store write.
                        if let Err(e) = store.replace(&cache_key, &cached).await {
                            warn!(key = %cache_key, error = %e, "hit-count write-back failed");
                        }
                        cached
                            .headers_mut()
                            .set(X_CACHE_STATUS, CacheStatus::Hit.as_str());
                        debug!(key = %cache_key, hits, "cache hit");
                        return Ok(cached);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(key = %cache_key, error = %e, "store read failed — treating as miss");
                    }
                }
            }
        }

        // MISS path. The stamp goes on the *request* so observers of the
        // upstream fetch can attribute it; the response only ever carries
        // SAVED (stored) or nothing (ineligible).
        request
            .headers_mut()
            .set(X_CACHE_STATUS, CacheStatus::Miss.as_str());

        let request_time = unix_now();
        let mut response = self.transport.execute(request).await?;
        let response_time = unix_now();

        let ttl = freshness::lifetime(
            &response,
            Some(request_time),
            Some(response_time),
            response_time,
            self.allow_private,
        );

        match (ttl, &self.store) {
            (Some(ttl), Some(store)) => {
                response
                    .headers_mut()
                    .set(X_CACHE_STATUS, CacheStatus::Saved.as_str());
                match store.set(&cache_key, &response, ttl).await {
                    Ok(stored) => {
                        debug!(key = %cache_key, ttl, stored, "response stored");
                    }
                    Err(e) => {
                        warn!(key = %cache_key, error = %e, "store write failed — response served uncached");
                    }
                }
            }
            (Some(_), None) => {
                debug!(key = %cache_key, "no store configured — response served uncached");
            }
            (None, _) => {
                debug!(key = %cache_key, "response not cacheable");
            }
        }

        Ok(response)
    }
}
