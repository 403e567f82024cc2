//! Cacheability evaluation — may this response be stored at all?
//!
//! Directive precedence, in evaluation order:
//!
//! 1. No `cache-control` header → only the `expires` check applies.
//! 2. `no-cache` or `no-store`, with or without a value → not cacheable.
//! 3. `private` on a shared cache requires `s-maxage`; its value replaces any
//!    literal `max-age` in the validity check below (TTL selection in
//!    [`freshness`](super::freshness) re-reads the directives independently).
//! 4. An effective `max-age` below 1 second → not cacheable.
//! 5. With no effective `max-age`, a missing, past, or malformed `expires`
//!    date → not cacheable. An unparsable expiry cannot be trusted as
//!    "future", so it counts as already expired.

use crate::http::{DirectiveSet, Response, http_date_epoch, unix_now};

/// Decides whether `response` may be stored, evaluated against the current
/// wall clock.
///
/// `allow_private` marks this cache as private (per-user): `private`
/// responses are then storable without an `s-maxage` escape hatch.
///
/// # Examples
///
/// ```
/// use freshet::cache::is_cacheable;
/// use freshet::http::{Response, StatusCode};
///
/// let fresh = Response::new(StatusCode::Ok).header("Cache-Control", "max-age=60");
/// assert!(is_cacheable(&fresh, false));
///
/// let never = Response::new(StatusCode::Ok).header("Cache-Control", "no-store");
/// assert!(!is_cacheable(&never, false));
/// ```
pub fn is_cacheable(response: &Response, allow_private: bool) -> bool {
    is_cacheable_at(response, allow_private, unix_now())
}

/// [`is_cacheable`] with an explicit evaluation instant (epoch seconds).
///
/// The engine evaluates storability once per response, at the moment of the
/// storage decision; passing `now` explicitly keeps that evaluation, and the
/// tests for it, deterministic.
pub fn is_cacheable_at(response: &Response, allow_private: bool, now: i64) -> bool {
    let mut max_age: Option<i64> = None;

    if let Some(raw) = response.headers().get("cache-control") {
        let directives = DirectiveSet::parse(raw);

        if directives.contains("no-cache") || directives.contains("no-store") {
            return false;
        }

        if directives.contains("max-age") {
            max_age = directives.seconds("max-age");
        }

        if directives.contains("private") && !allow_private {
            // A shared cache may only hold a private response when s-maxage
            // explicitly carves out shared-cache behavior; its value then
            // replaces any literal max-age for the validity check below.
            match directives.seconds("s-maxage") {
                Some(shared) => max_age = Some(shared),
                None => return false,
            }
        }

        if let Some(age) = max_age {
            if age < 1 {
                return false;
            }
        }
    }

    if max_age.is_none() {
        if let Some(expires) = response.headers().get("expires") {
            match http_date_epoch(expires) {
                Some(instant) if instant > now => {}
                // At-or-before now, or unparsable: already expired.
                _ => return false,
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    const NOW: i64 = 1_700_000_000;

    fn response(cache_control: Option<&str>) -> Response {
        let r = Response::new(StatusCode::Ok).body("x");
        match cache_control {
            Some(cc) => r.header("Cache-Control", cc),
            None => r,
        }
    }

    fn http_date(epoch: i64) -> String {
        let t = std::time::UNIX_EPOCH + std::time::Duration::from_secs(epoch as u64);
        httpdate::fmt_http_date(t)
    }

    #[test]
    fn no_headers_is_cacheable() {
        assert!(is_cacheable_at(&response(None), false, NOW));
    }

    #[test]
    fn no_store_and_no_cache_always_reject() {
        assert!(!is_cacheable_at(&response(Some("no-store")), false, NOW));
        assert!(!is_cacheable_at(&response(Some("no-cache")), false, NOW));
        // Other directives cannot rescue them.
        assert!(!is_cacheable_at(
            &response(Some("no-store, max-age=300")),
            false,
            NOW
        ));
        assert!(!is_cacheable_at(
            &response(Some("no-cache=\"set-cookie\", max-age=300")),
            true,
            NOW
        ));
    }

    #[test]
    fn private_requires_s_maxage_on_shared_cache() {
        assert!(!is_cacheable_at(&response(Some("private")), false, NOW));
        assert!(is_cacheable_at(
            &response(Some("private, s-maxage=120")),
            false,
            NOW
        ));
        // The substituted s-maxage goes through the max-age validity check.
        assert!(!is_cacheable_at(
            &response(Some("private, s-maxage=0")),
            false,
            NOW
        ));
    }

    #[test]
    fn s_maxage_replaces_literal_max_age_on_shared_cache() {
        // On a shared cache the s-maxage value is what gets validated, no
        // matter what the literal max-age says.
        assert!(!is_cacheable_at(
            &response(Some("private, s-maxage=0, max-age=60")),
            false,
            NOW
        ));
        assert!(is_cacheable_at(
            &response(Some("private, s-maxage=100, max-age=0")),
            false,
            NOW
        ));
        // On a private cache the substitution never activates.
        assert!(is_cacheable_at(
            &response(Some("private, s-maxage=0, max-age=60")),
            true,
            NOW
        ));
    }

    #[test]
    fn private_is_fine_on_private_cache() {
        assert!(is_cacheable_at(&response(Some("private")), true, NOW));
    }

    #[test]
    fn max_age_validity() {
        assert!(is_cacheable_at(&response(Some("max-age=60")), false, NOW));
        assert!(!is_cacheable_at(&response(Some("max-age=0")), false, NOW));
        assert!(!is_cacheable_at(&response(Some("max-age=-10")), false, NOW));
        // Malformed values parse as 0 and fail the validity check.
        assert!(!is_cacheable_at(
            &response(Some("max-age=borked")),
            false,
            NOW
        ));
    }

    #[test]
    fn future_expires_is_cacheable() {
        let r = response(None).header("Expires", http_date(NOW + 300));
        assert!(is_cacheable_at(&r, false, NOW));
    }

    #[test]
    fn past_or_present_expires_rejects() {
        let past = response(None).header("Expires", http_date(NOW - 1));
        assert!(!is_cacheable_at(&past, false, NOW));
        let exactly_now = response(None).header("Expires", http_date(NOW));
        assert!(!is_cacheable_at(&exactly_now, false, NOW));
    }

    #[test]
    fn malformed_expires_rejects() {
        let r = response(None).header("Expires", "0");
        assert!(!is_cacheable_at(&r, false, NOW));
    }

    #[test]
    fn max_age_shadows_expires() {
        // With max-age present the expires header is not consulted at all.
        let r = response(Some("max-age=60")).header("Expires", http_date(NOW - 100));
        assert!(is_cacheable_at(&r, false, NOW));
    }
}
