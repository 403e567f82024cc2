//! Freshness lifetime computation — for how many seconds may a stored
//! response be served?
//!
//! Implements RFC 2616 §13.2.3 age arithmetic: the age a response has already
//! accumulated upstream (`date`/`age` headers), plus the round-trip time of
//! the fetch, plus the time it has sat here, yields its *current age*. The
//! TTL then comes from a strict precedence chain over the response's
//! directives.

use crate::cache::policy;
use crate::http::{DirectiveSet, Response, http_date_epoch};

/// Computes the freshness lifetime of `response` in seconds.
///
/// All instants are seconds since the Unix epoch. `request_time` is when the
/// upstream fetch was started, `response_time` when its response arrived;
/// both are captured once per request lifecycle by the orchestrator and must
/// not be re-read mid-decision. `now` is the evaluation instant.
///
/// Returns `None` when the response must not be cached — either the
/// [`policy`] evaluator rejected it, a timestamp is missing (age arithmetic
/// would be a guess), or no directive yields a lifetime. A returned value may
/// be negative, meaning "already expired"; the caller decides whether such an
/// entry is still worth handing to the store.
///
/// TTL selection is an overwrite chain, not an early-return chain — a later
/// rule always overrides an earlier one when both apply:
///
/// 1. `max-age` → its value, verbatim (an override, not a cap relative to
///    current age).
/// 2. `s-maxage` + `private`, on a private cache → its value.
/// 3. `max-stale` without `must-revalidate` → current age plus the slack.
/// 4. Only if none of the above fired: `expires` → remaining lifetime
///    relative to the response's generation instant, minus current age.
pub fn lifetime(
    response: &Response,
    request_time: Option<i64>,
    response_time: Option<i64>,
    now: i64,
    allow_private: bool,
) -> Option<i64> {
    if !policy::is_cacheable_at(response, allow_private, now) {
        return None;
    }

    // Without both fetch timestamps the execution time is unknowable; fail
    // safe instead of guessing.
    let request_time = request_time?;
    let response_time = response_time?;

    let headers = response.headers();

    let date_instant = headers.get("date").and_then(http_date_epoch);
    let apparent_age = date_instant
        .map(|generated| (response_time - generated).max(0))
        .unwrap_or(0);

    let reported_age = headers
        .get("age")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(apparent_age);

    let corrected_received_age = apparent_age.max(reported_age);
    let corrected_initial_age = corrected_received_age + (response_time - request_time);
    let resident_time = now - response_time;
    let current_age = corrected_initial_age + resident_time;

    let directives = headers
        .get("cache-control")
        .map(DirectiveSet::parse)
        .unwrap_or_default();

    let mut ttl: Option<i64> = None;

    if directives.contains("max-age") {
        ttl = directives.seconds("max-age");
    }

    if allow_private && directives.contains("private") {
        if let Some(shared) = directives.seconds("s-maxage") {
            ttl = Some(shared);
        }
    }

    if directives.contains("max-stale") && !directives.contains("must-revalidate") {
        let slack = directives.seconds("max-stale").unwrap_or(0);
        ttl = Some(current_age + slack);
    }

    if ttl.is_none() {
        if let Some(expires) = headers.get("expires").and_then(http_date_epoch) {
            let generated = date_instant.unwrap_or(now);
            ttl = Some((expires - generated) - current_age);
        }
    }

    ttl
}
