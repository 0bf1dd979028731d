//! Check scheduling — determines when the next full check run is due.

use chrono::DateTime;

/// Returns true if `next_check_at` is in the past relative to `now`.
///
/// Both arguments are RFC3339 timestamps. Unparseable input is treated as
/// not due rather than propagated; a corrupt stored timestamp should never
/// wedge the run loop.
#[must_use]
pub fn is_check_due(next_check_at: &str, now: &str) -> bool {
    let next = DateTime::parse_from_rfc3339(next_check_at).ok();
    let current = DateTime::parse_from_rfc3339(now).ok();
    match (next, current) {
        (Some(n), Some(c)) => n <= c,
        _ => false,
    }
}

/// Return the RFC3339 timestamp for `now + interval_minutes`.
#[must_use]
pub fn next_check_timestamp(interval_minutes: u32) -> String {
    use chrono::Utc;
    let next = Utc::now() + chrono::Duration::minutes(i64::from(interval_minutes));
    next.to_rfc3339()
}
