//! ETA calculation and formatting utilities

use chrono::{DateTime, Utc};

/// Shown when the provider has no estimate.
pub const ETA_UNKNOWN: &str = "N/A";

/// Shown once the estimate has been reached.
pub const IMMINENT_ARRIVAL: &str = "Arrivée imminente";

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Minutes remaining until `estimated`, rounded to the nearest minute with
/// halves rounded up. Negative once the estimate has passed.
pub fn compute_eta_minutes(estimated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    let estimated = estimated?;
    let remaining_ms = (estimated - now).num_milliseconds();

    Some((remaining_ms + MILLIS_PER_MINUTE / 2).div_euclid(MILLIS_PER_MINUTE))
}

/// Format remaining minutes like "45 minutes", "2h" or "2h 5min"
pub fn format_eta(minutes: i64) -> String {
    if minutes <= 0 {
        return IMMINENT_ARRIVAL.to_string();
    }
    if minutes < 60 {
        return format!("{} minutes", minutes);
    }

    let hours = minutes / 60;
    let remainder = minutes % 60;
    if remainder > 0 {
        format!("{}h {}min", hours, remainder)
    } else {
        format!("{}h", hours)
    }
}

pub fn eta_text(estimated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match compute_eta_minutes(estimated, now) {
        Some(minutes) => format_eta(minutes),
        None => ETA_UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_estimate_has_no_minutes() {
        assert_eq!(compute_eta_minutes(None, now()), None);
        assert_eq!(eta_text(None, now()), "N/A");
    }

    #[test]
    fn minutes_round_to_nearest() {
        let at = |ms| Some(now() + Duration::milliseconds(ms));
        assert_eq!(compute_eta_minutes(at(1_500_000), now()), Some(25));
        assert_eq!(compute_eta_minutes(at(29_999), now()), Some(0));
        assert_eq!(compute_eta_minutes(at(30_000), now()), Some(1));
        assert_eq!(compute_eta_minutes(at(89_999), now()), Some(1));
        assert_eq!(compute_eta_minutes(at(-30_000), now()), Some(0));
        assert_eq!(compute_eta_minutes(at(-300_000), now()), Some(-5));
    }

    #[test]
    fn later_estimates_give_more_minutes() {
        let mut previous = None;
        for minute in -10..200 {
            let eta = compute_eta_minutes(Some(now() + Duration::minutes(minute)), now());
            assert!(eta > previous, "minute {minute}");
            previous = eta;
        }
    }

    #[test]
    fn repeated_calls_are_stable() {
        let estimated = Some(now() + Duration::seconds(4321));
        let first = eta_text(estimated, now());
        for _ in 0..10 {
            assert_eq!(eta_text(estimated, now()), first);
        }
    }

    #[test]
    fn format_imminent() {
        assert_eq!(format_eta(0), "Arrivée imminente");
        assert_eq!(format_eta(-5), "Arrivée imminente");
    }

    #[test]
    fn format_minutes_and_hours() {
        assert_eq!(format_eta(1), "1 minutes");
        assert_eq!(format_eta(45), "45 minutes");
        assert_eq!(format_eta(59), "59 minutes");
        assert_eq!(format_eta(60), "1h");
        assert_eq!(format_eta(120), "2h");
        assert_eq!(format_eta(125), "2h 5min");
        assert_eq!(format_eta(1_500), "25h");
    }
}
