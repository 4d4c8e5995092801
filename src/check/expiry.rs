//! Renewal-window evaluation.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Whether a certificate needs renewing soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStatus {
    /// No readable expiry date (or no certificate).
    Unknown,
    /// Expires after the alert window.
    Ok,
    /// Expires within the alert window, or already expired.
    DueForRenewal,
}

/// Compares `not_after` with `now + alert_days`.
///
/// A certificate expiring exactly at the threshold is due. A window that
/// reaches past the representable date range covers every expiry.
pub fn evaluate_expiry(
    not_after: Option<DateTime<Utc>>,
    alert_days: u32,
    now: DateTime<Utc>,
) -> RenewalStatus {
    let Some(not_after) = not_after else {
        return RenewalStatus::Unknown;
    };

    let threshold = Duration::try_days(i64::from(alert_days))
        .and_then(|window| now.checked_add_signed(window));
    match threshold {
        Some(threshold) if threshold < not_after => RenewalStatus::Ok,
        _ => RenewalStatus::DueForRenewal,
    }
}

/// Whole days from `now` until `not_after`; negative once expired.
pub fn days_remaining(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (not_after - now).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_unknown_without_expiry() {
        assert_eq!(evaluate_expiry(None, 30, now()), RenewalStatus::Unknown);
    }

    #[test]
    fn test_ok_outside_window() {
        let not_after = now() + Duration::days(200);
        assert_eq!(
            evaluate_expiry(Some(not_after), 30, now()),
            RenewalStatus::Ok
        );
    }

    #[test]
    fn test_due_inside_window() {
        let not_after = now() + Duration::days(10);
        assert_eq!(
            evaluate_expiry(Some(not_after), 30, now()),
            RenewalStatus::DueForRenewal
        );
    }

    #[test]
    fn test_threshold_boundary_is_due() {
        let exactly = now() + Duration::days(30);
        assert_eq!(
            evaluate_expiry(Some(exactly), 30, now()),
            RenewalStatus::DueForRenewal
        );
        let one_second_later = exactly + Duration::seconds(1);
        assert_eq!(
            evaluate_expiry(Some(one_second_later), 30, now()),
            RenewalStatus::Ok
        );
    }

    #[test]
    fn test_expired_is_due() {
        let not_after = now() - Duration::days(3);
        assert_eq!(
            evaluate_expiry(Some(not_after), 30, now()),
            RenewalStatus::DueForRenewal
        );
        assert_eq!(days_remaining(not_after, now()), -3);
    }

    #[test]
    fn test_zero_window_only_flags_expired() {
        let tomorrow = now() + Duration::days(1);
        assert_eq!(evaluate_expiry(Some(tomorrow), 0, now()), RenewalStatus::Ok);
        assert_eq!(
            evaluate_expiry(Some(now()), 0, now()),
            RenewalStatus::DueForRenewal
        );
    }

    #[test]
    fn test_window_past_date_range_is_due() {
        let not_after = now() + Duration::days(200);
        assert_eq!(
            evaluate_expiry(Some(not_after), u32::MAX, now()),
            RenewalStatus::DueForRenewal
        );
    }
}
