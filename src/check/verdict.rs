//! Per-domain verdicts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::expiry::{days_remaining, evaluate_expiry, RenewalStatus};
use super::reconcile::{match_annotation, reconcile, MatchResult};
use crate::config::UNKNOWN_FIELD;
use crate::error_handling::FetchError;
use crate::models::CertificateInfo;

/// A problem found for a domain, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Problem {
    /// The fetch produced no certificate.
    NoCertificate,
    /// The certificate names neither the domain as subject nor in its SANs.
    NameMismatch,
    /// The certificate expires within the alert window.
    NearRenewal,
}

impl Problem {
    /// Text shown in the problems column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Problem::NoCertificate => "no certificate found",
            Problem::NameMismatch => "certificate name mismatch",
            Problem::NearRenewal => "certificate near renewal date",
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Problem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The outcome of checking one domain. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainVerdict {
    domain: String,
    certificate: Option<CertificateInfo>,
    #[serde(rename = "match")]
    match_result: MatchResult,
    renewal: RenewalStatus,
    problems: Vec<Problem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fetch_error: Option<String>,
}

impl DomainVerdict {
    /// Builds the verdict for `domain` from whatever the fetch produced.
    pub fn new(
        domain: impl Into<String>,
        certificate: Option<CertificateInfo>,
        alert_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let domain = domain.into();
        let match_result = reconcile(&domain, certificate.as_ref());
        let renewal = evaluate_expiry(
            certificate.as_ref().and_then(|c| c.not_after),
            alert_days,
            now,
        );

        Self {
            problems: compose_problems(match_result, renewal),
            domain,
            certificate,
            match_result,
            renewal,
            fetch_error: None,
        }
    }

    /// Builds the verdict from a fetch result, keeping the failure reason.
    pub fn from_fetch(
        domain: impl Into<String>,
        fetched: Result<CertificateInfo, FetchError>,
        alert_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        match fetched {
            Ok(certificate) => Self::new(domain, Some(certificate), alert_days, now),
            Err(e) => Self {
                fetch_error: Some(e.to_string()),
                ..Self::new(domain, None, alert_days, now)
            },
        }
    }

    /// The domain as checked.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Fields of the presented certificate, if one was retrieved.
    pub fn certificate(&self) -> Option<&CertificateInfo> {
        self.certificate.as_ref()
    }

    /// How the certificate names relate to the domain.
    pub fn match_result(&self) -> MatchResult {
        self.match_result
    }

    /// Renewal status under the alert window.
    pub fn renewal(&self) -> RenewalStatus {
        self.renewal
    }

    /// Problems in display order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Why no certificate was retrieved, if the fetch failed.
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// True if any problem was found.
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// True if the certificate expires within the alert window.
    pub fn is_due_for_renewal(&self) -> bool {
        self.renewal == RenewalStatus::DueForRenewal
    }

    /// "Cert issued for" column text.
    pub fn issued_for(&self) -> String {
        match_annotation(&self.domain, self.certificate.as_ref(), self.match_result)
    }

    /// "Issued by" column text.
    pub fn issued_by(&self) -> &str {
        self.certificate
            .as_ref()
            .map(|c| c.issuer_cn.as_str())
            .unwrap_or(UNKNOWN_FIELD)
    }

    /// "Valid until" column text: the expiry date, or `-`.
    pub fn valid_until(&self) -> String {
        self.not_after()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
    }

    /// Days left before expiry, relative to `now`.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.not_after().map(|t| days_remaining(t, now))
    }

    fn not_after(&self) -> Option<DateTime<Utc>> {
        self.certificate.as_ref().and_then(|c| c.not_after)
    }
}

/// Name problem first, renewal problem second.
fn compose_problems(match_result: MatchResult, renewal: RenewalStatus) -> Vec<Problem> {
    let mut problems = Vec::with_capacity(2);
    match match_result {
        MatchResult::NoCertificate => problems.push(Problem::NoCertificate),
        MatchResult::Mismatch => problems.push(Problem::NameMismatch),
        MatchResult::ExactMatch | MatchResult::AltNameMatch => {}
    }
    if renewal == RenewalStatus::DueForRenewal {
        problems.push(Problem::NearRenewal);
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn cert(subject: &str, sans: &[&str], days: i64) -> CertificateInfo {
        CertificateInfo {
            subject_cn: subject.to_string(),
            issuer_cn: "R11".to_string(),
            not_after: Some(now() + Duration::days(days)),
            san_list: sans.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_healthy_certificate_has_no_problems() {
        let v = DomainVerdict::new(
            "example.com",
            Some(cert("example.com", &[], 200)),
            30,
            now(),
        );
        assert_eq!(v.match_result(), MatchResult::ExactMatch);
        assert_eq!(v.renewal(), RenewalStatus::Ok);
        assert!(!v.has_problems());
        assert_eq!(v.issued_for(), "example.com");
        assert_eq!(v.issued_by(), "R11");
        assert_eq!(v.valid_until(), "2026-09-17");
        assert_eq!(v.days_remaining(now()), Some(200));
    }

    #[test]
    fn test_mismatch_and_due_in_fixed_order() {
        let v = DomainVerdict::new("example.com", Some(cert("other.org", &[], 5)), 30, now());
        assert_eq!(v.problems(), &[Problem::NameMismatch, Problem::NearRenewal]);
    }

    #[test]
    fn test_oversized_window_is_due_not_missing() {
        let v = DomainVerdict::new(
            "example.com",
            Some(cert("example.com", &[], 200)),
            u32::MAX,
            now(),
        );
        assert_eq!(v.match_result(), MatchResult::ExactMatch);
        assert_eq!(v.problems(), &[Problem::NearRenewal]);
    }

    #[test]
    fn test_fetch_failure_keeps_reason() {
        let v = DomainVerdict::from_fetch(
            "nosuchhost.invalid",
            Err(FetchError::NoPeerCertificate("nosuchhost.invalid".to_string())),
            30,
            now(),
        );
        assert_eq!(v.match_result(), MatchResult::NoCertificate);
        assert_eq!(v.renewal(), RenewalStatus::Unknown);
        assert_eq!(v.problems(), &[Problem::NoCertificate]);
        assert!(v.fetch_error().is_some());
        assert_eq!(v.issued_for(), "-");
        assert_eq!(v.issued_by(), "-");
        assert_eq!(v.valid_until(), "-");
    }

    #[test]
    fn test_problems_nonempty_iff_unmatched_or_due() {
        let cases = [
            (cert("example.com", &[], 200), false),
            (cert("x.org", &["example.com"], 200), false),
            (cert("x.org", &[], 200), true),
            (cert("example.com", &[], 1), true),
        ];
        for (c, expect_problems) in cases {
            let v = DomainVerdict::new("example.com", Some(c), 30, now());
            assert_eq!(
                v.has_problems(),
                !v.match_result().is_match() || v.is_due_for_renewal()
            );
            assert_eq!(v.has_problems(), expect_problems);
        }
    }

    #[test]
    fn test_json_shape() {
        let v = DomainVerdict::new(
            "www.example.com",
            Some(cert("example.com", &["www.example.com"], 10)),
            30,
            now(),
        );
        let json = serde_json::to_value(&v).expect("serialize");
        assert_eq!(json["domain"], "www.example.com");
        assert_eq!(json["match"], "alt_name_match");
        assert_eq!(json["renewal"], "due_for_renewal");
        assert_eq!(json["problems"][0], "certificate near renewal date");
        assert!(json.get("fetch_error").is_none());
    }
}
