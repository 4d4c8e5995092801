//! Matching a certificate's names against the domain that was queried.

use serde::Serialize;

use crate::config::UNKNOWN_FIELD;
use crate::models::CertificateInfo;

/// How the retrieved certificate relates to the queried domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    /// Subject common name equals the domain.
    ExactMatch,
    /// Domain appears in the SAN list but not as the subject.
    AltNameMatch,
    /// A certificate was presented for some other name.
    Mismatch,
    /// No certificate could be retrieved.
    NoCertificate,
}

impl MatchResult {
    /// True for exact and alternative-name matches.
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::ExactMatch | MatchResult::AltNameMatch)
    }
}

/// Reconciles `domain` against the certificate it presented.
///
/// Comparison is case-sensitive and literal: a `*.example.com` entry does not
/// match `www.example.com`.
pub fn reconcile(domain: &str, certificate: Option<&CertificateInfo>) -> MatchResult {
    let Some(cert) = certificate else {
        return MatchResult::NoCertificate;
    };

    if cert.subject_cn == domain {
        MatchResult::ExactMatch
    } else if cert.san_list.iter().any(|san| san == domain) {
        MatchResult::AltNameMatch
    } else {
        MatchResult::Mismatch
    }
}

/// Text for the "cert issued for" column.
///
/// Alternative-name matches show the queried domain marked `(alt)`; other
/// certificates show their subject; no certificate shows `-`.
pub fn match_annotation(
    domain: &str,
    certificate: Option<&CertificateInfo>,
    result: MatchResult,
) -> String {
    match (result, certificate) {
        (MatchResult::AltNameMatch, _) => format!("{domain} (alt)"),
        (MatchResult::NoCertificate, _) | (_, None) => UNKNOWN_FIELD.to_string(),
        (_, Some(cert)) => cert.subject_cn.clone(),
    }
}
