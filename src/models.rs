//! Data types shared between fetching and diagnosis.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::UNKNOWN_FIELD;

/// Fields read from the leaf certificate a server presented.
///
/// Unreadable name fields hold `"-"`; an unreadable expiry is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    /// Subject common name
    pub subject_cn: String,
    /// Issuer common name
    pub issuer_cn: String,
    /// Expiry timestamp
    pub not_after: Option<DateTime<Utc>>,
    /// DNS entries of the Subject Alternative Name extension, in certificate order
    pub san_list: Vec<String>,
}

impl CertificateInfo {
    /// Certificate that was presented but could not be parsed at all.
    pub fn unreadable() -> Self {
        Self {
            subject_cn: UNKNOWN_FIELD.to_string(),
            issuer_cn: UNKNOWN_FIELD.to_string(),
            not_after: None,
            san_list: Vec::new(),
        }
    }
}
