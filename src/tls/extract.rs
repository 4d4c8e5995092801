//! Certificate extraction utilities.

use chrono::{DateTime, Utc};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::x509::X509Name;

use crate::config::UNKNOWN_FIELD;
use crate::models::CertificateInfo;

/// Parses a DER-encoded certificate into the fields the checker reports.
///
/// Never fails: a certificate that cannot be parsed yields
/// [`CertificateInfo::unreadable`], and individual missing fields fall back to
/// `"-"` (names), `None` (expiry) or an empty SAN list.
pub fn extract_certificate_info(der: &[u8]) -> CertificateInfo {
    let cert = match x509_parser::parse_x509_certificate(der) {
        Ok((_, cert)) => cert,
        Err(e) => {
            log::warn!("Failed to parse certificate: {e}");
            return CertificateInfo::unreadable();
        }
    };

    CertificateInfo {
        subject_cn: extract_common_name(cert.subject()),
        issuer_cn: extract_common_name(cert.issuer()),
        not_after: extract_not_after(&cert),
        san_list: extract_certificate_sans(&cert),
    }
}

/// First common-name attribute of a distinguished name, in full.
pub(crate) fn extract_common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::trim)
        .filter(|cn| !cn.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
}

fn extract_not_after(cert: &X509Certificate<'_>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(cert.validity().not_after.timestamp(), 0)
}

/// Extracts the DNS entries of the Subject Alternative Name extension, in
/// certificate order.
///
/// IP addresses, email addresses and other name types are ignored.
pub(crate) fn extract_certificate_sans(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut sans = Vec::new();

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                if let GeneralName::DNSName(dns_name) = general_name {
                    sans.push(dns_name.to_string());
                }
            }
        }
    }

    sans
}
