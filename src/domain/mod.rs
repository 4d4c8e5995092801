//! Domain list assembly.
//!
//! Domains come from positional arguments, a list file, a directory listing,
//! and web server configuration scrapes, in that order. Every candidate is
//! normalized with [`normalize_domain`]; invalid candidates are skipped with a
//! warning. Duplicates across sources are kept and checked independently.

mod sources;

use log::{info, warn};

use crate::config::{Config, MAX_DOMAIN_LENGTH};
use crate::error_handling::ConfigError;

pub use sources::{
    list_domain_directory, read_domain_file, read_domains, scrape_vhost_text, scrape_vhosts,
};

/// Normalizes a domain candidate into a host name suitable for SNI.
///
/// Surrounding whitespace, an `http://` or `https://` scheme, any path, query
/// or fragment, and a trailing dot are removed. Case is preserved, since the
/// certificate name comparison is case-sensitive.
///
/// Returns `None` for empty candidates, names longer than 253 characters,
/// names containing whitespace or a port, and anything that is not a valid
/// URL host.
///
/// # Examples
///
/// ```
/// use cert_status::domain::normalize_domain;
///
/// assert_eq!(
///     normalize_domain("https://www.example.com/login").as_deref(),
///     Some("www.example.com")
/// );
/// assert_eq!(normalize_domain("example.com.").as_deref(), Some("example.com"));
/// assert_eq!(normalize_domain("not a domain"), None);
/// ```
pub fn normalize_domain(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    let without_scheme = ["https://", "http://"]
        .iter()
        .find_map(|scheme| {
            trimmed
                .get(..scheme.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
                .map(|_| &trimmed[scheme.len()..])
        })
        .unwrap_or(trimmed);

    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.strip_suffix('.').unwrap_or(host);

    if host.is_empty()
        || host.len() > MAX_DOMAIN_LENGTH
        || host.chars().any(|c| c.is_whitespace() || c == ':' || c == '@')
    {
        return None;
    }

    let parsed = url::Url::parse(&format!("https://{host}")).ok()?;
    parsed.host_str()?;
    Some(host.to_string())
}

/// Collects and normalizes the domains from every source named in `config`.
///
/// # Errors
///
/// Returns [`ConfigError::NoDomainSource`] when no source is configured,
/// [`ConfigError::SourceUnreadable`] when a file or directory cannot be read,
/// and [`ConfigError::NoDomains`] when the sources yield no valid domain.
pub fn collect_domains(config: &Config) -> Result<Vec<String>, ConfigError> {
    if !config.has_domain_source() {
        return Err(ConfigError::NoDomainSource);
    }

    let mut candidates = config.domains.clone();
    if let Some(file) = &config.file {
        candidates.extend(read_domain_file(file)?);
    }
    if let Some(dir) = &config.dir {
        candidates.extend(list_domain_directory(dir)?);
    }
    for path in &config.vhosts {
        candidates.extend(scrape_vhosts(path)?);
    }

    let domains = normalize_all(candidates);
    if domains.is_empty() {
        return Err(ConfigError::NoDomains);
    }

    info!("Checking {} domain(s)", domains.len());
    Ok(domains)
}

fn normalize_all(candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let normalized = normalize_domain(&candidate);
            if normalized.is_none() {
                warn!("Skipping invalid domain {candidate:?}");
            }
            normalized
        })
        .collect()
}
