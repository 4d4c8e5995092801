//! Concurrent fetch-and-evaluate over a domain list.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{FuturesOrdered, Stream, StreamExt};
use log::{debug, warn};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::expiry::RenewalStatus;
use super::reconcile::MatchResult;
use super::verdict::DomainVerdict;
use crate::config::{DEFAULT_ALERT_DAYS, DEFAULT_MAX_CONCURRENCY};
use crate::error_handling::{FetchError, InfoType, ProcessingStats, WarningType};
use crate::initialization::init_semaphore;
use crate::models::CertificateInfo;
use crate::tls::CertificateSource;

/// Parameters shared by every domain in a run.
#[derive(Debug, Clone, Copy)]
pub struct CheckSettings {
    /// Renewal alert window in days
    pub alert_days: u32,
    /// Maximum simultaneous fetches
    pub max_concurrency: usize,
    /// Single clock reading used for every expiry comparison in the run
    pub now: DateTime<Utc>,
}

impl CheckSettings {
    /// Settings with `now` taken from the system clock.
    pub fn new(alert_days: u32, max_concurrency: usize) -> Self {
        Self {
            alert_days,
            max_concurrency,
            now: Utc::now(),
        }
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_DAYS, DEFAULT_MAX_CONCURRENCY)
    }
}

/// Checks every domain and yields one verdict per domain, in input order.
///
/// Each domain runs in its own task; at most `max_concurrency` fetches are in
/// flight. Verdicts are yielded as soon as they and all earlier ones are
/// ready, so a slow domain delays later output but not later fetches.
///
/// Cancelling `cancel` ends outstanding fetches; their domains still get a
/// `NoCertificate` verdict so the stream stays one-to-one with the input.
///
/// Must be called from within a Tokio runtime.
pub fn verdict_stream(
    domains: Vec<String>,
    source: Arc<dyn CertificateSource>,
    settings: CheckSettings,
    stats: Arc<ProcessingStats>,
    cancel: CancellationToken,
) -> impl Stream<Item = DomainVerdict> + Send + 'static {
    let semaphore = init_semaphore(settings.max_concurrency.max(1));
    let mut tasks = FuturesOrdered::new();

    for domain in domains {
        let handle = tokio::spawn(check_domain(
            domain.clone(),
            Arc::clone(&source),
            Arc::clone(&semaphore),
            settings,
            Arc::clone(&stats),
            cancel.clone(),
        ));

        tasks.push_back(async move {
            match handle.await {
                Ok(verdict) => verdict,
                Err(join_error) => {
                    warn!("Check task for {domain} panicked: {join_error}");
                    DomainVerdict::from_fetch(
                        domain,
                        Err(FetchError::TaskFailed(join_error.to_string())),
                        settings.alert_days,
                        settings.now,
                    )
                }
            }
        });
    }

    tasks
}

/// Checks every domain and returns the verdicts in input order.
pub async fn check_domains(
    domains: Vec<String>,
    source: Arc<dyn CertificateSource>,
    settings: CheckSettings,
    stats: Arc<ProcessingStats>,
    cancel: CancellationToken,
) -> Vec<DomainVerdict> {
    verdict_stream(domains, source, settings, stats, cancel)
        .collect()
        .await
}

async fn check_domain(
    domain: String,
    source: Arc<dyn CertificateSource>,
    semaphore: Arc<Semaphore>,
    settings: CheckSettings,
    stats: Arc<ProcessingStats>,
    cancel: CancellationToken,
) -> DomainVerdict {
    let fetched = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::TaskFailed("check cancelled".to_string())),
        result = fetch_with_permit(&semaphore, source.as_ref(), &domain) => result,
    };

    if let Err(e) = &fetched {
        warn!("No certificate for {domain}: {e}");
        stats.increment_error(e.error_type());
    }

    let verdict = DomainVerdict::from_fetch(domain, fetched, settings.alert_days, settings.now);
    record_verdict(&stats, &verdict);
    debug!(
        "{}: {:?}, {:?}, problems={:?}",
        verdict.domain(),
        verdict.match_result(),
        verdict.renewal(),
        verdict.problems()
    );
    verdict
}

async fn fetch_with_permit(
    semaphore: &Semaphore,
    source: &dyn CertificateSource,
    domain: &str,
) -> Result<CertificateInfo, FetchError> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| FetchError::TaskFailed(e.to_string()))?;
    source.fetch(domain).await
}

fn record_verdict(stats: &ProcessingStats, verdict: &DomainVerdict) {
    match verdict.match_result() {
        MatchResult::ExactMatch => stats.increment_info(InfoType::ExactMatch),
        MatchResult::AltNameMatch => stats.increment_info(InfoType::AltNameMatch),
        MatchResult::Mismatch => stats.increment_warning(WarningType::NameMismatch),
        MatchResult::NoCertificate => {}
    }
    match verdict.renewal() {
        RenewalStatus::DueForRenewal => stats.increment_warning(WarningType::DueForRenewal),
        RenewalStatus::Unknown if verdict.certificate().is_some() => {
            stats.increment_warning(WarningType::MissingExpiry)
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Source that sleeps longer for earlier domains and tracks peak concurrency.
    struct SlowSource {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl CertificateSource for SlowSource {
        fn fetch<'a>(
            &'a self,
            domain: &'a str,
        ) -> BoxFuture<'a, Result<CertificateInfo, FetchError>> {
            Box::pin(async move {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                let delay = 60 - domain.len() as u64;
                tokio::time::sleep(Duration::from_millis(delay)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(CertificateInfo {
                    subject_cn: domain.to_string(),
                    issuer_cn: "Test CA".to_string(),
                    not_after: Some(Utc::now() + chrono::Duration::days(90)),
                    san_list: Vec::new(),
                })
            })
        }
    }

    #[tokio::test]
    async fn test_order_preserved_and_concurrency_bounded() {
        let source = Arc::new(SlowSource {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let domains: Vec<String> = (0..12)
            .map(|i| format!("{}.example.com", "a".repeat(i + 1)))
            .collect();
        let settings = CheckSettings::new(30, 3);
        let stats = Arc::new(ProcessingStats::new());

        let verdicts = check_domains(
            domains.clone(),
            source.clone(),
            settings,
            Arc::clone(&stats),
            CancellationToken::new(),
        )
        .await;

        let order: Vec<&str> = verdicts.iter().map(|v| v.domain()).collect();
        assert_eq!(order, domains.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(source.peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(stats.get_info_count(InfoType::ExactMatch), 12);
    }

    #[tokio::test]
    async fn test_cancelled_run_still_yields_one_verdict_per_domain() {
        let source = Arc::new(SlowSource {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let cancel = CancellationToken::new();
        cancel.cancel();

        let verdicts = check_domains(
            vec!["a.example.com".to_string(), "b.example.com".to_string()],
            source,
            CheckSettings::default(),
            Arc::new(ProcessingStats::new()),
            cancel,
        )
        .await;

        assert_eq!(verdicts.len(), 2);
        assert!(verdicts
            .iter()
            .all(|v| v.match_result() == MatchResult::NoCertificate));
    }
}
