//! TLS/SSL certificate retrieval.
//!
//! This module connects to a domain's TLS endpoint and reads the leaf
//! certificate it presents:
//! - Certificate subject and issuer common names
//! - Expiry (not after) date
//! - Subject Alternative Names (SANs)
//!
//! Uses `tokio-rustls` for async TLS connections and `x509-parser` for certificate parsing.
//! Chain trust is never verified; the point is to inspect whatever is presented.

mod extract;

use std::time::Duration;

use futures::future::BoxFuture;
use log::debug;
use rustls::pki_types::{CertificateDer, ServerName};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tokio_rustls::TlsConnector;

use crate::config::MAX_TIMEOUT_SECS;
use crate::error_handling::{FetchError, InitializationError};
use crate::initialization::init_tls_connector;
use crate::models::CertificateInfo;

pub use extract::extract_certificate_info;

/// Anything that can produce the certificate presented for a domain.
///
/// The check pipeline is written against this trait; [`TlsFetcher`] is the
/// network implementation.
pub trait CertificateSource: Send + Sync {
    /// Retrieves and parses the certificate for `domain`.
    ///
    /// An `Err` means no certificate could be obtained; callers turn it into a
    /// `NoCertificate` verdict rather than failing the run.
    fn fetch<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<CertificateInfo, FetchError>>;
}

/// Fetches certificates over TCP + TLS with SNI set to the domain name.
#[derive(Clone)]
pub struct TlsFetcher {
    connector: TlsConnector,
    port: u16,
    timeout: Duration,
}

impl TlsFetcher {
    /// Creates a fetcher with an inspection-only TLS connector.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS client configuration cannot be built.
    pub fn new(port: u16, timeout: Duration) -> Result<Self, InitializationError> {
        Ok(Self::with_connector(init_tls_connector()?, port, timeout))
    }

    /// Builds a fetcher around an already configured connector.
    pub fn with_connector(connector: TlsConnector, port: u16, timeout: Duration) -> Self {
        Self {
            connector,
            port,
            timeout,
        }
    }

    /// Connects to `domain` and returns the leaf certificate it presents.
    ///
    /// The domain is both the connect target and the TLS server name. One
    /// deadline of `timeout` covers TCP connect and handshake together. No retry.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the domain name is invalid, the connection
    /// or handshake fails or times out, or no certificate was presented.
    pub async fn fetch_leaf_certificate(
        &self,
        domain: &str,
    ) -> Result<CertificateDer<'static>, FetchError> {
        debug!("Fetching certificate for {domain}:{}", self.port);

        let server_name = ServerName::try_from(domain.to_string())
            .map_err(|e| FetchError::InvalidServerName(format!("{domain}: {e}")))?;

        let now = Instant::now();
        let deadline = now
            .checked_add(self.timeout)
            .unwrap_or_else(|| now + Duration::from_secs(MAX_TIMEOUT_SECS));
        let secs = self.timeout.as_secs();

        let sock = match timeout_at(deadline, TcpStream::connect((domain, self.port))).await {
            Ok(Ok(sock)) => sock,
            Ok(Err(source)) => {
                return Err(FetchError::Connect {
                    domain: domain.to_string(),
                    port: self.port,
                    source,
                })
            }
            Err(_) => {
                return Err(FetchError::ConnectTimeout {
                    domain: domain.to_string(),
                    port: self.port,
                    secs,
                })
            }
        };

        let tls_stream = match timeout_at(deadline, self.connector.connect(server_name, sock)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(FetchError::Handshake {
                    domain: domain.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(FetchError::HandshakeTimeout {
                    domain: domain.to_string(),
                    secs,
                })
            }
        };

        let (_, connection) = tls_stream.get_ref();
        debug!(
            "Handshake with {domain} negotiated {:?}",
            connection.protocol_version()
        );

        connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .map(|leaf| leaf.clone().into_owned())
            .ok_or_else(|| FetchError::NoPeerCertificate(domain.to_string()))
    }
}

impl CertificateSource for TlsFetcher {
    fn fetch<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<CertificateInfo, FetchError>> {
        Box::pin(async move {
            let leaf = self.fetch_leaf_certificate(domain).await?;
            Ok(extract_certificate_info(leaf.as_ref()))
        })
    }
}
