// Shared test helpers: generated certificates, a local TLS server, and stub
// certificate sources.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cert_status::error_handling::{CommandError, FetchError};
use cert_status::report::RenewAction;
use cert_status::tls::CertificateSource;
use cert_status::CertificateInfo;
use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

/// A self-signed certificate and its private key.
#[allow(dead_code)] // Used by other test files
pub struct TestCert {
    pub der: CertificateDer<'static>,
    pub key: PrivateKeyDer<'static>,
}

/// Generates a self-signed certificate with the given subject CN and DNS SANs,
/// expiring on 2040-01-01.
#[allow(dead_code)] // Used by other test files
pub fn self_signed_cert(common_name: &str, sans: &[&str]) -> TestCert {
    let key_pair = KeyPair::generate().expect("Failed to generate key pair");
    let mut params = CertificateParams::new(sans.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .expect("Failed to build certificate params");
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;
    params.not_after = rcgen::date_time_ymd(2040, 1, 1);

    let cert = params
        .self_signed(&key_pair)
        .expect("Failed to self-sign certificate");
    TestCert {
        der: cert.der().clone(),
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der())),
    }
}

/// A TLS server on 127.0.0.1 that completes handshakes and hangs up.
#[allow(dead_code)] // Used by other test files
pub struct TestTlsServer {
    pub port: u16,
    handle: JoinHandle<()>,
}

impl Drop for TestTlsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Starts a TLS server presenting `cert` for every connection.
#[allow(dead_code)] // Used by other test files
pub async fn start_tls_server(cert: TestCert) -> TestTlsServer {
    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .expect("Failed to select protocol versions")
    .with_no_client_auth()
    .with_single_cert(vec![cert.der], cert.key)
    .expect("Failed to build server config");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let port = listener.local_addr().expect("local addr").port();

    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                let _ = acceptor.accept(stream).await;
            });
        }
    });

    TestTlsServer { port, handle }
}

/// Starts a TCP server that accepts connections and never speaks TLS.
#[allow(dead_code)] // Used by other test files
pub async fn start_silent_server() -> TestTlsServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind silent server");
    let port = listener.local_addr().expect("local addr").port();

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    TestTlsServer { port, handle }
}

/// Certificate fields as a server would present them.
#[allow(dead_code)] // Used by other test files
pub fn cert_info(subject: &str, sans: &[&str], not_after: DateTime<Utc>) -> CertificateInfo {
    CertificateInfo {
        subject_cn: subject.to_string(),
        issuer_cn: "R11".to_string(),
        not_after: Some(not_after),
        san_list: sans.iter().map(|s| s.to_string()).collect(),
    }
}

/// Certificate expiring `days` after `now`.
#[allow(dead_code)] // Used by other test files
pub fn cert_expiring_in(subject: &str, sans: &[&str], now: DateTime<Utc>, days: i64) -> CertificateInfo {
    cert_info(subject, sans, now + Duration::days(days))
}

/// Certificate source answering from a fixed table; unknown domains are
/// unreachable.
#[allow(dead_code)] // Used by other test files
#[derive(Default)]
pub struct StubSource {
    certs: HashMap<String, CertificateInfo>,
}

#[allow(dead_code)] // Used by other test files
impl StubSource {
    pub fn with(mut self, domain: &str, cert: CertificateInfo) -> Self {
        self.certs.insert(domain.to_string(), cert);
        self
    }
}

impl CertificateSource for StubSource {
    fn fetch<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<CertificateInfo, FetchError>> {
        Box::pin(async move {
            self.certs.get(domain).cloned().ok_or_else(|| FetchError::Connect {
                domain: domain.to_string(),
                port: 443,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "failed to lookup address information",
                ),
            })
        })
    }
}

/// Renew action that records every domain it is invoked with, failing for
/// the domains listed in `fail_for`.
#[allow(dead_code)] // Used by other test files
#[derive(Default)]
pub struct RecordingAction {
    pub invoked: Mutex<Vec<String>>,
    pub fail_for: Vec<String>,
}

impl RenewAction for RecordingAction {
    fn renew<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, Result<(), CommandError>> {
        Box::pin(async move {
            self.invoked
                .lock()
                .expect("recording lock")
                .push(domain.to_string());
            if self.fail_for.iter().any(|d| d == domain) {
                Err(CommandError::ExitStatus {
                    program: "record".to_string(),
                    status: "exit status: 1".to_string(),
                })
            } else {
                Ok(())
            }
        })
    }
}
