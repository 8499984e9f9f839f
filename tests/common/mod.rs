// Shared fixtures for integration tests
//
// Certificates are issued with rcgen at test time and served from local
// tokio-rustls listeners, so no test depends on the public network.

#![allow(dead_code)]

use async_trait::async_trait;
use certwatch::TlsError;
use certwatch::certificates::CertificateAttributes;
use certwatch::db::{CertificateRecordRepositoryImpl, CertwatchDatabase, DatabaseConfig};
use certwatch::error::ConnectionFailure;
use certwatch::tracker::{CertificateSnapshot, CertificateSource, RecordRepository};
use chrono::{TimeZone, Utc};
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, Issuer, KeyPair,
    SerialNumber,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_rustls::TlsAcceptor;

/// Leaf certificate, its issuing CA and the leaf's private key
pub struct IssuedCertificate {
    pub leaf: CertificateDer<'static>,
    pub ca: CertificateDer<'static>,
    pub key: PrivateKeyDer<'static>,
}

/// Issue a CA-signed leaf valid from 2024-01-01 to 2025-01-01
pub fn issue_certificate(subject_cn: &str, sans: &[&str], serial: &[u8]) -> IssuedCertificate {
    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    let mut ca_dn = DistinguishedName::new();
    ca_dn.push(DnType::CommonName, "Test CA");
    ca_params.distinguished_name = ca_dn;
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();
    let issuer = Issuer::new(ca_params, ca_key);

    let names: Vec<String> = sans.iter().map(|s| s.to_string()).collect();
    let mut params = CertificateParams::new(names).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, subject_cn);
    params.distinguished_name = dn;
    params.not_before = rcgen::date_time_ymd(2024, 1, 1);
    params.not_after = rcgen::date_time_ymd(2025, 1, 1);
    params.serial_number = Some(SerialNumber::from(serial.to_vec()));

    let leaf_key = KeyPair::generate().unwrap();
    let leaf = params.signed_by(&leaf_key, &issuer).unwrap();

    IssuedCertificate {
        leaf: leaf.der().clone(),
        ca: ca_cert.der().clone(),
        key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
    }
}

/// The example.com certificate used across scenarios
pub fn example_certificate() -> IssuedCertificate {
    issue_certificate(
        "example.com",
        &["example.com", "www.example.com"],
        &[0x01, 0x02, 0xAB],
    )
}

/// Serve `issued` over TLS 1.3 on an ephemeral localhost port
///
/// Returns the bound port. The listener accepts connections until the
/// test runtime shuts down.
pub async fn spawn_tls_server(issued: IssuedCertificate) -> u16 {
    spawn_tls_server_with_versions(issued, &[&rustls::version::TLS13]).await
}

/// Same as `spawn_tls_server`, but only TLS 1.2 is offered
pub async fn spawn_tls12_server(issued: IssuedCertificate) -> u16 {
    spawn_tls_server_with_versions(issued, &[&rustls::version::TLS12]).await
}

async fn spawn_tls_server_with_versions(
    issued: IssuedCertificate,
    versions: &[&'static rustls::SupportedProtocolVersion],
) -> u16 {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(versions)
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![issued.leaf, issued.ca], issued.key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut buf = [0u8; 64];
                    let _ = tls.read(&mut buf).await;
                }
            });
        }
    });

    port
}

/// Accept TCP connections and answer with plain HTTP instead of TLS
pub async fn spawn_plaintext_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream
                    .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n")
                    .await;
                let _ = stream.flush().await;
                // Drain until the client hangs up so the close is orderly
                while let Ok(n) = stream.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    port
}

/// Accept TCP connections and never send a byte back
pub async fn spawn_silent_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                while let Ok(n) = stream.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    port
}

/// A localhost port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Attributes a fake source hands out for `host`, tagged with `serial`
pub fn attributes_for(host: &str, serial: &str) -> CertificateAttributes {
    CertificateAttributes {
        issuer: "CN=Test CA".to_string(),
        subject: format!("CN={}", host),
        not_before: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        not_after: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        version: 3,
        serial_number: serial.to_string(),
        signature_algorithm: "ecdsa-with-SHA256".to_string(),
        sans: vec![host.to_string(), format!("www.{}", host)],
    }
}

/// What a `FakeSource` answers for one host
#[derive(Clone)]
pub enum FakeResponse {
    Certificate(CertificateSnapshot),
    ConnectTimeout,
    HandshakeFailure,
}

/// Scripted certificate source
///
/// Hosts without a scripted response get a generated certificate with
/// serial "01" over TLSv1.3.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<String, FakeResponse>>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, host: &str, response: FakeResponse) {
        self.responses
            .lock()
            .await
            .insert(host.to_string(), response);
    }

    pub async fn serve(&self, host: &str, serial: &str, tls_version: &str) {
        self.set(
            host,
            FakeResponse::Certificate(CertificateSnapshot {
                attributes: attributes_for(host, serial),
                tls_version: tls_version.to_string(),
            }),
        )
        .await;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CertificateSource for FakeSource {
    async fn fetch(&self, host: &str) -> certwatch::Result<CertificateSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let response = self.responses.lock().await.get(host).cloned();
        match response {
            Some(FakeResponse::Certificate(snapshot)) => Ok(snapshot),
            Some(FakeResponse::ConnectTimeout) => Err(TlsError::Connection {
                target: format!("{}:443", host),
                reason: ConnectionFailure::TimedOut,
                details: "no response after 10s".to_string(),
            }),
            Some(FakeResponse::HandshakeFailure) => Err(TlsError::Handshake {
                hostname: host.to_string(),
                details: "received fatal alert: HandshakeFailure".to_string(),
            }),
            None => Ok(CertificateSnapshot {
                attributes: attributes_for(host, "01"),
                tls_version: "TLSv1.3".to_string(),
            }),
        }
    }
}

pub type FakeRepository = RecordRepository<Arc<FakeSource>, CertificateRecordRepositoryImpl>;

/// Repository over a fresh in-memory database and a shared fake source
pub async fn fake_repository() -> (Arc<FakeSource>, FakeRepository) {
    let db = CertwatchDatabase::new(&DatabaseConfig::in_memory())
        .await
        .unwrap();
    let source = Arc::new(FakeSource::new());
    let repository = RecordRepository::new(Arc::clone(&source), db.record_store());
    (source, repository)
}
