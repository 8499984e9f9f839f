// Inspector Integration Tests
// Handshakes against local TLS, plaintext and closed endpoints

mod common;

use certwatch::certificates::{CertificateDecoder, CertificateInspector, InspectorSettings, TlsVersion};
use certwatch::error::ConnectionFailure;
use certwatch::tracker::{CertificateSource, TlsCertificateSource};
use certwatch::TlsError;
use chrono::{TimeZone, Utc};
use common::*;
use std::time::{Duration, Instant};

fn settings_for(port: u16) -> InspectorSettings {
    InspectorSettings {
        port,
        dns_timeout_secs: 2,
        connect_timeout_secs: 2,
        handshake_timeout_secs: 2,
    }
}

#[tokio::test]
async fn test_inspect_local_tls_server() {
    let issued = example_certificate();
    let expected_leaf = issued.leaf.clone();
    let port = spawn_tls_server(issued).await;

    let inspector = CertificateInspector::new(settings_for(port)).unwrap();
    let inspection = inspector.inspect("127.0.0.1").await.unwrap();

    assert_eq!(inspection.hostname, "127.0.0.1");
    assert_eq!(inspection.leaf_certificate, expected_leaf);
    assert_eq!(inspection.chain_length, 2);
    assert_eq!(inspection.negotiated_protocol, TlsVersion::Tls13);
    assert_eq!(inspection.negotiated_protocol.to_string(), "TLSv1.3");

    let attrs = CertificateDecoder::decode(inspection.leaf_certificate.as_ref()).unwrap();
    assert_eq!(attrs.subject, "CN=example.com");
    assert_eq!(attrs.issuer, "CN=Test CA");
    assert_eq!(attrs.serial_number, "0102AB");
}

#[tokio::test]
async fn test_expired_and_untrusted_certificates_are_still_inspected() {
    // Issued by a private CA and expired since 2025-01-01
    let port = spawn_tls_server(issue_certificate("stale.example", &["stale.example"], &[0x09])).await;

    let inspector = CertificateInspector::new(settings_for(port)).unwrap();
    let inspection = inspector.inspect("127.0.0.1").await.unwrap();
    let attrs = CertificateDecoder::decode(inspection.leaf_certificate.as_ref()).unwrap();

    assert_eq!(attrs.subject, "CN=stale.example");
    assert_eq!(attrs.not_after, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    assert!(attrs.days_until_expiry(Utc::now()) < 0);
}

#[tokio::test]
async fn test_closed_port_is_connection_error() {
    let port = closed_port().await;

    let inspector = CertificateInspector::new(settings_for(port)).unwrap();
    let err = inspector.inspect("127.0.0.1").await.unwrap_err();

    match err {
        TlsError::Connection { reason, .. } => assert_eq!(reason, ConnectionFailure::Refused),
        other => panic!("expected connection error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plaintext_server_is_handshake_error() {
    let port = spawn_plaintext_server().await;

    let inspector = CertificateInspector::new(settings_for(port)).unwrap();
    let err = inspector.inspect("127.0.0.1").await.unwrap_err();

    assert!(matches!(err, TlsError::Handshake { .. }), "got {:?}", err);
    assert!(err.is_acquisition_failure());
}

#[tokio::test]
async fn test_silent_server_hits_handshake_timeout() {
    let port = spawn_silent_server().await;
    let settings = InspectorSettings {
        handshake_timeout_secs: 1,
        ..settings_for(port)
    };

    let inspector = CertificateInspector::new(settings).unwrap();
    let started = Instant::now();
    let err = inspector.inspect("127.0.0.1").await.unwrap_err();
    let elapsed = started.elapsed();

    match err {
        TlsError::Handshake { details, .. } => assert!(details.contains("timed out"), "{}", details),
        other => panic!("expected handshake timeout, got {:?}", other),
    }
    assert!(elapsed >= Duration::from_millis(900), "returned after {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(5), "returned after {:?}", elapsed);
}

#[tokio::test]
async fn test_tls12_only_server() {
    let issued = example_certificate();
    let expected_leaf = issued.leaf.clone();
    let port = spawn_tls12_server(issued).await;

    let inspector = CertificateInspector::new(settings_for(port)).unwrap();
    let inspection = inspector.inspect("127.0.0.1").await.unwrap();

    assert_eq!(inspection.negotiated_protocol, TlsVersion::Tls12);
    assert_eq!(inspection.leaf_certificate, expected_leaf);

    let source = TlsCertificateSource::new(settings_for(port)).unwrap();
    let snapshot = source.fetch("127.0.0.1").await.unwrap();
    assert_eq!(snapshot.tls_version, "TLSv1.2");
    assert_eq!(snapshot.attributes.serial_number, "0102AB");
}

#[tokio::test]
async fn test_unresolvable_host_is_resolution_error() {
    let inspector = CertificateInspector::new(settings_for(443)).unwrap();
    let err = inspector.inspect("does-not-exist.invalid").await.unwrap_err();

    assert!(
        matches!(err, TlsError::Resolution { .. }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_tls_source_yields_decoded_snapshot() {
    let port = spawn_tls_server(example_certificate()).await;

    let source = TlsCertificateSource::new(settings_for(port)).unwrap();
    let snapshot = source.fetch("127.0.0.1").await.unwrap();

    assert_eq!(snapshot.tls_version, "TLSv1.3");
    assert_eq!(snapshot.attributes.subject, "CN=example.com");
    assert_eq!(snapshot.attributes.version, 3);
    assert_eq!(
        snapshot.attributes.sans,
        vec!["example.com".to_string(), "www.example.com".to_string()]
    );
    assert_eq!(
        snapshot.attributes.not_before,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
}
