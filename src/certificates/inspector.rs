// TLS Inspector - Fetch the leaf certificate and negotiated protocol from a host

use crate::Result;
use crate::certificates::verifier::MetadataOnlyVerifier;
use crate::error::{ConnectionFailure, TlsError};
use crate::utils::network::{self, DEFAULT_TLS_PORT, Target};
use rustls::ClientConfig;
use rustls_pki_types::{CertificateDer, ServerName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;

/// Timeouts and port used by the inspector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorSettings {
    pub port: u16,
    pub dns_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub handshake_timeout_secs: u64,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_TLS_PORT,
            dns_timeout_secs: 5,
            connect_timeout_secs: 10,
            handshake_timeout_secs: 10,
        }
    }
}

impl InspectorSettings {
    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(TlsError::Config {
                message: "inspector port must be non-zero".to_string(),
            });
        }
        if self.dns_timeout_secs == 0
            || self.connect_timeout_secs == 0
            || self.handshake_timeout_secs == 0
        {
            return Err(TlsError::Config {
                message: "inspector timeouts must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

/// Negotiated TLS protocol version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsVersion {
    Tls12,
    Tls13,
    Other(String),
}

impl TlsVersion {
    fn from_rustls(version: rustls::ProtocolVersion) -> Self {
        match version {
            rustls::ProtocolVersion::TLSv1_3 => TlsVersion::Tls13,
            rustls::ProtocolVersion::TLSv1_2 => TlsVersion::Tls12,
            other => TlsVersion::Other(format!("{:?}", other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TlsVersion::Tls12 => "TLSv1.2",
            TlsVersion::Tls13 => "TLSv1.3",
            TlsVersion::Other(name) => name,
        }
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one successful inspection
#[derive(Debug, Clone)]
pub struct Inspection {
    pub hostname: String,
    pub leaf_certificate: CertificateDer<'static>,
    /// Number of certificates the server sent (leaf included)
    pub chain_length: usize,
    pub negotiated_protocol: TlsVersion,
}

/// Opens TLS connections and reports what the server presents
pub struct CertificateInspector {
    settings: InspectorSettings,
    connector: TlsConnector,
}

impl CertificateInspector {
    /// Create new inspector
    pub fn new(settings: InspectorSettings) -> Result<Self> {
        settings.validate()?;

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let verifier = Arc::new(MetadataOnlyVerifier::new(&provider));

        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| TlsError::Config {
                message: format!("Failed to build TLS client config: {}", e),
            })?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();

        Ok(Self {
            settings,
            connector: TlsConnector::from(Arc::new(config)),
        })
    }

    pub fn settings(&self) -> &InspectorSettings {
        &self.settings
    }

    /// Connect to `host`, complete a handshake and return the peer's leaf
    ///
    /// The TCP stream and TLS session are owned by this future and are closed
    /// when it completes, fails, or is dropped.
    pub async fn inspect(&self, host: &str) -> Result<Inspection> {
        let target = Target::resolve(host, self.settings.port, self.settings.dns_timeout()).await?;
        let server_name = server_name_for(host)?;

        let stream = network::connect_target(&target, self.settings.connect_timeout()).await?;

        tracing::debug!("Starting TLS handshake with {}", target.identifier());

        let handshake = self.connector.connect(server_name, stream);
        let tls_stream = match timeout(self.settings.handshake_timeout(), handshake).await {
            Ok(Ok(tls_stream)) => tls_stream,
            Ok(Err(e)) => return Err(classify_handshake_io_error(&target, e)),
            Err(_) => {
                return Err(TlsError::Handshake {
                    hostname: host.to_string(),
                    details: format!(
                        "handshake timed out after {:?}",
                        self.settings.handshake_timeout()
                    ),
                });
            }
        };

        let (_io, connection) = tls_stream.get_ref();

        let negotiated_protocol = connection
            .protocol_version()
            .map(TlsVersion::from_rustls)
            .ok_or_else(|| TlsError::Handshake {
                hostname: host.to_string(),
                details: "no protocol version negotiated".to_string(),
            })?;

        let (leaf_certificate, chain_length) = leaf_from_peer(host, connection.peer_certificates())?;

        tracing::debug!(
            "{} presented {} certificate(s) over {}",
            target.identifier(),
            chain_length,
            negotiated_protocol
        );

        Ok(Inspection {
            hostname: host.to_string(),
            leaf_certificate,
            chain_length,
            negotiated_protocol,
        })
    }
}

fn server_name_for(host: &str) -> Result<ServerName<'static>> {
    ServerName::try_from(host)
        .map(|name| name.to_owned())
        .map_err(|e| TlsError::Handshake {
            hostname: host.to_string(),
            details: format!("invalid server name: {}", e),
        })
}

/// Resets during the handshake are connection failures; everything else is
/// a negotiation failure.
fn classify_handshake_io_error(target: &Target, err: std::io::Error) -> TlsError {
    match ConnectionFailure::from_io(&err) {
        ConnectionFailure::Reset => TlsError::Connection {
            target: target.identifier(),
            reason: ConnectionFailure::Reset,
            details: err.to_string(),
        },
        _ => TlsError::Handshake {
            hostname: target.hostname.clone(),
            details: err.to_string(),
        },
    }
}

fn leaf_from_peer(
    host: &str,
    peer_certificates: Option<&[CertificateDer<'static>]>,
) -> Result<(CertificateDer<'static>, usize)> {
    match peer_certificates {
        Some(chain) if !chain.is_empty() => Ok((chain[0].clone(), chain.len())),
        _ => Err(TlsError::NoCertificatePresented {
            hostname: host.to_string(),
        }),
    }
}
