// Error types for certwatch
//
// Acquisition failures (DNS, TCP, TLS, decoding) are distinct variants so
// callers can tell which stage of a fetch went wrong. Storage and
// configuration failures share the same enum.

use std::fmt;
use std::io;
use thiserror::Error;

/// Main error type for certwatch operations
#[derive(Debug, Error)]
pub enum TlsError {
    /// DNS resolution failed for the hostname
    #[error("DNS resolution failed for {hostname}: {details}")]
    Resolution { hostname: String, details: String },

    /// TCP connection could not be established or was dropped
    #[error("Connection to {target} failed ({reason}): {details}")]
    Connection {
        target: String,
        reason: ConnectionFailure,
        details: String,
    },

    /// TLS negotiation failed
    #[error("TLS handshake with {hostname} failed: {details}")]
    Handshake { hostname: String, details: String },

    /// Handshake completed but the server presented no certificate
    #[error("No certificate presented by {hostname}")]
    NoCertificatePresented { hostname: String },

    /// Certificate could not be decoded
    #[error("Certificate decode error: {0}")]
    Decode(#[from] CertificateDecodeError),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Invalid input from user or configuration
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Generic I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl TlsError {
    /// True for failures that happened while fetching a certificate
    /// (as opposed to storage or configuration failures).
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            TlsError::Resolution { .. }
                | TlsError::Connection { .. }
                | TlsError::Handshake { .. }
                | TlsError::NoCertificatePresented { .. }
                | TlsError::Decode(_)
        )
    }

    /// Short machine-friendly label for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TlsError::Resolution { .. } => "resolution",
            TlsError::Connection { .. } => "connection",
            TlsError::Handshake { .. } => "handshake",
            TlsError::NoCertificatePresented { .. } => "no-certificate",
            TlsError::Decode(_) => "decode",
            TlsError::Database(_) => "database",
            TlsError::Config { .. } => "config",
            TlsError::InvalidInput { .. } => "invalid-input",
            TlsError::Io { .. } => "io",
        }
    }
}

/// Why a TCP connection attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFailure {
    Refused,
    TimedOut,
    Reset,
    Unreachable,
    Other,
}

impl ConnectionFailure {
    /// Classify an I/O error raised while connecting
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => ConnectionFailure::Refused,
            io::ErrorKind::TimedOut => ConnectionFailure::TimedOut,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => ConnectionFailure::Reset,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                ConnectionFailure::Unreachable
            }
            _ => ConnectionFailure::Other,
        }
    }
}

impl fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionFailure::Refused => write!(f, "refused"),
            ConnectionFailure::TimedOut => write!(f, "timed out"),
            ConnectionFailure::Reset => write!(f, "reset"),
            ConnectionFailure::Unreachable => write!(f, "unreachable"),
            ConnectionFailure::Other => write!(f, "failed"),
        }
    }
}

/// Certificate field that failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateField {
    Certificate,
    Version,
    SerialNumber,
    Issuer,
    Subject,
    NotBefore,
    NotAfter,
    SignatureAlgorithm,
    SubjectAlternativeName,
}

impl fmt::Display for CertificateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CertificateField::Certificate => "certificate",
            CertificateField::Version => "version",
            CertificateField::SerialNumber => "serial number",
            CertificateField::Issuer => "issuer",
            CertificateField::Subject => "subject",
            CertificateField::NotBefore => "not before",
            CertificateField::NotAfter => "not after",
            CertificateField::SignatureAlgorithm => "signature algorithm",
            CertificateField::SubjectAlternativeName => "subject alternative name",
        };
        f.write_str(name)
    }
}

/// Certificate decoding error, naming the field that could not be parsed
#[derive(Debug, Clone, Error)]
#[error("cannot parse {field}: {details}")]
pub struct CertificateDecodeError {
    pub field: CertificateField,
    pub details: String,
}

impl CertificateDecodeError {
    pub fn new(field: CertificateField, details: impl Into<String>) -> Self {
        Self {
            field,
            details: details.into(),
        }
    }
}

impl From<sqlx::Error> for TlsError {
    fn from(err: sqlx::Error) -> Self {
        TlsError::Database(err.to_string())
    }
}

impl From<toml::de::Error> for TlsError {
    fn from(err: toml::de::Error) -> Self {
        TlsError::Config {
            message: format!("Failed to parse TOML config: {}", err),
        }
    }
}

impl From<toml::ser::Error> for TlsError {
    fn from(err: toml::ser::Error) -> Self {
        TlsError::Config {
            message: format!("Failed to serialize config: {}", err),
        }
    }
}

impl From<serde_json::Error> for TlsError {
    fn from(err: serde_json::Error) -> Self {
        TlsError::InvalidInput {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}
