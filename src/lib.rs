// certwatch - Track TLS certificates for registered domains
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! certwatch keeps a local snapshot of the TLS certificate each tracked
//! domain presents: issuer, subject, validity window, serial number,
//! signature algorithm, subject alternative names and the negotiated
//! protocol version. Snapshots are refreshed on demand or by a daemon.

pub mod certificates;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod monitor;
pub mod output;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use crate::certificates::{CertificateAttributes, CertificateDecoder, CertificateInspector};
pub use crate::cli::Args;
pub use crate::config::AppConfig;
pub use crate::error::TlsError;
pub use crate::output::OutputFormat;
pub use crate::tracker::{RecordRepository, RefreshOrchestrator};

/// Result type for certwatch operations
pub type Result<T> = std::result::Result<T, TlsError>;
