// Output module - Terminal and JSON rendering of records and inspections

pub mod json;
pub mod terminal;

use crate::db::models::CertificateRecord;
use crate::tracker::CertificateSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        }
    }
}

/// Stored record plus values derived at display time
#[derive(Debug, Clone, Serialize)]
pub struct RecordView<'a> {
    #[serde(flatten)]
    pub record: &'a CertificateRecord,
    pub san_list: Vec<String>,
    pub days_until_expiry: i64,
    pub expiry_countdown: String,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a CertificateRecord, now: DateTime<Utc>) -> Self {
        Self {
            record,
            san_list: record.san_list(),
            days_until_expiry: record.days_until_expiry(now),
            expiry_countdown: record.expiry_countdown(now),
        }
    }
}

/// Result of `inspect`, never persisted
#[derive(Debug, Clone, Serialize)]
pub struct InspectionView<'a> {
    pub hostname: &'a str,
    #[serde(flatten)]
    pub snapshot: &'a CertificateSnapshot,
    pub days_until_expiry: i64,
    pub expiry_countdown: String,
}

impl<'a> InspectionView<'a> {
    pub fn new(hostname: &'a str, snapshot: &'a CertificateSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            hostname,
            snapshot,
            days_until_expiry: snapshot.attributes.days_until_expiry(now),
            expiry_countdown: snapshot.attributes.expiry_countdown(now),
        }
    }
}
