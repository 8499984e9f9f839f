// Certificate Record Model
// One row per tracked domain, holding the latest certificate snapshot

use crate::certificates::decoder::{CertificateAttributes, format_expiry_countdown, split_sans};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Certificate record in database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CertificateRecord {
    pub id: i64,
    pub name: String,
    pub expiry_date: DateTime<Utc>,
    pub issuer: String,
    pub subject: String,
    pub issued_date: DateTime<Utc>,
    pub version: i32,
    pub serial_number: String,
    pub signature_algorithm: String,
    /// SAN entries joined with `", "`
    pub sans: String,
    pub tls_version: String,
}

impl CertificateRecord {
    /// SAN entries in the order the certificate listed them
    pub fn san_list(&self) -> Vec<String> {
        split_sans(&self.sans)
    }

    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expiry_date - now).num_days()
    }

    pub fn expiry_countdown(&self, now: DateTime<Utc>) -> String {
        format_expiry_countdown(self.expiry_date, now)
    }

    /// Mutable part of the record
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            expiry_date: self.expiry_date,
            issued_date: self.issued_date,
            issuer: self.issuer.clone(),
            subject: self.subject.clone(),
            version: self.version,
            serial_number: self.serial_number.clone(),
            signature_algorithm: self.signature_algorithm.clone(),
            sans: self.sans.clone(),
            tls_version: self.tls_version.clone(),
        }
    }
}

/// Every field an update overwrites (all but `id` and `name`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub expiry_date: DateTime<Utc>,
    pub issued_date: DateTime<Utc>,
    pub issuer: String,
    pub subject: String,
    pub version: i32,
    pub serial_number: String,
    pub signature_algorithm: String,
    pub sans: String,
    pub tls_version: String,
}

impl RecordSnapshot {
    /// Build a snapshot from decoded attributes and the negotiated protocol
    pub fn from_attributes(attributes: &CertificateAttributes, tls_version: &str) -> Self {
        Self {
            expiry_date: attributes.not_after,
            issued_date: attributes.not_before,
            issuer: attributes.issuer.clone(),
            subject: attributes.subject.clone(),
            version: attributes.version,
            serial_number: attributes.serial_number.clone(),
            signature_algorithm: attributes.signature_algorithm.clone(),
            sans: attributes.joined_sans(),
            tls_version: tls_version.to_string(),
        }
    }
}

/// Record about to be inserted; storage assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCertificateRecord {
    pub name: String,
    pub snapshot: RecordSnapshot,
}

impl NewCertificateRecord {
    pub fn new(name: impl Into<String>, snapshot: RecordSnapshot) -> Self {
        Self {
            name: name.into(),
            snapshot,
        }
    }
}
