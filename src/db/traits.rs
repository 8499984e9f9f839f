// Database Traits
// Persistence boundary for tracked certificate records

use crate::db::models::{CertificateRecord, NewCertificateRecord, RecordSnapshot};
use async_trait::async_trait;

/// Record store trait
///
/// Every call is durable and visible to later calls once it returns.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record and return the id storage assigned to it
    async fn insert_record(&self, record: &NewCertificateRecord) -> crate::Result<i64>;

    /// Delete a record; a missing id is not an error
    async fn delete_record(&self, id: i64) -> crate::Result<()>;

    /// All records in id order
    async fn select_records(&self) -> crate::Result<Vec<CertificateRecord>>;

    /// Overwrite every mutable field of a record in one statement
    async fn update_record(&self, id: i64, snapshot: &RecordSnapshot) -> crate::Result<()>;

    /// Get record by ID
    async fn select_record(&self, id: i64) -> crate::Result<Option<CertificateRecord>>;

    /// Records with the given domain name, in id order
    async fn select_records_by_name(&self, name: &str) -> crate::Result<Vec<CertificateRecord>>;
}
