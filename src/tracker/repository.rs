// Record Repository - Owns the tracked records and their writes

use crate::Result;
use crate::certificates::decoder::CertificateAttributes;
use crate::db::models::{CertificateRecord, NewCertificateRecord, RecordSnapshot};
use crate::db::traits::RecordStore;
use crate::tracker::source::CertificateSource;
use crate::utils::network::normalize_hostname;
use tokio::sync::Mutex;

/// Add/list/update/remove over a record store, fed by a certificate source
///
/// Writes are serialized by an internal lock that is held only around the
/// store call, never across network I/O.
pub struct RecordRepository<S, R> {
    source: S,
    store: R,
    write_lock: Mutex<()>,
}

impl<S, R> RecordRepository<S, R>
where
    S: CertificateSource,
    R: RecordStore,
{
    pub fn new(source: S, store: R) -> Self {
        Self {
            source,
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Fetch the certificate for `name` and store it as a new record
    ///
    /// Nothing is written unless the fetch fully succeeds.
    pub async fn add(&self, name: &str) -> Result<i64> {
        let name = normalize_hostname(name)?;

        let snapshot = self.source.fetch(&name).await?;
        let record = NewCertificateRecord::new(
            name.clone(),
            RecordSnapshot::from_attributes(&snapshot.attributes, &snapshot.tls_version),
        );

        let id = {
            let _guard = self.write_lock.lock().await;
            self.store.insert_record(&record).await?
        };

        tracing::info!("Added {} as record {} ({})", name, id, snapshot.tls_version);
        Ok(id)
    }

    /// Delete a record; a missing id is a no-op
    pub async fn remove(&self, id: i64) -> Result<()> {
        {
            let _guard = self.write_lock.lock().await;
            self.store.delete_record(id).await?;
        }

        tracing::info!("Removed record {}", id);
        Ok(())
    }

    /// All records in insertion order
    pub async fn list(&self) -> Result<Vec<CertificateRecord>> {
        self.store.select_records().await
    }

    /// Overwrite every mutable field of record `id`; a missing id is a no-op
    pub async fn update(
        &self,
        id: i64,
        attributes: &CertificateAttributes,
        tls_version: &str,
    ) -> Result<()> {
        let snapshot = RecordSnapshot::from_attributes(attributes, tls_version);

        {
            let _guard = self.write_lock.lock().await;
            self.store.update_record(id, &snapshot).await?;
        }

        tracing::info!(
            "Updated record {} (serial {}, {})",
            id,
            snapshot.serial_number,
            tls_version
        );
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Option<CertificateRecord>> {
        self.store.select_record(id).await
    }

    /// Records stored under `name` (normalized the same way as `add`)
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<CertificateRecord>> {
        let name = normalize_hostname(name)?;
        self.store.select_records_by_name(&name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CertwatchDatabase, CertificateRecordRepositoryImpl, DatabaseConfig};
    use crate::error::TlsError;
    use crate::tracker::source::CertificateSnapshot;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CertificateSource for StaticSource {
        async fn fetch(&self, host: &str) -> Result<CertificateSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if host == "down.example.com" {
                return Err(TlsError::Handshake {
                    hostname: host.to_string(),
                    details: "alert received".to_string(),
                });
            }

            Ok(CertificateSnapshot {
                attributes: CertificateAttributes {
                    issuer: "CN=Test CA".to_string(),
                    subject: format!("CN={}", host),
                    not_before: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    not_after: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                    version: 3,
                    serial_number: "01".to_string(),
                    signature_algorithm: "ecdsa-with-SHA256".to_string(),
                    sans: vec![host.to_string()],
                },
                tls_version: "TLSv1.3".to_string(),
            })
        }
    }

    async fn repository() -> RecordRepository<StaticSource, CertificateRecordRepositoryImpl> {
        let db = CertwatchDatabase::new(&DatabaseConfig::in_memory())
            .await
            .unwrap();
        RecordRepository::new(
            StaticSource {
                calls: AtomicUsize::new(0),
            },
            db.record_store(),
        )
    }

    #[tokio::test]
    async fn test_add_normalizes_name() {
        let repo = repository().await;

        let id = repo.add("  Example.COM ").await.unwrap();
        let record = repo.get(id).await.unwrap().unwrap();

        assert_eq!(record.name, "example.com");
        assert_eq!(record.subject, "CN=example.com");
        assert_eq!(repo.find_by_name("EXAMPLE.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected_before_fetch() {
        let repo = repository().await;

        let err = repo.add("   ").await.unwrap_err();

        assert!(matches!(err, TlsError::InvalidInput { .. }));
        assert_eq!(repo.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_writes_nothing() {
        let repo = repository().await;

        let err = repo.add("down.example.com").await.unwrap_err();

        assert!(matches!(err, TlsError::Handshake { .. }));
        assert!(repo.list().await.unwrap().is_empty());
    }
}
