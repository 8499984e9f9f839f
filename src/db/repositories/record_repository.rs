// Certificate Record Repository Implementation
// Handles database operations for tracked certificate records

use crate::db::connection::DatabasePool;
use crate::db::models::{CertificateRecord, NewCertificateRecord, RecordSnapshot};
use crate::db::traits::RecordStore;
use crate::error::TlsError;
use async_trait::async_trait;
use sqlx::Row;

const RECORD_COLUMNS: &str = "id, name, expiry_date, issuer, subject, issued_date, version, \
                              serial_number, signature_algorithm, sans, tls_version";

pub struct CertificateRecordRepositoryImpl {
    pool: DatabasePool,
}

impl CertificateRecordRepositoryImpl {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for CertificateRecordRepositoryImpl {
    async fn insert_record(&self, record: &NewCertificateRecord) -> crate::Result<i64> {
        let snapshot = &record.snapshot;

        match &self.pool {
            DatabasePool::Postgres(pool) => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO certificate_records (name, expiry_date, issuer, subject, issued_date, version, serial_number, signature_algorithm, sans, tls_version)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    RETURNING id
                    "#,
                )
                .bind(&record.name)
                .bind(snapshot.expiry_date)
                .bind(&snapshot.issuer)
                .bind(&snapshot.subject)
                .bind(snapshot.issued_date)
                .bind(snapshot.version)
                .bind(&snapshot.serial_number)
                .bind(&snapshot.signature_algorithm)
                .bind(&snapshot.sans)
                .bind(&snapshot.tls_version)
                .fetch_one(pool)
                .await
                .map_err(|e| TlsError::Database(format!("Failed to insert record: {}", e)))?;

                Ok(result.get("id"))
            }
            DatabasePool::Sqlite(pool) => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO certificate_records (name, expiry_date, issuer, subject, issued_date, version, serial_number, signature_algorithm, sans, tls_version)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&record.name)
                .bind(snapshot.expiry_date)
                .bind(&snapshot.issuer)
                .bind(&snapshot.subject)
                .bind(snapshot.issued_date)
                .bind(snapshot.version)
                .bind(&snapshot.serial_number)
                .bind(&snapshot.signature_algorithm)
                .bind(&snapshot.sans)
                .bind(&snapshot.tls_version)
                .execute(pool)
                .await
                .map_err(|e| TlsError::Database(format!("Failed to insert record: {}", e)))?;

                Ok(result.last_insert_rowid())
            }
        }
    }

    async fn delete_record(&self, id: i64) -> crate::Result<()> {
        let result = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query("DELETE FROM certificate_records WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await
                    .map(|r| r.rows_affected())
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query("DELETE FROM certificate_records WHERE id = ?")
                    .bind(id)
                    .execute(pool)
                    .await
                    .map(|r| r.rows_affected())
            }
        };

        let affected =
            result.map_err(|e| TlsError::Database(format!("Failed to delete record: {}", e)))?;
        if affected == 0 {
            tracing::debug!("No record with id {} to delete", id);
        }

        Ok(())
    }

    async fn select_records(&self) -> crate::Result<Vec<CertificateRecord>> {
        let query = format!(
            "SELECT {} FROM certificate_records ORDER BY id",
            RECORD_COLUMNS
        );

        let results = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, CertificateRecord>(&query)
                    .fetch_all(pool)
                    .await
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, CertificateRecord>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
        .map_err(|e| TlsError::Database(format!("Failed to fetch records: {}", e)))?;

        Ok(results)
    }

    async fn update_record(&self, id: i64, snapshot: &RecordSnapshot) -> crate::Result<()> {
        let result = match &self.pool {
            DatabasePool::Postgres(pool) => sqlx::query(
                r#"
                    UPDATE certificate_records
                    SET expiry_date = $1, issuer = $2, subject = $3, issued_date = $4, version = $5,
                        serial_number = $6, signature_algorithm = $7, sans = $8, tls_version = $9
                    WHERE id = $10
                    "#,
            )
            .bind(snapshot.expiry_date)
            .bind(&snapshot.issuer)
            .bind(&snapshot.subject)
            .bind(snapshot.issued_date)
            .bind(snapshot.version)
            .bind(&snapshot.serial_number)
            .bind(&snapshot.signature_algorithm)
            .bind(&snapshot.sans)
            .bind(&snapshot.tls_version)
            .bind(id)
            .execute(pool)
            .await
            .map(|r| r.rows_affected()),
            DatabasePool::Sqlite(pool) => sqlx::query(
                r#"
                    UPDATE certificate_records
                    SET expiry_date = ?, issuer = ?, subject = ?, issued_date = ?, version = ?,
                        serial_number = ?, signature_algorithm = ?, sans = ?, tls_version = ?
                    WHERE id = ?
                    "#,
            )
            .bind(snapshot.expiry_date)
            .bind(&snapshot.issuer)
            .bind(&snapshot.subject)
            .bind(snapshot.issued_date)
            .bind(snapshot.version)
            .bind(&snapshot.serial_number)
            .bind(&snapshot.signature_algorithm)
            .bind(&snapshot.sans)
            .bind(&snapshot.tls_version)
            .bind(id)
            .execute(pool)
            .await
            .map(|r| r.rows_affected()),
        };

        let affected =
            result.map_err(|e| TlsError::Database(format!("Failed to update record: {}", e)))?;
        if affected == 0 {
            tracing::debug!("No record with id {} to update", id);
        }

        Ok(())
    }

    async fn select_record(&self, id: i64) -> crate::Result<Option<CertificateRecord>> {
        let result = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, CertificateRecord>(&format!(
                    "SELECT {} FROM certificate_records WHERE id = $1",
                    RECORD_COLUMNS
                ))
                .bind(id)
                .fetch_optional(pool)
                .await
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, CertificateRecord>(&format!(
                    "SELECT {} FROM certificate_records WHERE id = ?",
                    RECORD_COLUMNS
                ))
                .bind(id)
                .fetch_optional(pool)
                .await
            }
        }
        .map_err(|e| TlsError::Database(format!("Failed to fetch record: {}", e)))?;

        Ok(result)
    }

    async fn select_records_by_name(&self, name: &str) -> crate::Result<Vec<CertificateRecord>> {
        let results = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, CertificateRecord>(&format!(
                    "SELECT {} FROM certificate_records WHERE name = $1 ORDER BY id",
                    RECORD_COLUMNS
                ))
                .bind(name)
                .fetch_all(pool)
                .await
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, CertificateRecord>(&format!(
                    "SELECT {} FROM certificate_records WHERE name = ? ORDER BY id",
                    RECORD_COLUMNS
                ))
                .bind(name)
                .fetch_all(pool)
                .await
            }
        }
        .map_err(|e| TlsError::Database(format!("Failed to fetch records by name: {}", e)))?;

        Ok(results)
    }
}
