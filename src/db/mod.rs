// Database Module
// Storage layer for tracked certificate records

pub mod config;
pub mod connection;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod traits;

// Re-exports
pub use config::{DatabaseConfig, DatabaseType};
pub use connection::DatabasePool;
pub use migrations::{applied_versions, run_migrations};
pub use models::*;
pub use repositories::CertificateRecordRepositoryImpl;
pub use traits::*;

/// Main database struct
pub struct CertwatchDatabase {
    pool: DatabasePool,
}

impl CertwatchDatabase {
    /// Connect and bring the schema up to date
    pub async fn new(config: &DatabaseConfig) -> crate::Result<Self> {
        let pool = DatabasePool::new(config).await?;

        run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Get database pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Record store over this database's pool
    pub fn record_store(&self) -> CertificateRecordRepositoryImpl {
        CertificateRecordRepositoryImpl::new(self.pool.clone())
    }

    /// Close database connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_opens_with_schema() {
        let db = CertwatchDatabase::new(&DatabaseConfig::in_memory())
            .await
            .unwrap();

        let store = db.record_store();
        assert!(store.select_records().await.unwrap().is_empty());

        db.close().await;
    }
}
