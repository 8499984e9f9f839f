// Refresh Orchestrator - Re-fetch a tracked domain and rewrite its record

use crate::Result;
use crate::db::models::CertificateRecord;
use crate::db::traits::RecordStore;
use crate::tracker::repository::RecordRepository;
use crate::tracker::source::CertificateSource;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Outcome of refreshing one record during `refresh_all`
#[derive(Debug)]
pub struct RefreshOutcome {
    pub id: i64,
    pub name: String,
    pub result: Result<()>,
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Stateless refresh driver over a shared repository
pub struct RefreshOrchestrator<S, R> {
    repository: Arc<RecordRepository<S, R>>,
}

impl<S, R> Clone for RefreshOrchestrator<S, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<S, R> RefreshOrchestrator<S, R>
where
    S: CertificateSource,
    R: RecordStore,
{
    pub fn new(repository: Arc<RecordRepository<S, R>>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<RecordRepository<S, R>> {
        &self.repository
    }

    /// Fetch `name` again and overwrite record `id`
    ///
    /// On any failure the stored record is left as it was.
    pub async fn refresh(&self, id: i64, name: &str) -> Result<()> {
        tracing::debug!("Refreshing record {} ({})", id, name);

        let snapshot = self.repository.source().fetch(name).await?;

        self.repository
            .update(id, &snapshot.attributes, &snapshot.tls_version)
            .await
    }

    pub async fn refresh_record(&self, record: &CertificateRecord) -> Result<()> {
        self.refresh(record.id, &record.name).await
    }

    /// Refresh every stored record, at most `max_concurrent` at a time
    ///
    /// Outcomes are returned in record order. Only a failure to list the
    /// records is returned as an error.
    pub async fn refresh_all(&self, max_concurrent: usize) -> Result<Vec<RefreshOutcome>> {
        let records = self.repository.list().await?;

        let outcomes: Vec<RefreshOutcome> = stream::iter(records)
            .map(|record| async move {
                let result = self.refresh(record.id, &record.name).await;
                if let Err(e) = &result {
                    tracing::warn!("Refresh of {} failed: {}", record.name, e);
                }
                RefreshOutcome {
                    id: record.id,
                    name: record.name,
                    result,
                }
            })
            .buffered(max_concurrent.max(1))
            .collect()
            .await;

        let refreshed = outcomes.iter().filter(|o| o.is_success()).count();
        tracing::info!(
            "Refreshed {}/{} records",
            refreshed,
            outcomes.len()
        );

        Ok(outcomes)
    }
}
