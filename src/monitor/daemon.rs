// Refresh Daemon - Keeps every tracked record current

use crate::Result;
use crate::db::traits::RecordStore;
use crate::monitor::config::RefreshSettings;
use crate::monitor::scheduler::RefreshScheduler;
use crate::tracker::{CertificateSource, RefreshOrchestrator};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, Semaphore};
use tokio::time::interval;

/// Counts for one pass over the due records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshCycleSummary {
    pub attempted: usize,
    pub refreshed: usize,
    pub failed: usize,
}

/// Main refresh daemon
pub struct RefreshDaemon<S, R> {
    settings: RefreshSettings,
    orchestrator: RefreshOrchestrator<S, R>,
    scheduler: Arc<Mutex<RefreshScheduler>>,
    running: Arc<AtomicBool>,
    refresh_semaphore: Arc<Semaphore>,
}

impl<S, R> RefreshDaemon<S, R>
where
    S: CertificateSource + 'static,
    R: RecordStore + 'static,
{
    /// Create new refresh daemon
    pub fn new(settings: RefreshSettings, orchestrator: RefreshOrchestrator<S, R>) -> Result<Self> {
        settings.validate()?;

        let scheduler =
            RefreshScheduler::new(settings.interval_seconds).with_jitter(settings.jitter_percent);
        let max_concurrent = settings.max_concurrent_refreshes;

        Ok(Self {
            settings,
            orchestrator,
            scheduler: Arc::new(Mutex::new(scheduler)),
            running: Arc::new(AtomicBool::new(false)),
            refresh_semaphore: Arc::new(Semaphore::new(max_concurrent)),
        })
    }

    /// Run until `stop()` is called or SIGINT/SIGTERM arrives
    pub async fn start(&self) -> Result<()> {
        tracing::info!("Starting certwatch refresh daemon");

        self.running.store(true, Ordering::SeqCst);
        self.setup_signal_handlers();

        tracing::info!(
            "Refresh interval {}s (±{}%), max concurrent refreshes: {}",
            self.settings.interval_seconds,
            self.settings.jitter_percent,
            self.settings.max_concurrent_refreshes
        );

        let mut tick_interval = interval(self.settings.tick());

        while self.running.load(Ordering::SeqCst) {
            tick_interval.tick().await;

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            match self.run_cycle().await {
                Ok(summary) if summary.attempted > 0 => {
                    tracing::info!(
                        "Refresh cycle: {} attempted, {} refreshed, {} failed",
                        summary.attempted,
                        summary.refreshed,
                        summary.failed
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Error in refresh cycle: {}", e),
            }
        }

        tracing::info!("Refresh daemon stopped");
        Ok(())
    }

    /// Stop the daemon after the current cycle
    pub fn stop(&self) {
        tracing::info!("Stopping refresh daemon...");
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Refresh every record the scheduler reports as due
    ///
    /// A failed refresh is logged and the record keeps its previous snapshot
    /// until a later cycle succeeds.
    pub async fn run_cycle(&self) -> Result<RefreshCycleSummary> {
        let records = self.orchestrator.repository().list().await?;

        let due: Vec<(i64, String)> = {
            let mut scheduler = self.scheduler.lock().await;
            scheduler.retain_records(&records);
            scheduler
                .due_records(&records)
                .into_iter()
                .map(|r| (r.id, r.name.clone()))
                .collect()
        };

        if due.is_empty() {
            return Ok(RefreshCycleSummary::default());
        }

        tracing::info!("Refreshing {} records", due.len());

        let mut tasks = Vec::with_capacity(due.len());

        for (id, name) in due {
            let orchestrator = self.orchestrator.clone();
            let semaphore = Arc::clone(&self.refresh_semaphore);

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();

                match orchestrator.refresh(id, &name).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("Failed to refresh {} (record {}): {}", name, id, e);
                        false
                    }
                }
            }));
        }

        let mut summary = RefreshCycleSummary {
            attempted: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            match task.await {
                Ok(true) => summary.refreshed += 1,
                Ok(false) => summary.failed += 1,
                Err(e) => {
                    tracing::error!("Refresh task failed: {}", e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Number of records currently stored
    pub async fn record_count(&self) -> Result<usize> {
        Ok(self.orchestrator.repository().list().await?.len())
    }

    /// Make record `id` due on the next cycle
    pub async fn refresh_soon(&self, id: i64) {
        self.scheduler.lock().await.schedule_immediate(id);
    }

    /// Setup signal handlers for graceful shutdown
    fn setup_signal_handlers(&self) {
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(term), Ok(int)) => (term, int),
                        (Err(e), _) | (_, Err(e)) => {
                            tracing::error!("Failed to install signal handlers: {}", e);
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM");
                    }
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT");
                    }
                }

                running.store(false, Ordering::SeqCst);
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to install Ctrl+C handler: {}", e);
                    return;
                }

                tracing::info!("Received Ctrl+C");
                running.store(false, Ordering::SeqCst);
            }
        });
    }

    /// Get daemon statistics
    pub async fn stats(&self) -> DaemonStats {
        let scheduler = self.scheduler.lock().await;

        DaemonStats {
            scheduled_records: scheduler.scheduled_count(),
            available_permits: self.refresh_semaphore.available_permits(),
            running: self.running.load(Ordering::SeqCst),
        }
    }
}

/// Daemon statistics
#[derive(Debug, Clone)]
pub struct DaemonStats {
    pub scheduled_records: usize,
    pub available_permits: usize,
    pub running: bool,
}
