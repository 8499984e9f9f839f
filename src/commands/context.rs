// CommandContext - Configuration and wiring shared by every command
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::config::AppConfig;
use crate::db::{CertificateRecordRepositoryImpl, CertwatchDatabase};
use crate::output::OutputFormat;
use crate::tracker::{RecordRepository, RefreshOrchestrator, TlsCertificateSource};
use crate::{Args, Result};
use std::sync::Arc;

/// Repository wired to the live TLS source and the configured database
pub type LiveRepository = RecordRepository<TlsCertificateSource, CertificateRecordRepositoryImpl>;

#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: AppConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: AppConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self::new(
            args.load_config()?,
            OutputFormat::from_json_flag(args.json),
        ))
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Certificate source using the configured inspector settings
    pub fn source(&self) -> Result<TlsCertificateSource> {
        TlsCertificateSource::new(self.config.inspector.clone())
    }

    /// Open the database (running migrations) and build a repository over it
    pub async fn open_repository(&self) -> Result<(CertwatchDatabase, Arc<LiveRepository>)> {
        let db = CertwatchDatabase::new(&self.config.database).await?;
        let repository = Arc::new(RecordRepository::new(self.source()?, db.record_store()));
        Ok((db, repository))
    }

    /// Repository plus an orchestrator sharing it
    pub async fn open_orchestrator(
        &self,
    ) -> Result<(
        CertwatchDatabase,
        RefreshOrchestrator<TlsCertificateSource, CertificateRecordRepositoryImpl>,
    )> {
        let (db, repository) = self.open_repository().await?;
        Ok((db, RefreshOrchestrator::new(repository)))
    }
}
