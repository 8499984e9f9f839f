// WatchCommand - Certificate refresh daemon
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{Command, CommandContext};
use crate::Result;
use crate::monitor::RefreshDaemon;
use async_trait::async_trait;
use tracing::{info, warn};

/// WatchCommand keeps every tracked record current until interrupted
pub struct WatchCommand {
    context: CommandContext,
}

impl WatchCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Command for WatchCommand {
    async fn execute(&self) -> Result<()> {
        let (db, orchestrator) = self.context.open_orchestrator().await?;

        let daemon = RefreshDaemon::new(self.context.config.refresh.clone(), orchestrator)?;

        match daemon.record_count().await {
            Ok(count) => info!("Watching {} tracked domains (Ctrl+C to stop)", count),
            Err(e) => warn!("Could not count tracked domains: {}", e),
        }

        let result = daemon.start().await;
        db.close().await;
        result
    }

    fn name(&self) -> &'static str {
        "WatchCommand"
    }
}

