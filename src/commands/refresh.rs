// Refresh commands - re-fetch one or all tracked domains now
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{Command, CommandContext};
use crate::output::{json, terminal};
use crate::{Result, TlsError};
use async_trait::async_trait;
use chrono::Utc;
use colored::*;

/// `refresh <id>`
pub struct RefreshCommand {
    context: CommandContext,
    id: i64,
}

impl RefreshCommand {
    pub fn new(context: CommandContext, id: i64) -> Self {
        Self { context, id }
    }
}

#[async_trait]
impl Command for RefreshCommand {
    async fn execute(&self) -> Result<()> {
        let (db, orchestrator) = self.context.open_orchestrator().await?;
        let repository = orchestrator.repository();

        let result = async {
            let record = repository
                .get(self.id)
                .await?
                .ok_or_else(|| TlsError::InvalidInput {
                    message: format!("No record with id {}", self.id),
                })?;

            orchestrator.refresh_record(&record).await?;
            repository.get(self.id).await
        }
        .await;
        db.close().await;

        // Removed concurrently between refresh and re-read
        let Some(record) = result? else {
            return Err(TlsError::InvalidInput {
                message: format!("No record with id {}", self.id),
            });
        };

        let now = Utc::now();
        if self.context.is_json() {
            println!("{}", json::record_json(&record, now, true)?);
        } else {
            println!("{} record {}", "Refreshed".green().bold(), record.id);
            print!("{}", terminal::render_record_details(&record, now));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "RefreshCommand"
    }
}

/// `refresh-all`
pub struct RefreshAllCommand {
    context: CommandContext,
}

impl RefreshAllCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Command for RefreshAllCommand {
    async fn execute(&self) -> Result<()> {
        let (db, orchestrator) = self.context.open_orchestrator().await?;
        let outcomes = orchestrator
            .refresh_all(self.context.config.refresh.max_concurrent_refreshes)
            .await;
        db.close().await;
        let outcomes = outcomes?;

        if self.context.is_json() {
            println!("{}", json::refresh_outcomes_json(&outcomes, true)?);
        } else if outcomes.is_empty() {
            println!("No domains tracked yet");
        } else {
            println!("{}", terminal::render_refresh_outcomes(&outcomes));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "RefreshAllCommand"
    }
}
