// Record commands - add, list and remove tracked domains
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{Command, CommandContext};
use crate::output::{json, terminal};
use crate::{Result, TlsError};
use async_trait::async_trait;
use chrono::Utc;
use colored::*;
use tracing::info;

/// `add <name>`: fetch and start tracking a domain
pub struct AddCommand {
    context: CommandContext,
    name: String,
}

impl AddCommand {
    pub fn new(context: CommandContext, name: String) -> Self {
        Self { context, name }
    }
}

#[async_trait]
impl Command for AddCommand {
    async fn execute(&self) -> Result<()> {
        let (db, repository) = self.context.open_repository().await?;

        let existing = repository.find_by_name(&self.name).await?;
        if let Some(record) = existing.first() {
            db.close().await;
            return Err(TlsError::InvalidInput {
                message: format!(
                    "{} is already tracked as record {}",
                    record.name, record.id
                ),
            });
        }

        info!("Fetching certificate for {}", self.name);
        let result = repository.add(&self.name).await;

        let output = match result {
            Ok(id) => repository.get(id).await,
            Err(e) => Err(e),
        };
        db.close().await;

        let Some(record) = output? else {
            return Err(TlsError::Database(
                "record vanished right after insert".to_string(),
            ));
        };

        let now = Utc::now();
        if self.context.is_json() {
            println!("{}", json::record_json(&record, now, true)?);
        } else {
            println!(
                "{} {} as record {}",
                "Added".green().bold(),
                record.name,
                record.id
            );
            print!("{}", terminal::render_record_details(&record, now));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "AddCommand"
    }
}

/// `list`: show every tracked domain
pub struct ListCommand {
    context: CommandContext,
}

impl ListCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self) -> Result<()> {
        let (db, repository) = self.context.open_repository().await?;
        let records = repository.list().await;
        db.close().await;
        let records = records?;

        let now = Utc::now();
        if self.context.is_json() {
            println!("{}", json::records_json(&records, now, true)?);
        } else {
            println!("{}", terminal::render_record_table(&records, now));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ListCommand"
    }
}

/// `remove <id>`: stop tracking a record
pub struct RemoveCommand {
    context: CommandContext,
    id: i64,
}

impl RemoveCommand {
    pub fn new(context: CommandContext, id: i64) -> Self {
        Self { context, id }
    }
}

#[async_trait]
impl Command for RemoveCommand {
    async fn execute(&self) -> Result<()> {
        let (db, repository) = self.context.open_repository().await?;

        let result = async {
            let existing = repository.get(self.id).await?;
            repository.remove(self.id).await?;
            Ok::<_, TlsError>(existing)
        }
        .await;
        db.close().await;
        let existing = result?;

        if self.context.is_json() {
            println!(
                "{}",
                serde_json::json!({ "id": self.id, "removed": existing.is_some() })
            );
        } else {
            match existing {
                Some(record) => println!(
                    "{} record {} ({})",
                    "Removed".green().bold(),
                    record.id,
                    record.name
                ),
                None => println!("No record with id {}", self.id),
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "RemoveCommand"
    }
}
