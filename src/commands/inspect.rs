// InspectCommand - Fetch and print a certificate without storing it
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{Command, CommandContext};
use crate::Result;
use crate::output::{json, terminal};
use crate::tracker::CertificateSource;
use crate::utils::network::normalize_hostname;
use async_trait::async_trait;
use chrono::Utc;

pub struct InspectCommand {
    context: CommandContext,
    host: String,
}

impl InspectCommand {
    pub fn new(context: CommandContext, host: String) -> Self {
        Self { context, host }
    }
}

#[async_trait]
impl Command for InspectCommand {
    async fn execute(&self) -> Result<()> {
        let host = normalize_hostname(&self.host)?;
        let snapshot = self.context.source()?.fetch(&host).await?;

        let now = Utc::now();
        if self.context.is_json() {
            println!("{}", json::inspection_json(&host, &snapshot, now, true)?);
        } else {
            print!("{}", terminal::render_inspection(&host, &snapshot, now));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "InspectCommand"
    }
}
