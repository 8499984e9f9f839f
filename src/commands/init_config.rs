// InitConfigCommand - Write an example configuration file
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::config::AppConfig;
use crate::{Result, TlsError};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct InitConfigCommand {
    path: PathBuf,
}

impl InitConfigCommand {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Command for InitConfigCommand {
    async fn execute(&self) -> Result<()> {
        if self.path.exists() {
            return Err(TlsError::InvalidInput {
                message: format!("{} already exists", self.path.display()),
            });
        }

        AppConfig::create_example_config(&self.path)?;
        println!("Example configuration written to {}", self.path.display());

        Ok(())
    }

    fn name(&self) -> &'static str {
        "InitConfigCommand"
    }
}
