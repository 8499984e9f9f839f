// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::config::AppConfig;
use crate::db::DatabaseConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod database_args;

pub use database_args::DatabaseArgs;

/// certwatch - Track TLS certificates for registered domains
#[derive(Parser, Debug, Clone)]
#[command(author, version, long_about = None)]
#[command(name = "certwatch")]
#[command(about = "Track TLS certificates for registered domains", long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the TLS port from the configuration
    #[arg(short = 'p', long = "port", value_name = "PORT", global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Fetch a domain's certificate and start tracking it
    Add {
        /// Domain name
        name: String,
    },

    /// List tracked domains
    List,

    /// Stop tracking a record
    Remove {
        /// Record id (see `list`)
        id: i64,
    },

    /// Re-fetch one record now
    Refresh {
        /// Record id (see `list`)
        id: i64,
    },

    /// Re-fetch every record now
    RefreshAll,

    /// Fetch and print a certificate without storing it
    Inspect {
        /// Host name or IP address
        host: String,
    },

    /// Run the refresh daemon until interrupted
    Watch,

    /// Write an example configuration file
    InitConfig {
        /// Destination path
        #[arg(default_value = "certwatch.toml")]
        path: PathBuf,
    },
}

impl Args {
    /// Configuration from `--config` (or defaults) with command-line overrides applied
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.database.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(path) = &self.database.sqlite_path {
            config.database = DatabaseConfig::sqlite(path.clone());
        }

        if let Some(port) = self.port {
            config.inspector.port = port;
        }

        Ok(config)
    }
}
