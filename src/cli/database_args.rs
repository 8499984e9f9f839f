// Configuration and storage arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// Where configuration and records live
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Configuration file (TOML format)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides the [database] section)
    #[arg(long = "db", value_name = "FILE", global = true)]
    pub sqlite_path: Option<PathBuf>,
}
