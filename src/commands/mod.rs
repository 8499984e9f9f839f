// Commands module - Command Pattern implementation
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

mod command;
mod context;
mod router;

// Individual command implementations
mod init_config;
mod inspect;
mod records;
mod refresh;
mod watch;

pub use command::Command;
pub use context::{CommandContext, LiveRepository};
pub use router::CommandRouter;

// Re-export individual commands for testing purposes
pub use init_config::InitConfigCommand;
pub use inspect::InspectCommand;
pub use records::{AddCommand, ListCommand, RemoveCommand};
pub use refresh::{RefreshAllCommand, RefreshCommand};
pub use watch::WatchCommand;
