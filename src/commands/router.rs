// CommandRouter - Routes CLI arguments to appropriate Command
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::{
    AddCommand, Command, CommandContext, InitConfigCommand, InspectCommand, ListCommand,
    RefreshAllCommand, RefreshCommand, RemoveCommand, WatchCommand,
};
use crate::cli::CliCommand;
use crate::{Args, Result};

/// CommandRouter maps the parsed subcommand to its Command
pub struct CommandRouter;

impl CommandRouter {
    /// Route CLI arguments to the appropriate Command
    ///
    /// # Errors
    /// Returns a TlsError if the configuration file cannot be loaded
    pub fn route(args: Args) -> Result<Box<dyn Command>> {
        // init-config must work before any configuration exists
        if let CliCommand::InitConfig { path } = args.command {
            return Ok(Box::new(InitConfigCommand::new(path)));
        }

        let context = CommandContext::from_args(&args)?;

        let command: Box<dyn Command> = match args.command {
            CliCommand::Add { name } => Box::new(AddCommand::new(context, name)),
            CliCommand::List => Box::new(ListCommand::new(context)),
            CliCommand::Remove { id } => Box::new(RemoveCommand::new(context, id)),
            CliCommand::Refresh { id } => Box::new(RefreshCommand::new(context, id)),
            CliCommand::RefreshAll => Box::new(RefreshAllCommand::new(context)),
            CliCommand::Inspect { host } => Box::new(InspectCommand::new(context, host)),
            CliCommand::Watch => Box::new(WatchCommand::new(context)),
            CliCommand::InitConfig { path } => Box::new(InitConfigCommand::new(path)),
        };

        Ok(command)
    }
}
