//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Blue/green deployments to Cloud Foundry, with Jira and ServiceNow bookkeeping
#[derive(Parser)]
#[command(
    name = "cfdeploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Push a new version and retire the previous ones
    Deploy(commands::deploy::DeployArgs),

    /// Stop and delete every version except the given one
    Cutover(commands::TargetArgs),

    /// Move cold routes to production and restart the bound apps
    Promote(commands::TargetArgs),

    /// Inspect and tag Jira issues
    #[command(subcommand)]
    Stories(commands::stories::StoriesCommand),

    /// Manage ServiceNow change requests
    #[command(subcommand)]
    ChangeRequest(commands::change_request::ChangeRequestCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let flags = OutputFlags { no_color, quiet };

        if let Command::Version = command {
            commands::version::run(&crate::output::OutputContext::new(no_color, quiet));
            return Ok(());
        }

        let app = AppContext::new(&flags)?;
        match command {
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
            Command::Cutover(target) => commands::cutover::run(&app, &target).await,
            Command::Promote(target) => commands::promote::run(&app, &target).await,
            Command::Stories(cmd) => commands::stories::run(&app, cmd).await,
            Command::ChangeRequest(cmd) => commands::change_request::run(&app, cmd).await,
            Command::Version => Ok(()),
        }
    }
}
