//! Deploy command

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::deploy::{DeployOptions, deploy};
use crate::commands::{Platform, TargetArgs, logout_on_failure};
use crate::infra::fs::LocalFs;
use crate::output::reporter::TerminalReporter;

/// Arguments for the deploy command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Deploy even if this version is already running (causes downtime)
    #[arg(long)]
    pub force: bool,

    /// Manifest to push with, instead of `<env>.manifest.yml`
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Push without starting and expose the new version on cold routes only
    #[arg(long)]
    pub blue_green: bool,
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or any deploy step fails.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<()> {
    let config = args.target.resolve(app)?;
    let platform = Platform::connect(app, &config).await?;
    let reporter = TerminalReporter::new(&app.output);
    let opts = DeployOptions {
        force: args.force,
        blue_green: args.blue_green,
        manifest: args.manifest,
    };

    let result = deploy(
        &platform.api,
        &platform.cli,
        &LocalFs,
        &reporter,
        &config,
        &opts,
    )
    .await;
    logout_on_failure(&platform.cli, result).await
}
