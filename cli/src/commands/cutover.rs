//! Cutover command

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::cutover::cutover;
use crate::commands::{Platform, TargetArgs, logout_on_failure};
use crate::output::reporter::TerminalReporter;

/// Run the cutover command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or any platform call fails.
pub async fn run(app: &AppContext, target: &TargetArgs) -> Result<()> {
    let config = target.resolve(app)?;
    let platform = Platform::connect(app, &config).await?;
    let reporter = TerminalReporter::new(&app.output);

    let result = cutover(&platform.api, &platform.cli, &reporter, &config).await;
    logout_on_failure(&platform.cli, result).await
}
