//! Application service: promoting cold routes to production.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{PlatformApi, PlatformCli, ProgressReporter};
use crate::application::services::platform::list_routes;
use crate::application::services::session;
use crate::domain::{DeployConfig, RouteFilter};

/// Swap every cold alias of the project for its hot route and restart the
/// bound applications. With no cold routes nothing is changed.
///
/// # Errors
///
/// Returns an error if any platform call fails.
pub async fn promote(
    api: &impl PlatformApi,
    cli: &impl PlatformCli,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<()> {
    session::open(api, cli, config, reporter).await?;

    let cold = list_routes(cli, &RouteFilter::project(&config.project).cold_only()).await?;
    if cold.is_empty() {
        reporter.warn("no cold routes found; nothing to promote");
        return Ok(());
    }

    for route in &cold {
        for app in &route.apps {
            reporter.step(&format!("promoting {app}..."));
            cli.map_route(&route.hot_binding(app)).await?;
            cli.unmap_route(&route.binding(app)).await?;
            cli.restart(app).await?;
        }
    }

    reporter.success("promotion complete");
    Ok(())
}
