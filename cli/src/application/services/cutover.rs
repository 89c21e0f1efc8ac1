//! Application service: retiring versions other than the one being released.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{PlatformApi, PlatformCli, ProgressReporter};
use crate::application::services::session::{self, Session};
use crate::domain::app::is_release;
use crate::domain::{AppInstance, DeployConfig, RouteBinding};

/// Scale every other started version down to one instance, then stop it.
///
/// # Errors
///
/// Returns the first failing `cf scale` or `cf stop`.
pub async fn stop_started(
    cli: &impl PlatformCli,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    started: &[AppInstance],
) -> Result<()> {
    for app in started
        .iter()
        .filter(|app| !is_release(&app.name, &config.project, &config.version))
    {
        reporter.step(&format!("stopping {}...", app.name));
        cli.scale(&app.name, 1).await?;
        cli.stop(&app.name).await?;
        tracing::info!(app = %app.name, "stopped previous version");
    }
    Ok(())
}

/// Unmap and delete every other stopped version.
///
/// Routes are read from the REST API and unmapped from the configured domain.
/// Without a configured domain the unmap is skipped and only the delete runs.
///
/// # Errors
///
/// Returns the first failing lookup, unmap or delete.
pub async fn delete_stopped(
    api: &impl PlatformApi,
    cli: &impl PlatformCli,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    session: &Session,
    stopped: &[AppInstance],
) -> Result<()> {
    for app in stopped
        .iter()
        .filter(|app| !is_release(&app.name, &config.project, &config.version))
    {
        if let Some(domain) = config.target.domain.as_deref() {
            for route in api.list_app_routes(&session.token, &app.guid).await? {
                cli.unmap_route(&RouteBinding {
                    app: app.name.clone(),
                    domain: domain.to_string(),
                    host: route.host,
                    path: route.path,
                })
                .await?;
            }
        } else {
            tracing::warn!(app = %app.name, "no domain configured; skipping route unmap");
        }

        reporter.step(&format!("deleting {}...", app.name));
        cli.delete(&app.name).await?;
        tracing::info!(app = %app.name, "deleted previous version");
    }
    Ok(())
}

/// Decommission every version except the configured one.
///
/// # Errors
///
/// Returns an error if any platform call fails.
pub async fn cutover(
    api: &impl PlatformApi,
    cli: &impl PlatformCli,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
) -> Result<()> {
    let session = session::open(api, cli, config, reporter).await?;
    let inventory = session::inventory(api, &session, config, true, reporter).await?;

    stop_started(cli, reporter, config, &inventory.started).await?;
    delete_stopped(api, cli, reporter, config, &session, &inventory.stopped).await?;

    reporter.success("cutover complete");
    Ok(())
}
