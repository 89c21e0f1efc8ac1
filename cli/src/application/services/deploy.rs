//! Application service: pushing a release, optionally blue/green.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{LocalFs, PlatformApi, PlatformCli, ProgressReporter, PushRequest};
use crate::application::services::cutover::{delete_stopped, stop_started};
use crate::application::services::manifest::{resolve_artifact, resolve_manifest};
use crate::application::services::platform::list_routes;
use crate::application::services::session;
use crate::domain::app::app_name;
use crate::domain::{DeployConfig, RouteFilter};

/// Switches for one deploy run.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Deploy even if the release is already running.
    pub force: bool,
    /// Push without starting and park the new version behind cold routes.
    pub blue_green: bool,
    /// Use this manifest instead of the conventional ones.
    pub manifest: Option<PathBuf>,
}

/// Deploy `config.version` of `config.project`.
///
/// # Errors
///
/// Returns an error if any precondition or platform call fails. Nothing after
/// the failing step runs.
pub async fn deploy(
    api: &impl PlatformApi,
    cli: &impl PlatformCli,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    config: &DeployConfig,
    opts: &DeployOptions,
) -> Result<()> {
    let session = session::open(api, cli, config, reporter).await?;
    let inventory = session::inventory(api, &session, config, opts.force, reporter).await?;

    let manifest = resolve_manifest(fs, config, opts.manifest.as_deref())?;
    let artifact = resolve_artifact(fs, config)?;
    let app = app_name(&config.project, &config.version);
    tracing::info!(%app, manifest = %manifest.display(), artifact = %artifact.display(), "resolved push inputs");

    if opts.blue_green {
        let cold = list_routes(cli, &RouteFilter::project(&config.project).cold_only()).await?;
        for route in &cold {
            for bound in &route.apps {
                cli.unmap_route(&route.binding(bound)).await?;
            }
        }
    }

    reporter.step(&format!("pushing {app}..."));
    cli.push(&PushRequest {
        app: &app,
        manifest: &manifest,
        artifact: &artifact,
        buildpack: config.buildpack.as_deref(),
        no_start: opts.blue_green,
    })
    .await?;

    if opts.blue_green {
        let filter = RouteFilter::project(&config.project).version(&config.version);
        let hot: Vec<_> = list_routes(cli, &filter)
            .await?
            .into_iter()
            .filter(|route| !route.is_cold())
            .collect();
        for route in &hot {
            cli.map_route(&route.cold_binding(&app)).await?;
            cli.unmap_route(&route.binding(&app)).await?;
        }
        reporter.step(&format!("starting {app}..."));
        cli.start(&app).await?;
    }

    if !opts.blue_green && !config.auto_stop_disabled {
        stop_started(cli, reporter, config, &inventory.started).await?;
    }

    if !opts.blue_green && !opts.force {
        delete_stopped(api, cli, reporter, config, &session, &inventory.stopped).await?;
    }

    reporter.success("DEPLOYMENT SUCCESSFUL");
    Ok(())
}
