//! Application service: opening a platform session and taking inventory.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::Result;

use crate::application::ports::{LoginRequest, PlatformApi, PlatformCli, ProgressReporter};
use crate::application::services::platform::{list_instances, resolve_space_guid};
use crate::domain::app::{AppState, app_name, is_release, select};
use crate::domain::{AppInstance, DeployConfig, DeployError};

/// Request-scoped platform session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub space_guid: String,
}

/// Instances of the project split by state, taken once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub stopped: Vec<AppInstance>,
    pub started: Vec<AppInstance>,
}

/// Authenticate against the REST API, resolve the space, then log the `cf`
/// CLI in to the same target.
///
/// # Errors
///
/// Returns an error if any authentication, lookup or CLI step fails.
pub async fn open(
    api: &impl PlatformApi,
    cli: &impl PlatformCli,
    config: &DeployConfig,
    reporter: &impl ProgressReporter,
) -> Result<Session> {
    let target = &config.target;
    let creds = &config.credentials;

    reporter.step("authenticating...");
    let token = api.authenticate(&creds.user, &creds.password).await?;
    let space_guid = resolve_space_guid(api, &token, &target.space).await?;
    tracing::info!(space = %target.space, %space_guid, "resolved space");

    reporter.step(&format!("logging in to {}...", target.api_endpoint));
    cli.set_api(&target.api_endpoint, target.skip_ssl_validation)
        .await?;
    cli.auth(&creds.user, &creds.password).await?;
    cli.target(&target.org, &target.space).await?;
    cli.login(&LoginRequest {
        api_endpoint: &target.api_endpoint,
        user: &creds.user,
        password: &creds.password,
        org: &target.org,
        space: &target.space,
        skip_ssl_validation: target.skip_ssl_validation,
    })
    .await?;

    let version = cli.version().await?;
    tracing::info!(cf_version = %version.trim(), "cf cli ready");

    Ok(Session { token, space_guid })
}

/// List the project's instances and split them into stopped and started.
///
/// With `force == false`, a started instance named after the release being
/// deployed aborts the run. With `force == true` it only warns, and the
/// instance stays in the started set.
///
/// # Errors
///
/// Returns [`DeployError::AlreadyRunning`] as described above, or the listing error.
pub async fn inventory(
    api: &impl PlatformApi,
    session: &Session,
    config: &DeployConfig,
    force: bool,
    reporter: &impl ProgressReporter,
) -> Result<Inventory> {
    let instances = list_instances(api, &session.token, &session.space_guid, &config.project).await?;
    let inventory = Inventory {
        stopped: select(&instances, &config.project, AppState::Stopped),
        started: select(&instances, &config.project, AppState::Started),
    };
    tracing::info!(
        stopped = inventory.stopped.len(),
        started = inventory.started.len(),
        "took inventory"
    );

    let running = inventory
        .started
        .iter()
        .find(|app| is_release(&app.name, &config.project, &config.version));
    if let Some(app) = running {
        if !force {
            return Err(DeployError::AlreadyRunning(app.name.clone()).into());
        }
        reporter.warn(&format!(
            "{} is already running; forced deployment will cause downtime",
            app_name(&config.project, &config.version)
        ));
    }

    Ok(inventory)
}
