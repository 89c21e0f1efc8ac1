//! Application service: platform inquiry helpers.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{PlatformApi, PlatformCli};
use crate::domain::app::belongs_to_project;
use crate::domain::route::{RouteFilter, parse_routes};
use crate::domain::{AppInstance, PlatformError, Route};

/// Find the guid of the space named exactly `space`.
///
/// # Errors
///
/// Returns [`PlatformError::SpaceNotFound`] if no visible space has that name,
/// or the underlying error if the listing fails.
pub async fn resolve_space_guid(api: &impl PlatformApi, token: &str, space: &str) -> Result<String> {
    let spaces = api.list_spaces(token).await?;
    tracing::debug!(count = spaces.len(), "listed spaces");
    spaces
        .into_iter()
        .find(|s| s.name == space)
        .map(|s| s.guid)
        .ok_or_else(|| PlatformError::SpaceNotFound(space.to_string()).into())
}

/// All instances in the space that belong to `project`, in any state.
///
/// # Errors
///
/// Returns an error if the listing fails.
pub async fn list_instances(
    api: &impl PlatformApi,
    token: &str,
    space_guid: &str,
    project: &str,
) -> Result<Vec<AppInstance>> {
    let apps = api.list_apps(token, space_guid).await?;
    Ok(apps
        .into_iter()
        .filter(|app| belongs_to_project(&app.name, project))
        .collect())
}

/// Routes in the targeted space that pass `filter`.
///
/// # Errors
///
/// Returns an error if `cf routes` fails or its output cannot be parsed.
pub async fn list_routes(cli: &impl PlatformCli, filter: &RouteFilter<'_>) -> Result<Vec<Route>> {
    let output = cli.routes().await?;
    let routes = parse_routes(&output).context("failed to parse cf routes output")?;
    let selected = filter.apply(routes);
    tracing::debug!(?filter, count = selected.len(), "selected routes");
    Ok(selected)
}
