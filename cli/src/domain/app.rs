//! Application instances as seen in a Cloud Foundry space.
//!
//! Pure functions only. Name comparisons are case-insensitive throughout.

use serde::Serialize;

/// Lifecycle state of a pushed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Stopped,
    Started,
}

impl AppState {
    /// Parse the `entity.state` value reported by the platform.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "stopped" => Some(Self::Stopped),
            "started" => Some(Self::Started),
            _ => None,
        }
    }
}

/// One pushed application, named `<project>-<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInstance {
    pub name: String,
    pub guid: String,
    pub state: AppState,
}

/// Build the composite application name for a release.
#[must_use]
pub fn app_name(project: &str, version: &str) -> String {
    format!("{project}-{version}")
}

/// Returns `true` when `name` belongs to `project`, i.e. starts with `<project>-`.
#[must_use]
pub fn belongs_to_project(name: &str, project: &str) -> bool {
    let prefix = format!("{}-", project.to_lowercase());
    name.to_lowercase().starts_with(&prefix)
}

/// Returns `true` when `name` is exactly the `<project>-<version>` application.
#[must_use]
pub fn is_release(name: &str, project: &str, version: &str) -> bool {
    name.eq_ignore_ascii_case(&app_name(project, version))
}

/// Keep only the instances of `project` that are in `state`.
#[must_use]
pub fn select(instances: &[AppInstance], project: &str, state: AppState) -> Vec<AppInstance> {
    instances
        .iter()
        .filter(|app| app.state == state && belongs_to_project(&app.name, project))
        .cloned()
        .collect()
}
