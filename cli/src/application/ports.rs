//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{AppInstance, AppRoute, ChangeRequest, RouteBinding, Story};

// ── Value Types ───────────────────────────────────────────────────────────────

/// A space visible to the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub guid: String,
    pub name: String,
}

/// Arguments for `cf login`.
pub struct LoginRequest<'a> {
    pub api_endpoint: &'a str,
    pub user: &'a str,
    pub password: &'a str,
    pub org: &'a str,
    pub space: &'a str,
    pub skip_ssl_validation: bool,
}

/// Arguments for `cf push`.
pub struct PushRequest<'a> {
    /// Application name, `<project>-<version>`.
    pub app: &'a str,
    pub manifest: &'a Path,
    /// Directory or file handed to `-p`.
    pub artifact: &'a Path,
    pub buildpack: Option<&'a str>,
    /// Push without starting; used for blue/green.
    pub no_start: bool,
}

/// Result of looking up one tracker issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLookup {
    Found(Story),
    /// The tracker answered with something other than the issue.
    Rejected { status: u16, body: String },
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned) and
    /// the error must be a `PlatformError::Timeout`.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Platform Ports ────────────────────────────────────────────────────────────

/// Read-only discovery over the platform REST API.
#[allow(async_fn_in_trait)]
pub trait PlatformApi {
    /// Exchange credentials for a bearer token.
    async fn authenticate(&self, user: &str, password: &str) -> Result<String>;
    /// All spaces visible to `token`.
    async fn list_spaces(&self, token: &str) -> Result<Vec<Space>>;
    /// All applications in a space, in any state.
    async fn list_apps(&self, token: &str, space_guid: &str) -> Result<Vec<AppInstance>>;
    /// Routes bound to one application.
    async fn list_app_routes(&self, token: &str, app_guid: &str) -> Result<Vec<AppRoute>>;
}

/// Session and mutating operations through the `cf` executable.
///
/// Every method fails on a non-zero exit or a timeout.
#[allow(async_fn_in_trait)]
pub trait PlatformCli {
    async fn set_api(&self, endpoint: &str, skip_ssl_validation: bool) -> Result<()>;
    async fn auth(&self, user: &str, password: &str) -> Result<()>;
    async fn target(&self, org: &str, space: &str) -> Result<()>;
    async fn login(&self, request: &LoginRequest<'_>) -> Result<()>;
    /// Report the CLI version string.
    async fn version(&self) -> Result<String>;
    async fn push(&self, request: &PushRequest<'_>) -> Result<()>;
    async fn scale(&self, app: &str, instances: u32) -> Result<()>;
    async fn start(&self, app: &str) -> Result<()>;
    async fn stop(&self, app: &str) -> Result<()>;
    async fn restart(&self, app: &str) -> Result<()>;
    /// Delete an application without prompting.
    async fn delete(&self, app: &str) -> Result<()>;
    async fn map_route(&self, route: &RouteBinding) -> Result<()>;
    async fn unmap_route(&self, route: &RouteBinding) -> Result<()>;
    /// Raw `cf routes` listing for the targeted space.
    async fn routes(&self) -> Result<String>;
    /// Whether any `cf` command has run, so a CLI session may exist.
    fn session_started(&self) -> bool;
    async fn logout(&self) -> Result<()>;
}

// ── Tracker Ports ─────────────────────────────────────────────────────────────

/// Issue tracker (Jira) operations.
#[allow(async_fn_in_trait)]
pub trait IssueTracker {
    /// Fetch one issue.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Unreachable` when the tracker cannot be reached.
    /// A reachable tracker that does not return the issue yields
    /// [`IssueLookup::Rejected`].
    async fn issue(&self, id: &str) -> Result<IssueLookup>;
    /// Create a version entity in the configured project.
    async fn create_version(&self, name: &str) -> Result<()>;
    /// Replace the fix-version set of an issue.
    async fn set_fix_versions(&self, id: &str, versions: &[String]) -> Result<()>;
}

/// Change management (ServiceNow) operations.
#[allow(async_fn_in_trait)]
pub trait ChangeManagement {
    /// Create a change request and return its number.
    async fn create_change(&self, request: &ChangeRequest) -> Result<String>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the local file lookups needed to find manifests and artifacts.
#[cfg_attr(test, mockall::automock)]
pub trait LocalFs {
    /// Returns `true` if `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
    /// Regular files directly inside `dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be read.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}
