//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

/// Process exit code for a run that failed because a call did not finish in time.
pub const EXIT_TIMEOUT: u8 = 124;

/// Process exit code for every other fatal condition.
pub const EXIT_FAILURE: u8 = 1;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while resolving configuration, before any external call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No {what}. Did you forget to define environment variable '{var}'?")]
    MissingEnv {
        var: &'static str,
        what: &'static str,
    },

    #[error("The build config associated with {section} is missing key '{key}'")]
    MissingKey { section: &'static str, key: String },

    #[error("No {service} url found in build config or settings file.")]
    MissingUrl { service: &'static str },
}

// ── Platform errors ───────────────────────────────────────────────────────────

/// Failures talking to Cloud Foundry, either through `cf` or the REST API.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Failed calling {command}. Return code of {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("Timed out calling {command} after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} timed out")]
    RequestTimeout { url: String },

    #[error("Unexpected response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Failed to find API token")]
    MissingToken,

    #[error("Failed to find space '{0}'")]
    SpaceNotFound(String),

    #[error("Make sure that your credentials are correct for {0}")]
    CredentialsRejected(String),
}

impl PlatformError {
    /// Returns `true` for the two "did not respond in time" kinds.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::RequestTimeout { .. })
    }
}

// ── Deploy errors ─────────────────────────────────────────────────────────────

/// Preconditions of the deploy workflow that were not met.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(
        "App version {0} already exists and is running. Cannot perform zero-downtime deployment.  To override, set force flag = 'true'"
    )]
    AlreadyRunning(String),

    #[error("Failed to find manifest file {0}.manifest.yml")]
    ManifestNotFound(String),

    #[error("Found more than 1 artifact in {0}")]
    MultipleArtifacts(String),

    #[error("Could not find file of type {ext} in {dir}")]
    ArtifactNotFound { ext: String, dir: String },

    #[error("cf CLI was not found on PATH and no cloudfoundry.cli_download_path is configured")]
    CliMissing,
}

// ── Route table errors ────────────────────────────────────────────────────────

/// Failures parsing the tabular `cf routes` listing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route listing has no header row")]
    MissingHeader,

    #[error("route listing header is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("route listing columns are out of order: '{later}' starts before '{earlier}'")]
    ColumnOrder {
        earlier: &'static str,
        later: &'static str,
    },
}

// ── Tracker errors ────────────────────────────────────────────────────────────

/// Fatal tracker failures. Everything else on the tracker side is a warning.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Request to Jira at {url} could not be completed: {reason}")]
    Unreachable { url: String, reason: String },
}

// ── Exit codes ────────────────────────────────────────────────────────────────

/// Map a fatal error chain to the process exit code.
///
/// Timeouts are reported with [`EXIT_TIMEOUT`] so operators can tell "the
/// platform did not respond" apart from "the platform rejected the operation".
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let timed_out = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<PlatformError>())
        .any(PlatformError::is_timeout);
    if timed_out { EXIT_TIMEOUT } else { EXIT_FAILURE }
}
