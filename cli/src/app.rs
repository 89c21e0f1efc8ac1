//! Application context: unified state passed to every command handler.
//!
//! Holds the output context plus the per-user settings and environment that
//! every command resolves its configuration from. Built once in `Cli::run()`.

use std::time::Duration;

use anyhow::Result;

use crate::domain::{EnvSettings, ToolSettings};
use crate::infra::config::{load_env, load_settings};
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Contents of `~/.cfdeploy/settings.yaml`, or defaults.
    pub settings: ToolSettings,
    /// Credentials and switches read from the environment.
    pub env: EnvSettings,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be parsed, or
    /// the environment cannot be read.
    pub fn new(flags: &OutputFlags) -> Result<Self> {
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            settings: load_settings()?,
            env: load_env()?,
        })
    }

    /// Upper bound for every HTTP call.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.http_timeout_secs)
    }
}
