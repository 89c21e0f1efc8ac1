//! Command implementations

pub mod change_request;
pub mod cutover;
pub mod deploy;
pub mod promote;
pub mod stories;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::PlatformCli;
use crate::domain::config::RunInputs;
use crate::domain::{BuildConfig, DeployConfig};
use crate::infra::cf_api::CfApiClient;
use crate::infra::cf_cli::CfCli;
use crate::infra::cf_install::ensure_cli;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::load_build_config;

/// Location of the project build config.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the project build config
    #[arg(long = "config", default_value = "buildConfig.json")]
    pub path: PathBuf,
}

impl ConfigArgs {
    /// Read the build config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<BuildConfig> {
        load_build_config(&self.path)
    }
}

/// Arguments shared by the platform commands.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Build environment to deploy to (a key of `environments`)
    #[arg(long, env = "CFDEPLOY_ENV")]
    pub env: String,

    /// Release version; the application is named `<project>-<version>`
    #[arg(long = "version-number", env = "CFDEPLOY_VERSION")]
    pub version_number: Option<String>,

    /// Directory holding the manifest and artifact
    #[arg(long, default_value = "fordeployment")]
    pub push_dir: PathBuf,

    /// Extension of the artifact file to push (e.g. `jar`)
    #[arg(long)]
    pub artifact_ext: Option<String>,
}

impl TargetArgs {
    /// Resolve the immutable deploy configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing variable or key.
    pub fn resolve(&self, app: &AppContext) -> Result<DeployConfig> {
        let build = self.config.load()?;
        let inputs = RunInputs {
            env: &self.env,
            version: self.version_number.as_deref().unwrap_or_default(),
            push_dir: self.push_dir.clone(),
            artifact_ext: self.artifact_ext.as_deref(),
        };
        Ok(build.resolve_deploy(&app.env, &inputs)?)
    }
}

/// Production adapters for one deployment target.
pub struct Platform {
    pub api: CfApiClient,
    pub cli: CfCli<TokioCommandRunner>,
}

impl Platform {
    /// Locate (or download) `cf` and build the REST client.
    ///
    /// # Errors
    ///
    /// Returns an error if `cf` is unavailable or the HTTP client cannot be built.
    pub async fn connect(app: &AppContext, config: &DeployConfig) -> Result<Self> {
        let program = ensure_cli(&app.settings, Path::new(".")).await?;
        Ok(Self {
            api: CfApiClient::new(&config.target, app.http_timeout())?,
            cli: CfCli::with_program(program),
        })
    }
}

/// Best-effort `cf logout` when `result` is a failure and a CLI session may
/// exist. Returns `result` unchanged.
pub async fn logout_on_failure<T>(cli: &impl PlatformCli, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        if !cli.session_started() {
            tracing::error!(error = %format!("{err:#}"), "run failed before any cf call");
            return result;
        }
        tracing::error!(error = %format!("{err:#}"), "run failed; logging out");
        if let Err(logout) = cli.logout().await {
            tracing::warn!(error = %logout, "cf logout failed");
        }
    }
    result
}
