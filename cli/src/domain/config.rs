//! Domain types and validators for cfdeploy configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access. Three sources
//! feed a run:
//! - the per-project build config (`buildConfig.json`)
//! - the per-user tool settings (`~/.cfdeploy/settings.yaml`)
//! - environment variables (credentials and overrides)
//!
//! They are resolved once into immutable values. A missing required key fails
//! the run before any network or process call.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Build config schema ──────────────────────────────────────────────────────

/// Project build configuration. Every field is optional at parse time so that
/// absence is reported as a [`ConfigError`] naming the key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    pub project_info: ProjectInfo,
    pub environments: HashMap<String, EnvironmentConfig>,
    pub project_tracking: ProjectTracking,
    #[serde(rename = "servicemanagement")]
    pub service_management: ServiceManagement,
    /// Legacy location of the Jira stanza.
    pub jira: Option<JiraSection>,
    /// Legacy location of the ServiceNow stanza.
    pub servicenow: Option<ServiceNowSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub cf: Option<CfSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CfSection {
    pub api_endpoint: Option<String>,
    pub login_endpoint: Option<String>,
    pub org: Option<String>,
    pub space: Option<String>,
    pub domain: Option<String>,
    pub skip_ssl_validation: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectTracking {
    pub jira: Option<JiraSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JiraSection {
    /// Jira project key; numbers are accepted and stringified.
    pub project_id: Option<serde_json::Value>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceManagement {
    pub servicenow: Option<ServiceNowSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceNowSection {
    pub url: Option<String>,
}

// ── Tool settings schema ─────────────────────────────────────────────────────

/// Per-user settings stored in `~/.cfdeploy/settings.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub cloudfoundry: CloudFoundrySettings,
    pub jira: UrlSetting,
    pub servicenow: UrlSetting,
    /// Upper bound for every HTTP call, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            cloudfoundry: CloudFoundrySettings::default(),
            jira: UrlSetting::default(),
            servicenow: UrlSetting::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudFoundrySettings {
    /// Where to fetch the `cf` CLI tarball when it is not on `PATH`.
    pub cli_download_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlSetting {
    pub url: Option<String>,
}

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// ── Environment ──────────────────────────────────────────────────────────────

/// Environment variables read at startup (see `infra::config::load_env`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvSettings {
    pub deployment_user: Option<String>,
    pub deployment_pwd: Option<String>,
    pub cf_buildpack: Option<String>,
    pub auto_stop: Option<String>,
    pub jira_user: Option<String>,
    pub jira_token: Option<String>,
    pub servicenow_token: Option<String>,
}

// ── Resolved values ──────────────────────────────────────────────────────────

/// Username and password for the deployment platform.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

/// Where a release is deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub org: String,
    pub space: String,
    /// API base URL, always with a scheme.
    pub api_endpoint: String,
    /// UAA base URL, always with a scheme.
    pub login_endpoint: String,
    pub domain: Option<String>,
    pub skip_ssl_validation: bool,
}

/// Everything a deploy, promote or cutover run needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub project: String,
    pub version: String,
    pub env: String,
    pub push_dir: PathBuf,
    pub artifact_ext: Option<String>,
    pub target: DeploymentTarget,
    pub credentials: Credentials,
    pub buildpack: Option<String>,
    /// `AUTO_STOP` was set: leave previously started versions running.
    pub auto_stop_disabled: bool,
}

/// Command-line inputs that complement the build config.
#[derive(Debug, Clone)]
pub struct RunInputs<'a> {
    pub env: &'a str,
    pub version: &'a str,
    pub push_dir: PathBuf,
    pub artifact_ext: Option<&'a str>,
}

/// Jira connection details.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub url: String,
    pub project_key: String,
    pub user: String,
    pub token: String,
}

/// ServiceNow connection details.
#[derive(Debug, Clone)]
pub struct ServiceNowConfig {
    pub url: String,
    pub token: String,
}

// ── Resolution ───────────────────────────────────────────────────────────────

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required_env(
    value: Option<&String>,
    var: &'static str,
    what: &'static str,
) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::MissingEnv { var, what })
}

fn required_key(
    value: Option<&String>,
    section: &'static str,
    key: &str,
) -> Result<String, ConfigError> {
    non_empty(value).ok_or_else(|| ConfigError::MissingKey {
        section,
        key: key.to_string(),
    })
}

/// Prefix `https://` when an endpoint is given as a bare host.
#[must_use]
pub fn with_scheme(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    }
}

/// Derive the UAA endpoint from the API endpoint (`api.` becomes `login.`).
#[must_use]
pub fn derive_login_endpoint(api_endpoint: &str) -> String {
    let with = with_scheme(api_endpoint);
    let (scheme, host) = with.split_once("://").unwrap_or(("https", with.as_str()));
    match host.strip_prefix("api.") {
        Some(rest) => format!("{scheme}://login.{rest}"),
        None => format!("{scheme}://{host}"),
    }
}

impl BuildConfig {
    /// The project name from `projectInfo.name`.
    ///
    /// # Errors
    ///
    /// Returns an error naming `name` if it is missing.
    pub fn project_name(&self) -> Result<String, ConfigError> {
        required_key(self.project_info.name.as_ref(), "cloudfoundry", "name")
    }

    fn jira_section(&self) -> Option<&JiraSection> {
        self.jira.as_ref().or(self.project_tracking.jira.as_ref())
    }

    fn servicenow_section(&self) -> Option<&ServiceNowSection> {
        self.servicenow
            .as_ref()
            .or(self.service_management.servicenow.as_ref())
    }

    /// Resolve the deploy configuration for `inputs.env`.
    ///
    /// Checks run in a fixed order, so the first missing item is the one
    /// reported: credentials, then the project name, then the `cf` block of
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing variable or key.
    pub fn resolve_deploy(
        &self,
        env: &EnvSettings,
        inputs: &RunInputs<'_>,
    ) -> Result<DeployConfig, ConfigError> {
        let user = required_env(env.deployment_user.as_ref(), "DEPLOYMENT_USER", "User Id")?;
        let password = required_env(
            env.deployment_pwd.as_ref(),
            "DEPLOYMENT_PWD",
            "User Password",
        )?;
        let project = self.project_name()?;

        let cf = self
            .environments
            .get(inputs.env)
            .ok_or_else(|| ConfigError::MissingKey {
                section: "environments",
                key: inputs.env.to_string(),
            })?
            .cf
            .as_ref()
            .ok_or_else(|| ConfigError::MissingKey {
                section: "cloudfoundry",
                key: "cf".to_string(),
            })?;

        let org = required_key(cf.org.as_ref(), "cloudfoundry", "org")?;
        let space = required_key(cf.space.as_ref(), "cloudfoundry", "space")?;
        let api = required_key(cf.api_endpoint.as_ref(), "cloudfoundry", "apiEndpoint")?;
        let login_endpoint = non_empty(cf.login_endpoint.as_ref())
            .map_or_else(|| derive_login_endpoint(&api), |l| with_scheme(&l));

        let version = inputs.version.trim();
        if version.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "release",
                key: "version".to_string(),
            });
        }

        Ok(DeployConfig {
            project,
            version: version.to_string(),
            env: inputs.env.to_string(),
            push_dir: inputs.push_dir.clone(),
            artifact_ext: inputs
                .artifact_ext
                .map(|e| e.trim_start_matches('.').to_string()),
            target: DeploymentTarget {
                org,
                space,
                api_endpoint: with_scheme(&api),
                login_endpoint,
                domain: non_empty(cf.domain.as_ref()),
                skip_ssl_validation: cf.skip_ssl_validation.unwrap_or(false),
            },
            credentials: Credentials { user, password },
            buildpack: non_empty(env.cf_buildpack.as_ref()),
            auto_stop_disabled: non_empty(env.auto_stop.as_ref()).is_some(),
        })
    }

    /// Resolve Jira connection details. The build config URL wins over the
    /// settings file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing key or variable.
    pub fn resolve_jira(
        &self,
        settings: &ToolSettings,
        env: &EnvSettings,
    ) -> Result<JiraConfig, ConfigError> {
        let section = self.jira_section().ok_or_else(|| ConfigError::MissingKey {
            section: "projectTracking",
            key: "jira".to_string(),
        })?;
        let project_key = match &section.project_id {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_uppercase(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                return Err(ConfigError::MissingKey {
                    section: "projectTracking",
                    key: "projectId".to_string(),
                });
            }
        };
        let url = non_empty(section.url.as_ref())
            .or_else(|| non_empty(settings.jira.url.as_ref()))
            .ok_or(ConfigError::MissingUrl { service: "jira" })?;
        let user = required_env(env.jira_user.as_ref(), "JIRA_USER", "Jira user")?;
        let token = required_env(env.jira_token.as_ref(), "JIRA_TOKEN", "Jira token")?;
        Ok(JiraConfig {
            url: with_scheme(&url),
            project_key,
            user,
            token,
        })
    }

    /// Resolve ServiceNow connection details.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first missing key or variable.
    pub fn resolve_servicenow(
        &self,
        settings: &ToolSettings,
        env: &EnvSettings,
    ) -> Result<ServiceNowConfig, ConfigError> {
        let url = self
            .servicenow_section()
            .and_then(|s| non_empty(s.url.as_ref()))
            .or_else(|| non_empty(settings.servicenow.url.as_ref()))
            .ok_or(ConfigError::MissingUrl {
                service: "service now",
            })?;
        let token = required_env(
            env.servicenow_token.as_ref(),
            "SERVICENOW_TOKEN",
            "ServiceNow token",
        )?;
        Ok(ServiceNowConfig {
            url: with_scheme(&url),
            token,
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
