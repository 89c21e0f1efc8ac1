//! Shared test helpers: output constructors, a no-op reporter, and config builders.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use cfdeploy_cli::application::ports::ProgressReporter;
use cfdeploy_cli::domain::DeployConfig;
use cfdeploy_cli::domain::config::{Credentials, DeploymentTarget};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Reporters ────────────────────────────────────────────────────────────────

/// Discards every progress event.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Records warnings so tests can assert on swallowed failures.
#[derive(Default)]
pub struct WarnRecorder {
    pub warnings: Mutex<Vec<String>>,
}

impl WarnRecorder {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("lock").clone()
    }
}

impl ProgressReporter for WarnRecorder {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, message: &str) {
        self.warnings.lock().expect("lock").push(message.to_string());
    }
}

// ── Config builders ──────────────────────────────────────────────────────────

pub const PROJECT: &str = "ci-helloworld";
pub const VERSION: &str = "v2.9.0+1";
pub const DOMAIN: &str = "apps.example.com";

/// A resolved config for `ci-helloworld` version `v2.9.0+1` in space `dev`.
pub fn deploy_config() -> DeployConfig {
    DeployConfig {
        project: PROJECT.to_string(),
        version: VERSION.to_string(),
        env: "unittest".to_string(),
        push_dir: PathBuf::from("fordeployment"),
        artifact_ext: None,
        target: DeploymentTarget {
            org: "ci".to_string(),
            space: "dev".to_string(),
            api_endpoint: "https://api.example.com".to_string(),
            login_endpoint: "https://login.example.com".to_string(),
            domain: Some(DOMAIN.to_string()),
            skip_ssl_validation: false,
        },
        credentials: Credentials {
            user: "deployer".to_string(),
            password: "s3cret".to_string(),
        },
        buildpack: None,
        auto_stop_disabled: false,
    }
}
