//! Infrastructure implementation of the `PlatformCli` port.
//!
//! `CfCli<R>` routes every `cf` invocation through a `CommandRunner`. Each
//! call logs the command line with secrets masked, logs every output line at
//! `debug`, and turns a non-zero exit into `PlatformError::CommandFailed`.

use std::process::Output;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LoginRequest, PlatformCli, PushRequest};
use crate::domain::{PlatformError, RouteBinding};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, PUSH_TIMEOUT, TokioCommandRunner};

/// Output fragment `cf login` prints when the credentials are wrong.
const CREDENTIALS_REJECTED: &str = "credentials were rejected";

const MASK: &str = "****";

/// Infrastructure adapter that drives the `cf` executable.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct CfCli<R: CommandRunner> {
    runner: R,
    program: String,
    /// Set once any `cf` command has been attempted.
    touched: AtomicBool,
}

impl<R: CommandRunner> CfCli<R> {
    /// Create an adapter that runs `program` (usually `cf` or `./cf`).
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            touched: AtomicBool::new(false),
        }
    }

    /// Run `cf` and return its output whatever the exit status.
    async fn exec(&self, args: &[&str], timeout: Duration) -> Result<Output> {
        let shown = masked_command(&self.program, args);
        tracing::info!(command = %shown, "running");
        self.touched.store(true, Ordering::Relaxed);
        let output = self
            .runner
            .run_with_timeout(&self.program, args, timeout)
            .await?;
        for line in String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
        {
            tracing::debug!(command = %shown, "{line}");
        }
        Ok(output)
    }

    /// Run `cf` and fail on a non-zero exit. Returns stdout.
    async fn checked(&self, args: &[&str], timeout: Duration) -> Result<String> {
        let output = self.exec(args, timeout).await?;
        ensure_success(&self.program, args, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn run(&self, args: &[&str]) -> Result<()> {
        self.checked(args, DEFAULT_CMD_TIMEOUT).await.map(drop)
    }
}

impl CfCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self::new(TokioCommandRunner::default(), program)
    }
}

fn ensure_success(program: &str, args: &[&str], output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(PlatformError::CommandFailed {
        command: masked_command(program, args),
        code: output.status.code().unwrap_or(-1),
    }
    .into())
}

/// Render a command line with the password arguments replaced by `****`.
///
/// Masks the value after `-p` for `login`, and the third argument of `auth`.
#[must_use]
pub fn masked_command(program: &str, args: &[&str]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(program);
    let is_login = args.first() == Some(&"login");
    let is_auth = args.first() == Some(&"auth");
    for (idx, arg) in args.iter().enumerate() {
        let secret = (is_auth && idx == 2) || (is_login && idx > 0 && args[idx - 1] == "-p");
        parts.push(if secret { MASK } else { *arg });
    }
    parts.join(" ")
}

fn route_args<'a>(verb: &'a str, route: &'a RouteBinding) -> Vec<&'a str> {
    let mut args = vec![verb, route.app.as_str(), route.domain.as_str()];
    if let Some(host) = route.host.as_deref() {
        args.extend(["--hostname", host]);
    }
    if let Some(path) = route.path.as_deref() {
        args.extend(["--path", path]);
    }
    args
}

impl<R: CommandRunner> PlatformCli for CfCli<R> {
    async fn set_api(&self, endpoint: &str, skip_ssl_validation: bool) -> Result<()> {
        let mut args = vec!["api", endpoint];
        if skip_ssl_validation {
            args.push("--skip-ssl-validation");
        }
        self.run(&args).await
    }

    async fn auth(&self, user: &str, password: &str) -> Result<()> {
        self.run(&["auth", user, password]).await
    }

    async fn target(&self, org: &str, space: &str) -> Result<()> {
        self.run(&["target", "-o", org, "-s", space]).await
    }

    async fn login(&self, request: &LoginRequest<'_>) -> Result<()> {
        let mut args = vec![
            "login",
            "-a",
            request.api_endpoint,
            "-u",
            request.user,
            "-p",
            request.password,
            "-o",
            request.org,
            "-s",
            request.space,
        ];
        if request.skip_ssl_validation {
            args.push("--skip-ssl-validation");
        }
        let output = self.exec(&args, DEFAULT_CMD_TIMEOUT).await?;
        let rejected = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .any(|line| line.to_lowercase().contains(CREDENTIALS_REJECTED));
        if rejected {
            return Err(PlatformError::CredentialsRejected(request.api_endpoint.to_string()).into());
        }
        ensure_success(&self.program, &args, &output)
    }

    async fn version(&self) -> Result<String> {
        self.checked(&["--version"], DEFAULT_CMD_TIMEOUT).await
    }

    async fn push(&self, request: &PushRequest<'_>) -> Result<()> {
        let artifact = request.artifact.to_string_lossy();
        let manifest = request.manifest.to_string_lossy();
        let mut args = vec!["push", request.app, "-p", &*artifact, "-f", &*manifest];
        if let Some(buildpack) = request.buildpack {
            args.extend(["-b", buildpack]);
        }
        if request.no_start {
            args.push("--no-start");
        }
        self.checked(&args, PUSH_TIMEOUT).await.map(drop)
    }

    async fn scale(&self, app: &str, instances: u32) -> Result<()> {
        let count = instances.to_string();
        self.run(&["scale", app, "-i", count.as_str()]).await
    }

    async fn start(&self, app: &str) -> Result<()> {
        self.run(&["start", app]).await
    }

    async fn stop(&self, app: &str) -> Result<()> {
        self.run(&["stop", app]).await
    }

    async fn restart(&self, app: &str) -> Result<()> {
        self.run(&["restart", app]).await
    }

    async fn delete(&self, app: &str) -> Result<()> {
        self.run(&["delete", app, "-f"]).await
    }

    async fn map_route(&self, route: &RouteBinding) -> Result<()> {
        self.run(&route_args("map-route", route)).await
    }

    async fn unmap_route(&self, route: &RouteBinding) -> Result<()> {
        self.run(&route_args("unmap-route", route)).await
    }

    async fn routes(&self) -> Result<String> {
        self.checked(&["routes"], DEFAULT_CMD_TIMEOUT).await
    }

    fn session_started(&self) -> bool {
        self.touched.load(Ordering::Relaxed)
    }

    async fn logout(&self) -> Result<()> {
        self.run(&["logout"]).await
    }
}
