//! Locating the `cf` executable, downloading it when it is not installed.

use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::domain::{DeployError, ToolSettings};

#[cfg(windows)]
const CF_BINARY: &str = "cf.exe";
#[cfg(not(windows))]
const CF_BINARY: &str = "cf";

/// Find `binary` in the directories of a `PATH`-style value.
#[must_use]
pub fn find_on_path(binary: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

/// Return the program to invoke for `cf`.
///
/// Uses `cf` from `PATH` when present. Otherwise downloads the tarball named by
/// `cloudfoundry.cli_download_path` and unpacks it into `dest`.
///
/// # Errors
///
/// Returns [`DeployError::CliMissing`] if `cf` is not installed and no
/// download location is configured, or the download or unpack error.
pub async fn ensure_cli(settings: &ToolSettings, dest: &Path) -> Result<String> {
    if let Some(found) = find_on_path(CF_BINARY, std::env::var_os("PATH")) {
        tracing::debug!(path = %found.display(), "using cf from PATH");
        return Ok(found.to_string_lossy().into_owned());
    }

    let Some(url) = settings.cloudfoundry.cli_download_path.as_deref() else {
        return Err(DeployError::CliMissing.into());
    };

    tracing::info!(%url, "downloading cf cli");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.http_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    let bytes = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .with_context(|| format!("failed to download cf cli from {url}"))?
        .bytes()
        .await
        .with_context(|| format!("failed to download cf cli from {url}"))?;

    let dest = dest.to_path_buf();
    let program = tokio::task::spawn_blocking(move || unpack(&bytes, &dest))
        .await
        .context("spawn_blocking for cf cli unpack")??;
    Ok(program.to_string_lossy().into_owned())
}

/// Unpack a `.tgz` holding the `cf` binary into `dest` and return its path.
fn unpack(archive: &[u8], dest: &Path) -> Result<PathBuf> {
    tar::Archive::new(GzDecoder::new(Cursor::new(archive)))
        .unpack(dest)
        .with_context(|| format!("cannot unpack cf cli into {}", dest.display()))?;

    let program = dest.join(CF_BINARY);
    if !program.is_file() {
        anyhow::bail!("downloaded archive does not contain {CF_BINARY}");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("cannot set permissions on {}", program.display()))?;
    }
    Ok(program)
}
