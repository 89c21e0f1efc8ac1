//! Application service: locating the manifest and the artifact to push.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::application::ports::LocalFs;
use crate::domain::{DeployConfig, DeployError};

/// Archive types that are pushed as the whole push directory.
const DIRECTORY_PUSH_EXTENSIONS: [&str; 3] = ["zip", "tar", "tar.gz"];

/// Pick the manifest for `config.env`.
///
/// An explicit override wins. Otherwise the first existing of
/// `<env>.manifest.yml` in the working directory and in the push directory.
///
/// # Errors
///
/// Returns an error if the override does not exist, or
/// [`DeployError::ManifestNotFound`] if neither candidate exists.
pub fn resolve_manifest(
    fs: &impl LocalFs,
    config: &DeployConfig,
    explicit: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !fs.is_file(path) {
            bail!("Manifest file {} does not exist", path.display());
        }
        return Ok(path.to_path_buf());
    }

    let file_name = format!("{}.manifest.yml", config.env);
    let candidates = [PathBuf::from(&file_name), config.push_dir.join(&file_name)];
    candidates
        .into_iter()
        .find(|candidate| fs.is_file(candidate))
        .ok_or_else(|| DeployError::ManifestNotFound(config.env.clone()).into())
}

/// Pick what `cf push -p` receives.
///
/// # Errors
///
/// Returns [`DeployError::ArtifactNotFound`] or [`DeployError::MultipleArtifacts`]
/// when the push directory does not hold exactly one file of the configured type.
pub fn resolve_artifact(fs: &impl LocalFs, config: &DeployConfig) -> Result<PathBuf> {
    let ext = match config.artifact_ext.as_deref() {
        Some(ext) if !DIRECTORY_PUSH_EXTENSIONS.contains(&ext) => ext,
        _ => return Ok(config.push_dir.clone()),
    };

    let suffix = format!(".{ext}");
    let mut matches: Vec<PathBuf> = fs
        .list_files(&config.push_dir)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&suffix))
        })
        .collect();

    let dir = config.push_dir.display().to_string();
    match matches.len() {
        0 => Err(DeployError::ArtifactNotFound {
            ext: ext.to_string(),
            dir,
        }
        .into()),
        1 => Ok(matches.remove(0)),
        _ => Err(DeployError::MultipleArtifacts(dir).into()),
    }
}
