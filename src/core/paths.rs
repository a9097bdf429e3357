// src/core/paths.rs

use crate::constants::{BUILD_DIR_NAME, OPTION_FILE_EXTENSION, OPTION_FILES_DIR, SETTINGS_FILENAME};
use crate::models::{BuildType, Platform};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine the current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("Failed to expand base directory template '{template}': {message}")]
    Expansion { template: String, message: String },
    #[error("Could not create base directory at '{path}': {source}")]
    BaseDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves the root of the managed tree.
///
/// `template` may contain `~` and environment variables (`$VAR`, `${VAR}`). When it is
/// absent the current working directory is used. The directory is created if missing and
/// returned in its simplified canonical form.
pub fn resolve_base_dir(template: Option<&str>) -> Result<PathBuf, PathError> {
    let raw = match template {
        Some(t) => {
            let expanded = shellexpand::full(t).map_err(|e| PathError::Expansion {
                template: t.to_string(),
                message: e.to_string(),
            })?;
            PathBuf::from(expanded.into_owned())
        }
        None => std::env::current_dir().map_err(PathError::CurrentDir)?,
    };

    if !raw.exists() {
        log::debug!("Creating base directory '{}'", raw.display());
        fs::create_dir_all(&raw).map_err(|e| PathError::BaseDirCreation {
            path: raw.display().to_string(),
            source: e,
        })?;
    }

    // Canonicalization only fails for paths that vanished after creation; keep the raw path then.
    Ok(dunce::canonicalize(&raw).unwrap_or(raw))
}

/// `<baseDir>/settings.json`
pub fn settings_path(base_dir: &Path) -> PathBuf {
    base_dir.join(SETTINGS_FILENAME)
}

/// `<baseDir>/<projectName>`
pub fn project_dir(base_dir: &Path, project_name: &str) -> PathBuf {
    base_dir.join(project_name)
}

/// `<projectDir>/build/<platform>/<buildType>`. Distinct `(platform, buildType)` pairs
/// never share a directory.
pub fn build_dir(project_dir: &Path, platform: Platform, build_type: BuildType) -> PathBuf {
    project_dir
        .join(BUILD_DIR_NAME)
        .join(platform.as_str())
        .join(build_type.as_str())
}

/// `<projectDir>/config`
pub fn option_files_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(OPTION_FILES_DIR)
}

/// `config/<buildType>.cfg`, relative to the option files directory.
pub fn option_file_name(build_type: BuildType) -> String {
    format!("{}.{}", build_type.as_str(), OPTION_FILE_EXTENSION)
}

/// Renders a path for display and for embedding into command lines.
pub fn display_path(path: &Path) -> String {
    dunce::simplified(path).to_string_lossy().into_owned()
}
