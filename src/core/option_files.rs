// src/core/option_files.rs

//! Reader for the per-build-type option files (`<project>/config/<buildType>.cfg`).
//!
//! The format is line oriented:
//!
//! ```text
//! # comment
//! <common.cfg>          include another file from the same directory, inline
//! OPT = -O2             key/value pair; the value is the rest of the line
//! ```
//!
//! Anything else is ignored. Later assignments of the same key overwrite earlier ones,
//! whether they come from the file itself or from an include.

use crate::constants::MAX_INCLUDE_DEPTH;
use crate::core::config_store::ConfigError;
use crate::core::paths;
use crate::models::BuildType;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref INCLUDE_RE: Regex = Regex::new(r"^<([^<>]+)>$").expect("include regex is valid");
    static ref ASSIGNMENT_RE: Regex =
        Regex::new(r"^([^=\s]+)\s*=\s*(.*)$").expect("assignment regex is valid");
}

/// Insertion-ordered string map. Re-assigning a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<(String, String)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Applies every entry of `other` on top of `self`.
    pub fn extend(&mut self, other: Self) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Reads `config/<buildType>.cfg` under `project_dir`, resolving includes.
///
/// A missing file yields an empty map. An include chain that returns to a file still
/// being read fails with [`ConfigError::IncludeCycle`].
pub fn read_options(project_dir: &Path, build_type: BuildType) -> Result<OptionMap, ConfigError> {
    let reader = OptionFileReader::new(paths::option_files_dir(project_dir));
    reader.read(&paths::option_file_name(build_type))
}

/// Walks one top-level option file and its includes.
#[derive(Debug)]
pub struct OptionFileReader {
    dir: PathBuf,
}

impl OptionFileReader {
    /// Creates a reader resolving file names (top-level and included) against `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Reads `file_name` from the reader's directory.
    pub fn read(&self, file_name: &str) -> Result<OptionMap, ConfigError> {
        let mut stack = Vec::new();
        self.read_file(file_name, &mut stack)
    }

    fn read_file(&self, file_name: &str, stack: &mut Vec<String>) -> Result<OptionMap, ConfigError> {
        if stack.iter().any(|active| active == file_name) {
            let mut chain = stack.clone();
            chain.push(file_name.to_string());
            return Err(ConfigError::IncludeCycle {
                chain: chain.join(" -> "),
            });
        }
        if stack.len() >= MAX_INCLUDE_DEPTH {
            return Err(ConfigError::IncludeDepth {
                depth: MAX_INCLUDE_DEPTH,
                file: file_name.to_string(),
            });
        }

        let path = self.dir.join(file_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if stack.is_empty() {
                    log::debug!("No option file at '{}'", path.display());
                } else {
                    log::warn!(
                        "Option file '{}' included from '{}' does not exist; skipping it.",
                        path.display(),
                        stack.last().map_or("", String::as_str)
                    );
                }
                return Ok(OptionMap::new());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        log::debug!("Reading option file '{}'", path.display());
        stack.push(file_name.to_string());

        let mut options = OptionMap::new();
        for (line_no, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(caps) = INCLUDE_RE.captures(line) {
                let included = caps.get(1).map_or("", |m| m.as_str()).trim();
                options.extend(self.read_file(included, stack)?);
            } else if let Some(caps) = ASSIGNMENT_RE.captures(raw_line.trim_start()) {
                let key = caps.get(1).map_or("", |m| m.as_str());
                let value = caps.get(2).map_or("", |m| m.as_str());
                options.insert(key, value);
            } else {
                log::debug!(
                    "Ignoring unrecognized line {} in '{}': {}",
                    line_no + 1,
                    path.display(),
                    line
                );
            }
        }

        stack.pop();
        Ok(options)
    }
}
