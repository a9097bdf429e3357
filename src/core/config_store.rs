// src/core/config_store.rs

//! # Config Store
//!
//! Loads the settings document (`<baseDir>/settings.json`), writing a default one first
//! when it does not exist yet.
//!
//! Loading happens in two steps. The JSON is first deserialized into permissive
//! *document* structs where every field is optional and enums are plain strings; only
//! structurally malformed JSON fails here ([`ConfigError::Parse`]). The document is then
//! validated into the typed [`Settings`] model, filling documented defaults for absent
//! fields and collecting *every* invalid field into a single [`ConfigError::Validation`].

use crate::constants::{RUN_EXECUTABLE, TEST_EXECUTABLE};
use crate::core::context::CONTEXT_VARIABLES;
use crate::core::{interpolator, paths};
use crate::models::{
    BuildConfig, BuildType, BuildTypeConfig, ExecutableConfig, OsBuildConfig, Project,
    ProjectLanguage, ProjectType, Settings, default_path_template,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Filesystem error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed settings document '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Invalid settings document '{path}':\n{}", render_issues(.issues))]
    Validation {
        path: String,
        issues: Vec<ValidationIssue>,
    },
    #[error("Circular include detected in option files: {chain}")]
    IncludeCycle { chain: String },
    #[error("Option file includes nested deeper than {depth} levels at '{file}'")]
    IncludeDepth { depth: usize, file: String },
}

/// One invalid or missing field found while validating the settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON-path-like location, e.g. `projects[1].language`.
    pub location: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

type ConfigResult<T> = Result<T, ConfigError>;

// --- PUBLIC API ---

/// Loads the settings of the tree rooted at `base_dir`, creating a default
/// `settings.json` first if there is none.
pub fn load_settings(base_dir: &Path) -> ConfigResult<Settings> {
    let path = ensure_settings_file(base_dir)?;
    let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let settings = parse_settings(&content, &path.display().to_string())?;
    log::debug!(
        "Loaded {} project(s) from '{}'",
        settings.projects.len(),
        path.display()
    );
    Ok(settings)
}

/// Writes a default settings document if `base_dir` has none. Returns its path either way.
pub fn ensure_settings_file(base_dir: &Path) -> ConfigResult<PathBuf> {
    let path = paths::settings_path(base_dir);
    if path.exists() {
        return Ok(path);
    }

    log::info!("No settings found. Creating default '{}'", path.display());
    fs::create_dir_all(base_dir).map_err(|e| ConfigError::Io {
        path: base_dir.display().to_string(),
        source: e,
    })?;
    fs::write(&path, to_document_string(&Settings::default())?).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(path)
}

/// Serializes settings in their canonical on-disk form (four-space indentation).
pub fn to_document_string(settings: &Settings) -> ConfigResult<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    settings
        .serialize(&mut serializer)
        .map_err(ConfigError::Serialize)?;
    buffer.push(b'\n');
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Parses and validates a settings document. `origin` names the document in errors.
pub fn parse_settings(content: &str, origin: &str) -> ConfigResult<Settings> {
    let document: SettingsDocument =
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            source: e,
        })?;

    let mut validator = Validator::default();
    let settings = validator.settings(document);

    if validator.issues.is_empty() {
        Ok(settings)
    } else {
        Err(ConfigError::Validation {
            path: origin.to_string(),
            issues: validator.issues,
        })
    }
}

// --- DOCUMENT MODELS (what is read from `settings.json`) ---

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct SettingsDocument {
    config: Option<BuildConfigDocument>,
    projects: Option<Vec<ProjectDocument>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct BuildConfigDocument {
    windows: Option<OsBuildConfigDocument>,
    linux: Option<OsBuildConfigDocument>,
    #[serde(rename = "neededCommands")]
    needed_commands: Option<Vec<String>>,
    #[serde(rename = "buildTypesConfig")]
    build_types_config: Option<BTreeMap<String, BuildTypeConfigDocument>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct OsBuildConfigDocument {
    cmake_tool: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct BuildTypeConfigDocument {
    options: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ProjectDocument {
    name: Option<String>,
    language: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    executables: Option<Vec<ExecutableDocument>>,
    #[serde(rename = "buildTypesConfig")]
    build_types_config: Option<BTreeMap<String, BuildTypeConfigDocument>>,
    // Legacy flat schema.
    #[serde(rename = "runTarget")]
    run_target: Option<String>,
    #[serde(rename = "testTarget")]
    test_target: Option<String>,
    #[serde(rename = "exampleTargets")]
    example_targets: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ExecutableDocument {
    name: Option<String>,
    target: Option<String>,
    #[serde(rename = "windowsPath")]
    windows_path: Option<String>,
    #[serde(rename = "linuxPath")]
    linux_path: Option<String>,
}

// --- VALIDATION ---

#[derive(Debug, Default)]
struct Validator {
    issues: Vec<ValidationIssue>,
}

impl Validator {
    fn issue(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            location: location.into(),
            message: message.into(),
        });
    }

    fn settings(&mut self, document: SettingsDocument) -> Settings {
        let config = match document.config {
            Some(doc) => self.build_config(doc),
            None => BuildConfig::default(),
        };

        let mut projects = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();
        for (i, doc) in document.projects.unwrap_or_default().into_iter().enumerate() {
            let location = format!("projects[{}]", i);
            if let Some(name) = doc.name.as_deref().map(str::trim) {
                if !seen_names.insert(name.to_string()) {
                    self.issue(
                        format!("{}.name", location),
                        format!("duplicate project name '{}'", name),
                    );
                }
            }
            if let Some(project) = self.project(doc, &location) {
                projects.push(project);
            }
        }

        Settings { config, projects }
    }

    fn build_config(&mut self, doc: BuildConfigDocument) -> BuildConfig {
        let defaults = BuildConfig::default();

        let windows = doc
            .windows
            .and_then(|os| os.cmake_tool)
            .map(|cmake_tool| OsBuildConfig { cmake_tool })
            .unwrap_or(defaults.windows);
        let linux = doc
            .linux
            .and_then(|os| os.cmake_tool)
            .map(|cmake_tool| OsBuildConfig { cmake_tool })
            .unwrap_or(defaults.linux);

        let needed_commands = match doc.needed_commands {
            Some(commands) => {
                let mut unique = Vec::with_capacity(commands.len());
                for (i, command) in commands.into_iter().enumerate() {
                    let command = command.trim().to_string();
                    if command.is_empty() {
                        self.issue(
                            format!("config.neededCommands[{}]", i),
                            "command name must not be empty",
                        );
                    } else if !unique.contains(&command) {
                        unique.push(command);
                    }
                }
                unique
            }
            None => defaults.needed_commands,
        };

        let build_types_config = match doc.build_types_config {
            Some(map) => self.build_types(map, "config.buildTypesConfig"),
            None => defaults.build_types_config,
        };

        BuildConfig {
            windows,
            linux,
            needed_commands,
            build_types_config,
        }
    }

    fn build_types(
        &mut self,
        map: BTreeMap<String, BuildTypeConfigDocument>,
        location: &str,
    ) -> BTreeMap<BuildType, BuildTypeConfig> {
        let mut result = BTreeMap::new();
        for (key, doc) in map {
            let entry_location = format!("{}.{}", location, key);
            let options = doc.options.unwrap_or_default();
            self.template(&options, &format!("{}.options", entry_location));
            match key.parse::<BuildType>() {
                Ok(build_type) => {
                    result.insert(build_type, BuildTypeConfig { options });
                }
                Err(e) => self.issue(entry_location, e.to_string()),
            }
        }
        result
    }

    /// Reports placeholders that no invocation context will ever define.
    fn template(&mut self, template: &str, location: &str) {
        for name in interpolator::referenced_variables(template) {
            if !CONTEXT_VARIABLES.contains(&name.as_str()) {
                self.issue(
                    location,
                    format!(
                        "unknown template variable '{}' (expected one of: {})",
                        name,
                        CONTEXT_VARIABLES.join(", ")
                    ),
                );
            }
        }
    }

    fn project(&mut self, doc: ProjectDocument, location: &str) -> Option<Project> {
        let name = match doc.name.map(|n| n.trim().to_string()) {
            Some(name) if is_plain_directory_name(&name) => Some(name),
            Some(name) => {
                self.issue(
                    format!("{}.name", location),
                    format!("'{}' is not a plain directory name", name),
                );
                None
            }
            None => {
                self.issue(format!("{}.name", location), "missing required field");
                None
            }
        };

        let language = match doc.language {
            Some(raw) => raw.parse::<ProjectLanguage>().map_err(|e| {
                self.issue(format!("{}.language", location), e.to_string());
            }),
            None => Ok(ProjectLanguage::C),
        };
        let kind = match doc.kind {
            Some(raw) => raw.parse::<ProjectType>().map_err(|e| {
                self.issue(format!("{}.type", location), e.to_string());
            }),
            None => Ok(ProjectType::Executable),
        };

        let build_types_config = match doc.build_types_config {
            Some(map) => self.build_types(map, &format!("{}.buildTypesConfig", location)),
            None => BTreeMap::new(),
        };

        let example_targets = doc
            .example_targets
            .map(|targets| self.legacy_examples(targets, location));
        let legacy = legacy_executables(doc.run_target, doc.test_target, example_targets);
        let executables = self.executables(doc.executables.unwrap_or_default(), legacy, location);

        Some(Project {
            name: name?,
            language: language.ok()?,
            kind: kind.ok()?,
            executables,
            build_types_config,
        })
    }

    /// Keeps the legacy example names that can be exposed as example targets.
    fn legacy_examples(&mut self, targets: Vec<String>, location: &str) -> Vec<String> {
        let mut kept: Vec<String> = Vec::new();
        for (i, target) in targets.into_iter().enumerate() {
            let entry_location = format!("{}.exampleTargets[{}]", location, i);
            let name = target.trim().to_string();
            if name.is_empty() {
                self.issue(entry_location, "example name must not be empty");
            } else if name == RUN_EXECUTABLE || name == TEST_EXECUTABLE {
                self.issue(
                    entry_location,
                    format!("'{}' is reserved and cannot name an example", name),
                );
            } else if kept.contains(&name) {
                self.issue(entry_location, format!("duplicate example name '{}'", name));
            } else {
                kept.push(name);
            }
        }
        kept
    }

    fn executables(
        &mut self,
        docs: Vec<ExecutableDocument>,
        legacy: Vec<ExecutableConfig>,
        location: &str,
    ) -> Vec<ExecutableConfig> {
        let mut result: Vec<ExecutableConfig> = Vec::new();

        for (i, doc) in docs.into_iter().enumerate() {
            let exe_location = format!("{}.executables[{}]", location, i);
            let Some(name) = doc.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
            else {
                self.issue(format!("{}.name", exe_location), "missing required field");
                continue;
            };
            if result.iter().any(|exe| exe.name == name) {
                self.issue(
                    format!("{}.name", exe_location),
                    format!("duplicate executable name '{}'", name),
                );
                continue;
            }

            let target = doc.target.filter(|t| !t.trim().is_empty());
            let fallback = default_path_template(target.as_deref().unwrap_or(&name));
            let windows_path = doc.windows_path.unwrap_or_else(|| fallback.clone());
            let linux_path = doc.linux_path.unwrap_or(fallback);
            self.template(&windows_path, &format!("{}.windowsPath", exe_location));
            self.template(&linux_path, &format!("{}.linuxPath", exe_location));

            result.push(ExecutableConfig {
                name,
                target,
                windows_path,
                linux_path,
            });
        }

        for exe in legacy {
            if result.iter().any(|existing| existing.name == exe.name) {
                log::debug!(
                    "{}: legacy target '{}' shadowed by an explicit executable",
                    location,
                    exe.name
                );
            } else {
                result.push(exe);
            }
        }

        result
    }
}

/// Converts the legacy `runTarget`/`testTarget`/`exampleTargets` fields into executables.
fn legacy_executables(
    run_target: Option<String>,
    test_target: Option<String>,
    example_targets: Option<Vec<String>>,
) -> Vec<ExecutableConfig> {
    let targeted = |name: &str, target: String| ExecutableConfig {
        name: name.to_string(),
        target: Some(target.clone()),
        ..ExecutableConfig::new(target)
    };

    let mut executables = Vec::new();
    if let Some(target) = run_target {
        executables.push(targeted(RUN_EXECUTABLE, target));
    }
    if let Some(target) = test_target {
        executables.push(targeted(TEST_EXECUTABLE, target));
    }
    for example in example_targets.unwrap_or_default() {
        executables.push(targeted(&example, example.clone()));
    }
    executables
}

fn is_plain_directory_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
