// src/models.rs

use crate::constants::{RUN_EXECUTABLE, TEST_EXECUTABLE};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a string does not name any variant of one of the closed enums below.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {kind} (expected one of: {})", .expected.join(", "))]
pub struct ParseEnumError {
    /// Human readable name of the enum (e.g. "project language").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Every accepted spelling.
    pub expected: &'static [&'static str],
}

/// Implements `Display` and `FromStr` for an enum exposing `ALL`, `NAMES` and `as_str`.
macro_rules! impl_string_enum {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == s)
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::NAMES,
                    })
            }
        }
    };
}

// --- ENUMERATIONS ---

/// The programming language of a project. Each language has its own action pipeline.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectLanguage {
    /// Native project driven through the native build-system generator.
    #[serde(rename = "C")]
    C,
    /// Python project driven through the Python environment runner.
    #[serde(rename = "Python")]
    Python,
}

impl ProjectLanguage {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 2] = [Self::C, Self::Python];
    /// The on-disk spelling of every variant.
    pub const NAMES: &'static [&'static str] = &["C", "Python"];

    /// Returns the on-disk spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Python => "Python",
        }
    }
}

impl_string_enum!(ProjectLanguage, "project language");

/// The kind of a project. It decides which actions are legal for it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Builds into something runnable.
    Executable,
    /// Builds into a library; the only kind that can be tested.
    Library,
    /// A collection of example programs.
    Example,
    /// Installable package.
    Install,
}

impl ProjectType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [Self::Executable, Self::Library, Self::Example, Self::Install];
    /// The on-disk spelling of every variant.
    pub const NAMES: &'static [&'static str] = &["executable", "library", "example", "install"];

    /// Returns the on-disk spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Executable => "executable",
            Self::Library => "library",
            Self::Example => "example",
            Self::Install => "install",
        }
    }
}

impl_string_enum!(ProjectType, "project type");

/// A named build profile selecting one layer of generator options.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    /// Unoptimized build with debug information.
    Debug,
    /// Optimized build.
    Release,
    /// Debug build with tests enabled.
    Test,
    /// Release build targeting the web.
    Web,
}

impl BuildType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [Self::Debug, Self::Release, Self::Test, Self::Web];
    /// The on-disk spelling of every variant.
    pub const NAMES: &'static [&'static str] = &["debug", "release", "test", "web"];

    /// Returns the on-disk spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
            Self::Test => "test",
            Self::Web => "web",
        }
    }

    /// The value passed to the native build tool's `--config` flag.
    pub fn config_name(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl_string_enum!(BuildType, "build type");

/// What the user asked the tool to do with a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Action {
    /// Generate and build a native project.
    Build,
    /// Build (if native) and launch a project.
    Run,
    /// Generate and build the test target of a native library.
    Test,
    /// Build and launch a named example executable.
    Example,
}

impl Action {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [Self::Build, Self::Run, Self::Test, Self::Example];
    /// The CLI spelling of every variant.
    pub const NAMES: &'static [&'static str] = &["build", "run", "test", "example"];

    /// Returns the CLI spelling.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Run => "run",
            Self::Test => "test",
            Self::Example => "example",
        }
    }
}

impl_string_enum!(Action, "action");

/// The host platform. Everything that is not windows is treated as linux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Linux and every other unix-like host.
    Linux,
}

impl Platform {
    /// Detects the host platform at compile time.
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Returns the platform name used in build directories.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }

    /// Suffix appended to native executables on this platform.
    pub const fn executable_suffix(&self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Linux => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- `settings.json` MODELS (typed, fully populated after validation) ---

/// Generator selection for one operating system.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OsBuildConfig {
    /// Generator identifier handed to `-G` (e.g. "Ninja", "Unix Makefiles").
    pub cmake_tool: String,
}

/// Extra generator flags for one build type. `options` is a template string.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildTypeConfig {
    pub options: String,
}

impl BuildTypeConfig {
    pub fn new(options: impl Into<String>) -> Self {
        Self {
            options: options.into(),
        }
    }
}

/// Global build configuration shared by every project.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub windows: OsBuildConfig,
    pub linux: OsBuildConfig,
    /// Executables that must be on PATH before any action runs.
    #[serde(rename = "neededCommands")]
    pub needed_commands: Vec<String>,
    #[serde(rename = "buildTypesConfig")]
    pub build_types_config: BTreeMap<BuildType, BuildTypeConfig>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let build_types_config = BTreeMap::from([
            (
                BuildType::Debug,
                BuildTypeConfig::new("-DCMAKE_BUILD_TYPE=Debug"),
            ),
            (
                BuildType::Release,
                BuildTypeConfig::new("-DCMAKE_BUILD_TYPE=Release"),
            ),
            (
                BuildType::Web,
                BuildTypeConfig::new("-DCMAKE_BUILD_TYPE=Release -DWEB_BUILD=ON"),
            ),
            (
                BuildType::Test,
                BuildTypeConfig::new("-DCMAKE_BUILD_TYPE=Debug -DENABLE_TESTS=ON"),
            ),
        ]);

        Self {
            windows: OsBuildConfig {
                cmake_tool: "Visual Studio 17 2022".to_string(),
            },
            linux: OsBuildConfig {
                cmake_tool: "Unix Makefiles".to_string(),
            },
            needed_commands: vec!["cmake".to_string(), "git".to_string()],
            build_types_config,
        }
    }
}

impl BuildConfig {
    /// Returns the generator configuration for the given platform.
    pub fn os_config(&self, platform: Platform) -> &OsBuildConfig {
        match platform {
            Platform::Windows => &self.windows,
            Platform::Linux => &self.linux,
        }
    }
}

/// A named runnable artifact of a project, with one path template per OS.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExecutableConfig {
    pub name: String,
    /// Native build target producing this executable. Falls back to `name` where a
    /// target is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(rename = "windowsPath")]
    pub windows_path: String,
    #[serde(rename = "linuxPath")]
    pub linux_path: String,
}

impl ExecutableConfig {
    /// Creates an executable whose paths follow the default build layout.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let template = default_path_template(&name);
        Self {
            name,
            target: None,
            windows_path: template.clone(),
            linux_path: template,
        }
    }

    /// Returns the path template for the given platform.
    pub fn path_template(&self, platform: Platform) -> &str {
        match platform {
            Platform::Windows => &self.windows_path,
            Platform::Linux => &self.linux_path,
        }
    }

    /// The native build target for this executable.
    pub fn build_target(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.name)
    }
}

/// The path template used when an executable declares no OS path of its own.
pub fn default_path_template(target: &str) -> String {
    format!("{{{{ BUILD_DIR }}}}/{target}{{{{ EXECUTABLE_SUFFIX }}}}")
}

/// A sub-project of the managed tree. Its sources live in `<baseDir>/<name>`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub language: ProjectLanguage,
    #[serde(rename = "type")]
    pub kind: ProjectType,
    pub executables: Vec<ExecutableConfig>,
    /// Per-project replacements for entries of the global `buildTypesConfig`.
    #[serde(
        rename = "buildTypesConfig",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub build_types_config: BTreeMap<BuildType, BuildTypeConfig>,
}

impl Project {
    pub fn new(name: impl Into<String>, language: ProjectLanguage, kind: ProjectType) -> Self {
        Self {
            name: name.into(),
            language,
            kind,
            executables: Vec::new(),
            build_types_config: BTreeMap::new(),
        }
    }

    /// Builder-style helper appending an executable.
    pub fn with_executable(mut self, executable: ExecutableConfig) -> Self {
        self.executables.push(executable);
        self
    }

    /// Builder-style helper overriding one build type's options for this project only.
    pub fn with_build_type_options(mut self, build_type: BuildType, options: &str) -> Self {
        self.build_types_config
            .insert(build_type, BuildTypeConfig::new(options));
        self
    }

    /// Looks up an executable by name. Later entries shadow earlier ones.
    pub fn executable(&self, name: &str) -> Option<&ExecutableConfig> {
        self.executables.iter().rev().find(|exe| exe.name == name)
    }

    /// Executables exposed as ad-hoc example targets (everything but `run` and `test`).
    pub fn example_executables(&self) -> impl Iterator<Item = &ExecutableConfig> {
        self.executables
            .iter()
            .filter(|exe| exe.name != RUN_EXECUTABLE && exe.name != TEST_EXECUTABLE)
    }

    pub fn is_native(&self) -> bool {
        self.language == ProjectLanguage::C
    }
}

/// The root persisted document (`settings.json`).
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub config: BuildConfig,
    pub projects: Vec<Project>,
}

impl Settings {
    /// Resolves the options template of a build type for a project: the project's own
    /// entry wins over the global one, and a missing entry means no extra options.
    pub fn build_type_options<'a>(&'a self, project: &'a Project, build_type: BuildType) -> &'a str {
        project
            .build_types_config
            .get(&build_type)
            .or_else(|| self.config.build_types_config.get(&build_type))
            .map(|cfg| cfg.options.as_str())
            .unwrap_or("")
    }
}
