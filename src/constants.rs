// src/constants.rs

/// The name of the settings document at the root of the managed tree.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// The directory (inside a project) holding the per-build-type `.cfg` option files.
pub const OPTION_FILES_DIR: &str = "config";

/// The extension of the per-build-type option files (`config/<buildType>.cfg`).
pub const OPTION_FILE_EXTENSION: &str = "cfg";

/// The directory (inside a project) that receives every generated build tree.
pub const BUILD_DIR_NAME: &str = "build";

/// Reserved executable name used by the `run` action.
pub const RUN_EXECUTABLE: &str = "run";

/// Reserved executable name used by the `test` action.
pub const TEST_EXECUTABLE: &str = "test";

/// The native build-system generator invoked for C projects.
pub const NATIVE_BUILD_TOOL: &str = "cmake";

/// The Python environment and package runner invoked for Python projects.
pub const PYTHON_TOOL: &str = "uv";

/// Entrypoint used by `run` on a Python project that declares no `run` executable.
pub const DEFAULT_PYTHON_ENTRYPOINT: &str = "main.py";

/// Maximum nesting of `<include>` directives in option files.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Environment variable that overrides the base directory of the managed tree.
pub const BASE_DIR_ENV: &str = "NTT_BASE_DIR";
