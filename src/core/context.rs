// src/core/context.rs

use crate::core::interpolator::{self, TemplateContext, TemplateError};
use crate::core::paths;
use crate::models::{BuildType, Platform};
use std::path::{Path, PathBuf};

pub const BUILD_DIR_VAR: &str = "BUILD_DIR";
pub const PROJECT_DIR_VAR: &str = "PROJECT_DIR";
pub const PROJECT_NAME_VAR: &str = "PROJECT_NAME";
pub const BUILD_TYPE_VAR: &str = "BUILD_TYPE";
pub const PLATFORM_VAR: &str = "PLATFORM";
pub const EXECUTABLE_SUFFIX_VAR: &str = "EXECUTABLE_SUFFIX";

/// Every variable available to option and path templates.
pub const CONTEXT_VARIABLES: [&str; 6] = [
    BUILD_DIR_VAR,
    PROJECT_DIR_VAR,
    PROJECT_NAME_VAR,
    BUILD_TYPE_VAR,
    PLATFORM_VAR,
    EXECUTABLE_SUFFIX_VAR,
];

/// Paths and template variables computed for one project, platform and build type.
/// Built per invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommandContext {
    pub project_name: String,
    pub project_dir: PathBuf,
    pub build_dir: PathBuf,
    pub build_type: BuildType,
    pub platform: Platform,
    pub variables: TemplateContext,
}

impl ResolvedCommandContext {
    pub fn new(base_dir: &Path, project_name: &str, platform: Platform, build_type: BuildType) -> Self {
        let project_dir = paths::project_dir(base_dir, project_name);
        let build_dir = paths::build_dir(&project_dir, platform, build_type);

        let variables = TemplateContext::from([
            (BUILD_DIR_VAR.to_string(), paths::display_path(&build_dir)),
            (PROJECT_DIR_VAR.to_string(), paths::display_path(&project_dir)),
            (PROJECT_NAME_VAR.to_string(), project_name.to_string()),
            (BUILD_TYPE_VAR.to_string(), build_type.as_str().to_string()),
            (PLATFORM_VAR.to_string(), platform.as_str().to_string()),
            (
                EXECUTABLE_SUFFIX_VAR.to_string(),
                platform.executable_suffix().to_string(),
            ),
        ]);

        Self {
            project_name: project_name.to_string(),
            project_dir,
            build_dir,
            build_type,
            platform,
            variables,
        }
    }

    /// Expands `template` against this context's variables.
    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        interpolator::render(template, &self.variables)
    }
}
