// src/core/composer.rs

//! # Command Composer
//!
//! Turns a resolved intent (action, project or example name, build type) into the ordered
//! list of command lines that carry it out. Composition is pure apart from reading the
//! project's option files: nothing is executed here.
//!
//! A generator invocation is layered as follows:
//!
//! 1. base invocation targeting the build directory,
//! 2. the OS-specific generator selection (`-G "<tool>"`),
//! 3. the build type's options template, expanded against the invocation context,
//! 4. one `-D<key>="<value>"` define per entry of `config/<buildType>.cfg`.

use crate::constants::{
    DEFAULT_PYTHON_ENTRYPOINT, NATIVE_BUILD_TOOL, PYTHON_TOOL, RUN_EXECUTABLE, TEST_EXECUTABLE,
};
use crate::core::commons::{join_parts, wrap_value};
use crate::core::config_store::ConfigError;
use crate::core::context::ResolvedCommandContext;
use crate::core::interpolator::TemplateError;
use crate::core::option_files;
use crate::core::paths::display_path;
use crate::core::registry::ProjectRegistry;
use crate::models::{Action, BuildType, ExecutableConfig, Platform, Project, ProjectLanguage, ProjectType, Settings};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Project '{name}' not found. Available for '{action}': {}", list_or_none(.available))]
    ProjectNotFound {
        name: String,
        action: Action,
        available: Vec<String>,
    },
    #[error("Example '{name}' not found. Available examples: {}", list_or_none(.available))]
    ExampleNotFound { name: String, available: Vec<String> },
    #[error("Action '{action}' is not supported for {language} project '{project}'.")]
    UnsupportedLanguage {
        action: Action,
        project: String,
        language: ProjectLanguage,
    },
    #[error("Action '{action}' is not supported for project '{project}' of type '{kind}'.")]
    UnsupportedProjectType {
        action: Action,
        project: String,
        kind: ProjectType,
    },
    #[error("Project '{project}' declares no '{executable}' executable.")]
    MissingExecutable { project: String, executable: String },
    #[error("Failed to read option files for project '{project}': {source}")]
    OptionFiles {
        project: String,
        #[source]
        source: ConfigError,
    },
    #[error("Failed to expand template for project '{project}': {source}")]
    Template {
        project: String,
        #[source]
        source: TemplateError,
    },
}

fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Which stage of an invocation a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Configure/generate the native build tree.
    Generate,
    /// Build the native tree (optionally one target).
    Build,
    /// Synchronize the Python environment.
    EnvSync,
    /// Launch a built executable or the Python entrypoint.
    Execute,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generate => "generate",
            Self::Build => "build",
            Self::EnvSync => "env-sync",
            Self::Execute => "execute",
        })
    }
}

/// One command line and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub kind: StepKind,
    pub command: String,
    pub cwd: PathBuf,
}

impl fmt::Display for CommandStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.command, display_path(&self.cwd))
    }
}

/// The ordered steps of one invocation, plus the project it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub action: Action,
    pub project: String,
    pub build_type: BuildType,
    pub steps: Vec<CommandStep>,
}

type ComposeResult<T> = Result<T, ComposeError>;

/// Resolves projects against the registry and composes their command lines.
#[derive(Debug)]
pub struct CommandComposer<'a> {
    settings: &'a Settings,
    registry: &'a ProjectRegistry,
    base_dir: &'a Path,
    platform: Platform,
}

impl<'a> CommandComposer<'a> {
    /// Creates a composer for the host platform.
    pub fn new(settings: &'a Settings, registry: &'a ProjectRegistry, base_dir: &'a Path) -> Self {
        Self::for_platform(settings, registry, base_dir, Platform::current())
    }

    /// Creates a composer producing commands for an explicit platform.
    pub fn for_platform(
        settings: &'a Settings,
        registry: &'a ProjectRegistry,
        base_dir: &'a Path,
        platform: Platform,
    ) -> Self {
        Self {
            settings,
            registry,
            base_dir,
            platform,
        }
    }

    /// Composes the plan for `action` applied to `name` (a project, or an example target
    /// for [`Action::Example`]).
    pub fn compose(&self, action: Action, name: &str, build_type: BuildType) -> ComposeResult<CommandPlan> {
        log::debug!("Composing '{}' for '{}' ({})", action, name, build_type);
        match action {
            Action::Build => self.compose_build(name, build_type),
            Action::Run => self.compose_run(name, build_type),
            Action::Test => self.compose_test(name, build_type),
            Action::Example => self.compose_example(name, build_type),
        }
    }

    /// Computes the paths and template variables for a project.
    pub fn resolve_context(&self, project: &Project, build_type: BuildType) -> ResolvedCommandContext {
        ResolvedCommandContext::new(self.base_dir, &project.name, self.platform, build_type)
    }

    // --- Actions ---

    fn compose_build(&self, name: &str, build_type: BuildType) -> ComposeResult<CommandPlan> {
        let project = self.resolve_project(Action::Build, name)?;
        self.require_native(Action::Build, project)?;

        let ctx = self.resolve_context(project, build_type);
        let steps = vec![self.generate_step(project, &ctx)?, self.build_step(&ctx, None)];
        Ok(self.plan(Action::Build, project, build_type, steps))
    }

    fn compose_run(&self, name: &str, build_type: BuildType) -> ComposeResult<CommandPlan> {
        let project = self.resolve_project(Action::Run, name)?;
        let ctx = self.resolve_context(project, build_type);

        let steps = match project.language {
            ProjectLanguage::Python => self.python_run_steps(project, &ctx)?,
            ProjectLanguage::C => {
                let exe = project.executable(RUN_EXECUTABLE).ok_or_else(|| {
                    ComposeError::MissingExecutable {
                        project: project.name.clone(),
                        executable: RUN_EXECUTABLE.to_string(),
                    }
                })?;
                vec![
                    self.generate_step(project, &ctx)?,
                    self.build_step(&ctx, exe.target.as_deref()),
                    self.execute_step(project, exe, &ctx)?,
                ]
            }
        };
        Ok(self.plan(Action::Run, project, build_type, steps))
    }

    fn compose_test(&self, name: &str, build_type: BuildType) -> ComposeResult<CommandPlan> {
        let project = self.resolve_project(Action::Test, name)?;
        self.require_native(Action::Test, project)?;
        if project.kind != ProjectType::Library {
            return Err(ComposeError::UnsupportedProjectType {
                action: Action::Test,
                project: project.name.clone(),
                kind: project.kind,
            });
        }

        let ctx = self.resolve_context(project, build_type);
        let target = project
            .executable(TEST_EXECUTABLE)
            .map_or(TEST_EXECUTABLE, ExecutableConfig::build_target);
        let steps = vec![
            self.generate_step(project, &ctx)?,
            self.build_step(&ctx, Some(target)),
        ];
        Ok(self.plan(Action::Test, project, build_type, steps))
    }

    fn compose_example(&self, name: &str, build_type: BuildType) -> ComposeResult<CommandPlan> {
        let project = self
            .registry
            .example_owner(name)
            .ok_or_else(|| ComposeError::ExampleNotFound {
                name: name.to_string(),
                available: self.eligible(Action::Example),
            })?;
        self.require_native(Action::Example, project)?;
        let exe = project
            .executable(name)
            .ok_or_else(|| ComposeError::MissingExecutable {
                project: project.name.clone(),
                executable: name.to_string(),
            })?;

        let ctx = self.resolve_context(project, build_type);
        let steps = vec![
            self.generate_step(project, &ctx)?,
            self.build_step(&ctx, Some(exe.build_target())),
            self.execute_step(project, exe, &ctx)?,
        ];
        Ok(self.plan(Action::Example, project, build_type, steps))
    }

    // --- Stages ---

    fn resolve_project(&self, action: Action, name: &str) -> ComposeResult<&'a Project> {
        self.registry
            .get(name)
            .ok_or_else(|| ComposeError::ProjectNotFound {
                name: name.to_string(),
                action,
                available: self.eligible(action),
            })
    }

    fn require_native(&self, action: Action, project: &Project) -> ComposeResult<()> {
        if project.is_native() {
            Ok(())
        } else {
            Err(ComposeError::UnsupportedLanguage {
                action,
                project: project.name.clone(),
                language: project.language,
            })
        }
    }

    fn generate_step(&self, project: &Project, ctx: &ResolvedCommandContext) -> ComposeResult<CommandStep> {
        let mut parts = vec![
            NATIVE_BUILD_TOOL.to_string(),
            "-B".to_string(),
            wrap_value(&display_path(&ctx.build_dir)),
        ];

        let generator = &self.settings.config.os_config(self.platform).cmake_tool;
        if !generator.trim().is_empty() {
            parts.push("-G".to_string());
            parts.push(wrap_value(generator));
        }

        let options_template = self.settings.build_type_options(project, ctx.build_type);
        let options = ctx
            .render(options_template)
            .map_err(|source| ComposeError::Template {
                project: project.name.clone(),
                source,
            })?;
        parts.push(options);

        let defines = option_files::read_options(&ctx.project_dir, ctx.build_type).map_err(|source| {
            ComposeError::OptionFiles {
                project: project.name.clone(),
                source,
            }
        })?;
        for (key, value) in defines.iter() {
            parts.push(format!("-D{}={}", key, wrap_value(value)));
        }

        Ok(CommandStep {
            kind: StepKind::Generate,
            command: join_parts(&parts),
            cwd: ctx.project_dir.clone(),
        })
    }

    fn build_step(&self, ctx: &ResolvedCommandContext, target: Option<&str>) -> CommandStep {
        let mut parts = vec![
            NATIVE_BUILD_TOOL.to_string(),
            "--build".to_string(),
            wrap_value(&display_path(&ctx.build_dir)),
            "--config".to_string(),
            ctx.build_type.config_name(),
        ];
        if let Some(target) = target {
            parts.push("--target".to_string());
            parts.push(target.to_string());
        }

        CommandStep {
            kind: StepKind::Build,
            command: join_parts(&parts),
            cwd: ctx.project_dir.clone(),
        }
    }

    /// Launches the executable at its expanded OS path. The path is not checked for
    /// existence; a missing binary surfaces as a failure of the run itself.
    fn execute_step(
        &self,
        project: &Project,
        exe: &ExecutableConfig,
        ctx: &ResolvedCommandContext,
    ) -> ComposeResult<CommandStep> {
        let path = self.executable_path(project, exe, ctx)?;
        Ok(CommandStep {
            kind: StepKind::Execute,
            command: wrap_value(&path),
            cwd: ctx.project_dir.clone(),
        })
    }

    fn python_run_steps(&self, project: &Project, ctx: &ResolvedCommandContext) -> ComposeResult<Vec<CommandStep>> {
        let entrypoint = match project.executable(RUN_EXECUTABLE) {
            Some(exe) => wrap_value(&self.executable_path(project, exe, ctx)?),
            None => DEFAULT_PYTHON_ENTRYPOINT.to_string(),
        };

        Ok(vec![
            CommandStep {
                kind: StepKind::EnvSync,
                command: format!("{} sync", PYTHON_TOOL),
                cwd: ctx.project_dir.clone(),
            },
            CommandStep {
                kind: StepKind::Execute,
                command: format!("{} run {}", PYTHON_TOOL, entrypoint),
                cwd: ctx.project_dir.clone(),
            },
        ])
    }

    fn executable_path(
        &self,
        project: &Project,
        exe: &ExecutableConfig,
        ctx: &ResolvedCommandContext,
    ) -> ComposeResult<String> {
        ctx.render(exe.path_template(self.platform))
            .map_err(|source| ComposeError::Template {
                project: project.name.clone(),
                source,
            })
    }

    fn eligible(&self, action: Action) -> Vec<String> {
        self.registry
            .projects_eligible_for(action)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn plan(&self, action: Action, project: &Project, build_type: BuildType, steps: Vec<CommandStep>) -> CommandPlan {
        CommandPlan {
            action,
            project: project.name.clone(),
            build_type,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BuildTypeConfig;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        settings: Settings,
        registry: ProjectRegistry,
    }

    impl Fixture {
        fn new(projects: Vec<Project>) -> Self {
            let mut settings = Settings::default();
            settings.config.linux.cmake_tool = "Ninja".to_string();
            settings.projects = projects;
            let registry = ProjectRegistry::index(&settings.projects);
            Self {
                dir: TempDir::new().unwrap(),
                settings,
                registry,
            }
        }

        fn composer(&self) -> CommandComposer<'_> {
            CommandComposer::for_platform(&self.settings, &self.registry, self.dir.path(), Platform::Linux)
        }

        fn base(&self) -> String {
            display_path(self.dir.path())
        }

        fn write_option_file(&self, project: &str, file: &str, content: &str) {
            let config_dir = self.dir.path().join(project).join("config");
            fs::create_dir_all(&config_dir).unwrap();
            fs::write(config_dir.join(file), content).unwrap();
        }
    }

    fn sample_projects() -> Vec<Project> {
        vec![
            Project::new("engine", ProjectLanguage::C, ProjectType::Executable).with_executable(
                ExecutableConfig {
                    name: "run".to_string(),
                    target: Some("engine_app".to_string()),
                    ..ExecutableConfig::new("engine_app")
                },
            ),
            Project::new("tool", ProjectLanguage::Python, ProjectType::Executable),
            Project::new("mathlib", ProjectLanguage::C, ProjectType::Library)
                .with_executable(ExecutableConfig::new("vectors")),
        ]
    }

    #[test]
    fn test_build_emits_generate_then_build() {
        let fx = Fixture::new(sample_projects());
        let plan = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap();

        let base = fx.base();
        let build_dir = format!("{}/engine/build/linux/debug", base);
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(
            plan.steps[0].command,
            format!("cmake -B \"{}\" -G \"Ninja\" -DCMAKE_BUILD_TYPE=Debug", build_dir)
        );
        assert_eq!(
            plan.steps[1].command,
            format!("cmake --build \"{}\" --config DEBUG", build_dir)
        );
        assert_eq!(plan.steps[0].kind, StepKind::Generate);
        assert_eq!(plan.steps[1].kind, StepKind::Build);
        assert!(plan.steps.iter().all(|s| s.cwd == fx.dir.path().join("engine")));
    }

    #[test]
    fn test_release_option_file_adds_defines() {
        let fx = Fixture::new(sample_projects());
        fx.write_option_file("engine", "release.cfg", "OPT=-O2\n");

        let release = fx.composer().compose(Action::Build, "engine", BuildType::Release).unwrap();
        assert!(release.steps[0].command.contains("-DOPT=\"-O2\""));
        assert!(release.steps[0].command.ends_with("-DCMAKE_BUILD_TYPE=Release -DOPT=\"-O2\""));

        let test = fx.composer().compose(Action::Build, "engine", BuildType::Test).unwrap();
        assert!(test.steps[0].command.ends_with("-DCMAKE_BUILD_TYPE=Debug -DENABLE_TESTS=ON"));
        assert!(!test.steps[0].command.contains("-DOPT"));
    }

    #[test]
    fn test_option_file_defines_keep_file_order_and_escape_quotes() {
        let fx = Fixture::new(sample_projects());
        fx.write_option_file("engine", "common.cfg", "B=1\n");
        fx.write_option_file("engine", "debug.cfg", "A=say \"hi\"\n<common.cfg>\nC = 3\n");

        let plan = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap();
        assert!(plan.steps[0]
            .command
            .ends_with("-DA=\"say \\\"hi\\\"\" -DB=\"1\" -DC=\"3\""));
    }

    #[test]
    fn test_option_file_backslashes_survive_command_splitting() {
        let fx = Fixture::new(sample_projects());
        fx.write_option_file("engine", "debug.cfg", "SDK = C:\\sdk\\\nINC = \\\\server\\share\n");

        let plan = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap();
        let args = shlex::split(&plan.steps[0].command).unwrap();
        assert!(args.contains(&r"-DSDK=C:\sdk\".to_string()));
        assert!(args.contains(&r"-DINC=\\server\share".to_string()));
    }

    #[test]
    fn test_windows_paths_survive_command_splitting() {
        let fx = Fixture::new(vec![Project::new("engine", ProjectLanguage::C, ProjectType::Executable)
            .with_executable(ExecutableConfig {
                name: "run".to_string(),
                target: None,
                windows_path: r"{{ PROJECT_DIR }}\bin\engine.exe".to_string(),
                linux_path: "{{ PROJECT_DIR }}/bin/engine".to_string(),
            })]);
        let composer =
            CommandComposer::for_platform(&fx.settings, &fx.registry, fx.dir.path(), Platform::Windows);
        let plan = composer.compose(Action::Run, "engine", BuildType::Debug).unwrap();

        let args = shlex::split(&plan.steps[2].command).unwrap();
        assert_eq!(args, vec![format!(r"{}\bin\engine.exe", display_path(&fx.dir.path().join("engine")))]);
    }

    #[test]
    fn test_option_file_cycle_aborts_composition() {
        let fx = Fixture::new(sample_projects());
        fx.write_option_file("engine", "debug.cfg", "<debug.cfg>\n");
        let err = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::OptionFiles { source: ConfigError::IncludeCycle { .. }, .. }
        ));
    }

    #[test]
    fn test_build_type_template_is_expanded() {
        let mut fx = Fixture::new(sample_projects());
        fx.settings.config.build_types_config.insert(
            BuildType::Web,
            BuildTypeConfig::new("-DOUT={{ BUILD_DIR }}/web -DNAME={{ PROJECT_NAME }}"),
        );
        let plan = fx.composer().compose(Action::Build, "engine", BuildType::Web).unwrap();
        let expected = format!("-DOUT={}/engine/build/linux/web/web -DNAME=engine", fx.base());
        assert!(plan.steps[0].command.ends_with(&expected));
    }

    #[test]
    fn test_project_build_type_entry_replaces_global_entry() {
        let fx = Fixture::new(vec![Project::new("engine", ProjectLanguage::C, ProjectType::Executable)
            .with_build_type_options(BuildType::Release, "-DFAST=ON")]);

        let release = fx.composer().compose(Action::Build, "engine", BuildType::Release).unwrap();
        assert!(release.steps[0].command.ends_with("-G \"Ninja\" -DFAST=ON"));

        let debug = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap();
        assert!(debug.steps[0].command.ends_with("-DCMAKE_BUILD_TYPE=Debug"));
    }

    #[test]
    fn test_undefined_template_variable_fails() {
        let mut fx = Fixture::new(sample_projects());
        fx.settings
            .config
            .build_types_config
            .insert(BuildType::Debug, BuildTypeConfig::new("-DX={{ NOPE }}"));
        let err = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::Template { source: TemplateError::UndefinedVariable { ref name, .. }, .. } if name == "NOPE"
        ));
    }

    #[test]
    fn test_missing_build_type_entry_means_no_options() {
        let mut fx = Fixture::new(sample_projects());
        fx.settings.config.build_types_config.clear();
        let plan = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap();
        assert!(plan.steps[0].command.ends_with("-G \"Ninja\""));
    }

    #[test]
    fn test_empty_generator_is_omitted() {
        let mut fx = Fixture::new(sample_projects());
        fx.settings.config.linux.cmake_tool = String::new();
        let plan = fx.composer().compose(Action::Build, "engine", BuildType::Debug).unwrap();
        assert!(!plan.steps[0].command.contains("-G"));
    }

    #[test]
    fn test_windows_uses_windows_generator_and_path() {
        let fx = Fixture::new(sample_projects());
        let composer =
            CommandComposer::for_platform(&fx.settings, &fx.registry, fx.dir.path(), Platform::Windows);
        let plan = composer.compose(Action::Run, "engine", BuildType::Release).unwrap();
        assert!(plan.steps[0].command.contains("-G \"Visual Studio 17 2022\""));
        assert!(plan.steps[0].command.contains("build/windows/release") || plan.steps[0].command.contains("build\\windows\\release"));
        assert!(plan.steps[2].command.ends_with("engine_app.exe\""));
    }

    #[rstest]
    #[case(BuildType::Debug)]
    #[case(BuildType::Release)]
    #[case(BuildType::Test)]
    #[case(BuildType::Web)]
    fn test_build_dir_is_determined_by_platform_and_build_type(#[case] build_type: BuildType) {
        let fx = Fixture::new(sample_projects());
        let composer = fx.composer();
        let project = fx.registry.get("engine").unwrap();

        let ctx = composer.resolve_context(project, build_type);
        assert_eq!(
            ctx.build_dir,
            fx.dir.path().join("engine").join("build").join("linux").join(build_type.as_str())
        );
    }

    #[test]
    fn test_build_dirs_never_collide() {
        let fx = Fixture::new(sample_projects());
        let project = fx.registry.get("engine").unwrap();
        let mut seen = HashSet::new();
        for platform in [Platform::Linux, Platform::Windows] {
            let composer = CommandComposer::for_platform(&fx.settings, &fx.registry, fx.dir.path(), platform);
            for build_type in BuildType::ALL {
                assert!(seen.insert(composer.resolve_context(project, build_type).build_dir));
            }
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_python_run_syncs_then_runs_entrypoint() {
        let fx = Fixture::new(sample_projects());
        let plan = fx.composer().compose(Action::Run, "tool", BuildType::Debug).unwrap();

        let commands: Vec<&str> = plan.steps.iter().map(|s| s.command.as_str()).collect();
        assert_eq!(commands, vec!["uv sync", "uv run main.py"]);
        assert!(plan.steps.iter().all(|s| s.cwd == fx.dir.path().join("tool")));
        assert_eq!(plan.steps[0].kind, StepKind::EnvSync);
    }

    #[test]
    fn test_python_run_uses_declared_entrypoint() {
        let fx = Fixture::new(vec![Project::new("tool", ProjectLanguage::Python, ProjectType::Executable)
            .with_executable(ExecutableConfig {
                name: "run".to_string(),
                target: None,
                windows_path: "src\\app.py".to_string(),
                linux_path: "src/app.py".to_string(),
            })]);
        let plan = fx.composer().compose(Action::Run, "tool", BuildType::Debug).unwrap();
        assert_eq!(plan.steps[1].command, "uv run \"src/app.py\"");
    }

    #[test]
    fn test_native_run_builds_run_target_then_executes_it() {
        let fx = Fixture::new(sample_projects());
        let plan = fx.composer().compose(Action::Run, "engine", BuildType::Debug).unwrap();

        let build_dir = format!("{}/engine/build/linux/debug", fx.base());
        assert_eq!(plan.steps.len(), 3);
        assert_eq!(
            plan.steps[1].command,
            format!("cmake --build \"{}\" --config DEBUG --target engine_app", build_dir)
        );
        assert_eq!(plan.steps[2].command, format!("\"{}/engine_app\"", build_dir));
        assert_eq!(plan.steps[2].kind, StepKind::Execute);
    }

    #[test]
    fn test_native_run_without_run_executable_fails() {
        let fx = Fixture::new(sample_projects());
        let err = fx.composer().compose(Action::Run, "mathlib", BuildType::Debug).unwrap_err();
        assert!(matches!(err, ComposeError::MissingExecutable { ref executable, .. } if executable == "run"));
    }

    #[test]
    fn test_test_builds_test_target_of_library() {
        let fx = Fixture::new(sample_projects());
        let plan = fx.composer().compose(Action::Test, "mathlib", BuildType::Test).unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert!(plan.steps[1].command.ends_with("--config TEST --target test"));
    }

    #[test]
    fn test_test_uses_declared_test_target() {
        let fx = Fixture::new(vec![Project::new("mathlib", ProjectLanguage::C, ProjectType::Library)
            .with_executable(ExecutableConfig {
                target: Some("mathlib_tests".to_string()),
                ..ExecutableConfig::new("test")
            })]);
        let plan = fx.composer().compose(Action::Test, "mathlib", BuildType::Debug).unwrap();
        assert!(plan.steps[1].command.ends_with("--target mathlib_tests"));
    }

    #[test]
    fn test_test_on_non_library_fails() {
        let fx = Fixture::new(sample_projects());
        let err = fx.composer().compose(Action::Test, "engine", BuildType::Debug).unwrap_err();
        assert!(matches!(err, ComposeError::UnsupportedProjectType { kind: ProjectType::Executable, .. }));
    }

    #[test]
    fn test_example_builds_and_runs_named_target() {
        let fx = Fixture::new(sample_projects());
        let plan = fx.composer().compose(Action::Example, "vectors", BuildType::Release).unwrap();

        let build_dir = format!("{}/mathlib/build/linux/release", fx.base());
        assert_eq!(plan.project, "mathlib");
        assert_eq!(plan.steps.len(), 3);
        assert!(plan.steps[1].command.ends_with("--config RELEASE --target vectors"));
        assert_eq!(plan.steps[2].command, format!("\"{}/vectors\"", build_dir));
    }

    #[rstest]
    #[case(Action::Build)]
    #[case(Action::Test)]
    fn test_native_only_actions_reject_python(#[case] action: Action) {
        let fx = Fixture::new(sample_projects());
        let err = fx.composer().compose(action, "tool", BuildType::Debug).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::UnsupportedLanguage { language: ProjectLanguage::Python, .. }
        ));
        assert!(err.to_string().contains("Python project 'tool'"));
    }

    #[test]
    fn test_unknown_project_lists_eligible_names() {
        let fx = Fixture::new(sample_projects());
        let err = fx.composer().compose(Action::Build, "nope", BuildType::Debug).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Project 'nope' not found. Available for 'build': engine, mathlib"
        );
    }

    #[test]
    fn test_unknown_example_is_reported() {
        let fx = Fixture::new(sample_projects());
        let err = fx.composer().compose(Action::Example, "engine", BuildType::Debug).unwrap_err();
        assert!(matches!(err, ComposeError::ExampleNotFound { ref available, .. } if available == &["vectors"]));
    }
}
