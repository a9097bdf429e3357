// src/cli/handlers/commons.rs

// Shared state and the compose/execute sequence used by every action handler.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

use crate::{
    core::{
        composer::{CommandComposer, CommandPlan},
        config_store, paths,
        registry::ProjectRegistry,
        task_executor,
    },
    models::{Action, BuildType, Settings},
    system::executor::{self, CommandRunner, SystemRunner},
};

/// Everything a handler needs for one invocation. Built once at startup.
pub struct AppContext {
    pub base_dir: PathBuf,
    pub settings: Settings,
    pub registry: ProjectRegistry,
    pub build_type: BuildType,
    pub dry_run: bool,
    runner: Box<dyn CommandRunner>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("base_dir", &self.base_dir)
            .field("projects", &self.settings.projects.len())
            .field("build_type", &self.build_type)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Resolves the base directory and loads its settings, running commands for real.
    pub fn load(base_dir: Option<&str>, build_type: BuildType, dry_run: bool) -> Result<Self> {
        let base_dir = paths::resolve_base_dir(base_dir)?;
        log::debug!("Base directory: {}", paths::display_path(&base_dir));
        let settings = config_store::load_settings(&base_dir)
            .with_context(|| format!("Failed to load settings from '{}'", paths::display_path(&base_dir)))?;
        Ok(Self::with_runner(base_dir, settings, build_type, dry_run, Box::new(SystemRunner)))
    }

    /// Builds a context around already-loaded settings and an explicit process runner.
    pub fn with_runner(
        base_dir: PathBuf,
        settings: Settings,
        build_type: BuildType,
        dry_run: bool,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let registry = ProjectRegistry::index(&settings.projects);
        Self {
            base_dir,
            settings,
            registry,
            build_type,
            dry_run,
            runner,
        }
    }

    pub fn composer(&self) -> CommandComposer<'_> {
        CommandComposer::new(&self.settings, &self.registry, &self.base_dir)
    }
}

/// Checks every `neededCommands` entry before any work begins.
pub fn validate_dependencies(ctx: &AppContext) -> Result<()> {
    executor::validate_commands_exist(ctx.runner.as_ref(), &ctx.settings.config.needed_commands)
        .context("A required tool is missing. Install it or remove it from 'neededCommands'.")
}

/// Composes the plan for `action` on `name`, without running anything.
pub fn compose(ctx: &AppContext, action: Action, name: &str) -> Result<CommandPlan> {
    let plan = ctx.composer().compose(action, name, ctx.build_type)?;
    Ok(plan)
}

/// The full invocation sequence: validate tools, compose, then execute in order.
pub fn compose_and_execute(ctx: &mut AppContext, action: Action, name: &str) -> Result<()> {
    validate_dependencies(ctx)?;
    let plan = compose(ctx, action, name)?;
    task_executor::execute_plan(&plan, ctx.runner.as_mut(), ctx.dry_run)
}
