// src/cli/handlers/run.rs

use crate::{cli::handlers::commons::{self, AppContext}, models::Action};
use anyhow::Result;

/// The main handler for the `run` command.
///
/// Python projects are synchronized and launched through their entrypoint; C projects are
/// generated, built and their `run` executable launched.
pub fn handle(ctx: &mut AppContext, project_name: &str) -> Result<()> {
    if let Some(project) = ctx.registry.get(project_name) {
        log::info!("Running {} project: \"{}\"", project.language, project_name);
    }
    commons::compose_and_execute(ctx, Action::Run, project_name)
}
