// src/cli/handlers/build.rs

use crate::{cli::handlers::commons::{self, AppContext}, models::Action};
use anyhow::Result;

/// The main handler for the `build` command: generate, then build a C project.
pub fn handle(ctx: &mut AppContext, project_name: &str) -> Result<()> {
    if let Some(project) = ctx.registry.get(project_name) {
        log::info!(
            "Building project: \"{}\" of type: \"{}\" with build type: \"{}\"",
            project_name,
            project.kind,
            ctx.build_type
        );
    }
    commons::compose_and_execute(ctx, Action::Build, project_name)
}
