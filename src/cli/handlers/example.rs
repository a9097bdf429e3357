// src/cli/handlers/example.rs

use crate::{cli::handlers::commons::{self, AppContext}, models::Action};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, example_name: &str) -> Result<()> {
    if let Some(owner) = ctx.registry.example_owner(example_name) {
        log::info!(
            "Running example: \"{}\" from project: \"{}\"",
            example_name,
            owner.name
        );
    }
    commons::compose_and_execute(ctx, Action::Example, example_name)
}
