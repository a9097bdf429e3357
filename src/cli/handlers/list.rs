// src/cli/handlers/list.rs

use crate::{cli::handlers::commons::AppContext, core::paths, models::Action};
use anyhow::Result;
use colored::*;

/// The main handler for the `list` command.
/// Prints the names each action accepts, or only those of `action` when given.
pub fn handle(ctx: &AppContext, action: Option<Action>) -> Result<()> {
    let actions: Vec<Action> = match action {
        Some(action) => vec![action],
        None => Action::ALL.to_vec(),
    };

    println!(
        "\n--- {} '{}' ---",
        "Projects in".bold(),
        paths::display_path(&ctx.base_dir).yellow()
    );
    for action in actions {
        println!("{}", render_section(ctx, action));
    }
    Ok(())
}

fn render_section(ctx: &AppContext, action: Action) -> String {
    let names = ctx.registry.projects_eligible_for(action);
    let mut section = format!("  {}", format!("{}:", action).blue());
    if names.is_empty() {
        section.push_str(&format!("\n    {}", "(none)".dimmed()));
    }
    for name in names {
        section.push_str(&format!("\n    - {}", name.green()));
    }
    section
}
