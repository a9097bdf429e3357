use crate::{
    core::{
        composer::{CommandPlan, CommandStep},
        paths::display_path,
    },
    system::executor::CommandRunner,
};
use anyhow::{Context, Result};
use colored::*;

// --- Main Public Function ---

/// Runs every step of a composed plan in order, stopping at the first failure.
///
/// In dry-run mode the steps are only printed; the runner is never called.
pub fn execute_plan(plan: &CommandPlan, runner: &mut dyn CommandRunner, dry_run: bool) -> Result<()> {
    log::debug!(
        "Executing {} step(s) for '{}' ({}, dry run: {})",
        plan.steps.len(),
        plan.project,
        plan.action,
        dry_run
    );

    for (i, step) in plan.steps.iter().enumerate() {
        if dry_run {
            print_step(step, true);
            continue;
        }
        execute_step(step, runner).with_context(|| {
            format!(
                "Step {}/{} ({}) of '{}' failed.",
                i + 1,
                plan.steps.len(),
                step.kind,
                plan.project
            )
        })?;
    }
    Ok(())
}

// --- Execution Helpers ---

fn execute_step(step: &CommandStep, runner: &mut dyn CommandRunner) -> Result<()> {
    log::debug!("Running {} step: {}", step.kind, step);
    print_step(step, false);
    runner.run_command(&step.command, &step.cwd)?;
    Ok(())
}

fn print_step(step: &CommandStep, dry_run: bool) {
    if dry_run {
        println!(
            "{} {} {}",
            "·".dimmed(),
            step.command.green(),
            format!("(in {})", display_path(&step.cwd)).dimmed()
        );
    } else {
        println!("{} {}", "→".blue(), step.command.green());
        log::trace!("  cwd: {}", display_path(&step.cwd));
    }
}
