use anyhow::{Result, anyhow};

use crate::{
    cli::{
        Cli, Commands,
        handlers::{self, commons::AppContext},
    },
    models::Action,
};

// --- Command Definition and Registry ---

/// Binds an action to the handler carrying it out.
struct CommandDefinition {
    action: Action,
    handler: fn(&mut AppContext, &str) -> Result<()>,
}

/// The single source of truth for the executing actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        action: Action::Build,
        handler: handlers::build::handle,
    },
    CommandDefinition {
        action: Action::Run,
        handler: handlers::run::handle,
    },
    CommandDefinition {
        action: Action::Test,
        handler: handlers::test::handle,
    },
    CommandDefinition {
        action: Action::Example,
        handler: handlers::example::handle,
    },
];

fn find_command(action: Action) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY.iter().find(|cmd| cmd.action == action)
}

/// Loads the invocation context and routes the parsed command to its handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut ctx = AppContext::load(cli.base_dir.as_deref(), cli.build_type, cli.dry_run)?;

    match &cli.command {
        Commands::List { action } => handlers::list::handle(&ctx, *action),
        command => {
            let (action, name) = command
                .target()
                .ok_or_else(|| anyhow!("Command {:?} has no target", command))?;
            let definition = find_command(action)
                .ok_or_else(|| anyhow!("No handler registered for '{}'", action))?;
            (definition.handler)(&mut ctx, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_executing_action_has_a_handler() {
        for action in Action::ALL {
            assert!(find_command(action).is_some(), "missing handler for {}", action);
        }
    }
}
