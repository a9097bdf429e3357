use crate::constants::BASE_DIR_ENV;
use crate::models::{Action, BuildType};
use clap::{Parser, Subcommand};
use colored::*;
use log::Level;
use std::io::Write;

pub mod dispatcher;
pub mod handlers;

/// ntt: builds and runs the C and Python sub-projects of a monorepo.
#[derive(Parser, Debug)]
#[command(
    name = "ntt",
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Build type used to select options and the build directory.
    #[arg(short = 't', long = "type", value_enum, default_value_t = BuildType::Debug, global = true)]
    pub build_type: BuildType,

    /// Directory holding `settings.json` and the sub-projects. Defaults to the current directory.
    #[arg(long, env = BASE_DIR_ENV, global = true)]
    pub base_dir: Option<String>,

    /// Print the composed commands without running them.
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate and build a C project.
    Build { project_name: String },
    /// Run a project: build and launch a C project, or sync and launch a Python one.
    Run { project_name: String },
    /// Build the test target of a C library.
    Test { project_name: String },
    /// Build and launch an example target.
    Example { example_name: String },
    /// List the names each action accepts.
    List {
        #[arg(value_enum)]
        action: Option<Action>,
    },
}

impl Commands {
    /// The action and target name of an executing subcommand; `None` for `list`.
    pub fn target(&self) -> Option<(Action, &str)> {
        match self {
            Self::Build { project_name } => Some((Action::Build, project_name.as_str())),
            Self::Run { project_name } => Some((Action::Run, project_name.as_str())),
            Self::Test { project_name } => Some((Action::Test, project_name.as_str())),
            Self::Example { example_name } => Some((Action::Example, example_name.as_str())),
            Self::List { .. } => None,
        }
    }
}

/// Initializes the global logger once for this process.
///
/// `--verbose` selects `debug`, otherwise `info`. `RUST_LOG` takes precedence when set.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let padded = format!("{:>7}", record.level());
            let level = match record.level() {
                Level::Error => padded.as_str().red(),
                Level::Warn => padded.as_str().yellow(),
                Level::Info => padded.as_str().green(),
                Level::Debug => padded.as_str().blue(),
                Level::Trace => padded.as_str().dimmed(),
            };
            writeln!(buf, "[{:>7}] - [{}] - {}", "ntt", level, record.args())
        })
        .try_init();

    if verbose {
        log::debug!("Verbose mode enabled.");
    }
    if let Err(e) = result {
        log::debug!("Logger already initialized: {}", e);
    }
}
