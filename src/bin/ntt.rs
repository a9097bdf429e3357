// src/bin/ntt.rs

use clap::Parser;
use colored::*;
use ntt_manager::cli::{Cli, dispatcher, init_logging};

/// Entry point of `ntt`: sets up logging, parses arguments, dispatches to the matching
/// handler and reports any failure in one place.
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatcher::dispatch(cli) {
        log::debug!("Invocation failed: {:?}", e);
        if log::log_enabled!(log::Level::Error) {
            log::error!("{:#}", e);
        } else {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        }
        std::process::exit(1);
    }
}
