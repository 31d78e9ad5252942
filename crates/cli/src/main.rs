use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colt_bridge_cli::cli_args::{Args, CommandKind};
use colt_bridge_cli::commands;
use colt_bridge_cli::notifier::TerminalNotifier;
use colt_bridge_core::error::Result;
use colt_bridge_core::session::RemoteAction;

/// Runs the requested subcommand, returning whether it succeeded.
fn execute() -> Result<bool> {
    let args = Args::parse();
    let settings = commands::open_settings(&args.settings_path)?;

    match &args.command {
        CommandKind::Export(export) => {
            let descriptor = commands::export_descriptor(export)?;
            println!("{}", descriptor.path.display());
        }
        CommandKind::Launch(export) => {
            // COLT keeps running after we exit, the child is not waited on
            let _child = commands::launch(settings, export)?;
        }
        CommandKind::Config(config) => {
            let current = commands::configure(&settings, config)?;
            println!("{}", commands::describe_settings(&current, settings.path()));
        }
        CommandKind::Live => {
            let notifier = Arc::new(TerminalNotifier::default());
            return commands::run_remote(settings, notifier, RemoteAction::Live);
        }
        CommandKind::Production => {
            let notifier = Arc::new(TerminalNotifier::default());
            return commands::run_remote(settings, notifier, RemoteAction::Production);
        }
    }

    Ok(true)
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
