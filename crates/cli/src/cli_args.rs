//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap` crate.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colt_bridge_core::project::LauncherType;

/// Command-line arguments for the `coltctl` tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use colt_bridge_cli::cli_args::Args;
///
/// let args = Args::parse_from(["coltctl", "live"]);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(name = "coltctl", term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the settings YAML.
    ///
    /// If not provided, defaults to `~/.colt-bridge/settings.yml`.
    #[arg(long, short = 's', global = true)]
    pub settings_path: Option<String>,

    #[command(subcommand)]
    pub command: CommandKind,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Write the COLT project descriptor for a project.
    Export(ExportArgs),

    /// Export the project, then start COLT with it.
    Launch(ExportArgs),

    /// Start a live session in the running COLT.
    Live,

    /// Start a production run in the running COLT.
    Production,

    /// Show or change the stored settings.
    Config(ConfigArgs),
}

#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct ExportArgs {
    /// Project base directory. Defaults to the current directory.
    #[arg(long, short = 'd')]
    pub project_dir: Option<PathBuf>,

    /// Project name. Defaults to the name of the project directory.
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// How COLT presents the running project.
    #[arg(long, short = 'l', value_enum, default_value_t = LauncherArg::Browser)]
    pub launcher: LauncherArg,

    /// The main document of the project, e.g. `index.html`.
    pub main_document: String,
}

#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Path to the COLT installation (directory, executable or `.app` bundle).
    #[arg(long, short = 'i')]
    pub installation_path: Option<String>,

    /// Remote-control port of COLT.
    #[arg(long, short = 'p')]
    pub rpc_port: Option<u16>,

    /// Forget the stored security token.
    #[arg(long, action)]
    pub forget_token: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherArg {
    Browser,
    Standalone,
}

impl From<LauncherArg> for LauncherType {
    fn from(value: LauncherArg) -> Self {
        match value {
            LauncherArg::Browser => LauncherType::Browser,
            LauncherArg::Standalone => LauncherType::Standalone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_and_production() {
        let args = Args::parse_from(["coltctl", "live"]);
        assert!(args.settings_path.is_none());
        assert_eq!(args.command, CommandKind::Live);

        let args = Args::parse_from(["coltctl", "production"]);
        assert_eq!(args.command, CommandKind::Production);
    }

    #[test]
    fn test_export_defaults() {
        let args = Args::parse_from(["coltctl", "export", "index.html"]);

        assert_eq!(
            args.command,
            CommandKind::Export(ExportArgs {
                project_dir: None,
                name: None,
                launcher: LauncherArg::Browser,
                main_document: "index.html".to_string(),
            })
        );
    }

    #[test]
    fn test_launch_short_flags() {
        let args = Args::parse_from([
            "coltctl",
            "launch",
            "-d",
            "/work/game",
            "-n",
            "Game",
            "-l",
            "standalone",
            "main.html",
        ]);

        match args.command {
            CommandKind::Launch(export) => {
                assert_eq!(export.project_dir, Some(PathBuf::from("/work/game")));
                assert_eq!(export.name, Some("Game".to_string()));
                assert_eq!(LauncherType::from(export.launcher), LauncherType::Standalone);
                assert_eq!(export.main_document, "main.html");
            }
            other => panic!("Expected launch command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_settings_path() {
        let args = Args::parse_from(["coltctl", "live", "--settings-path", "/tmp/s.yml"]);
        assert_eq!(args.settings_path, Some("/tmp/s.yml".to_string()));
    }

    #[test]
    fn test_config_flags() {
        let args = Args::parse_from([
            "coltctl",
            "config",
            "--installation-path",
            "/Applications/COLT.app",
            "--rpc-port",
            "9001",
            "--forget-token",
        ]);

        assert_eq!(
            args.command,
            CommandKind::Config(ConfigArgs {
                installation_path: Some("/Applications/COLT.app".to_string()),
                rpc_port: Some(9001),
                forget_token: true,
            })
        );
    }

    #[test]
    fn test_missing_main_document_is_rejected() {
        assert!(Args::try_parse_from(["coltctl", "export"]).is_err());
    }
}
