//! COLT Bridge CLI Library
//!
//! This crate provides `coltctl`, a terminal host for the COLT companion
//! application. It exports project descriptors, starts COLT, and triggers
//! live or production runs through the authenticated remote-control channel.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`commands`]: The work behind each subcommand
//! - [`notifier`]: Terminal notifications and prompts
//!
//! # Examples
//!
//! ```bash
//! # Point coltctl at the COLT installation
//! coltctl config --installation-path /Applications/COLT.app
//!
//! # Export the current directory as a project and start COLT with it
//! coltctl launch index.html
//!
//! # Start a live session in the running COLT
//! coltctl live
//!
//! # Start a production run
//! coltctl production
//! ```

pub mod cli_args;
pub mod commands;
pub mod notifier;
