//! COLT Bridge Core Library
//!
//! This crate launches the COLT companion application from a host process and
//! drives its remote-control protocol: exporting a project descriptor, resolving
//! and spawning the platform-specific executable, and running authenticated
//! live or production sessions with their outcome reported back to the host.
//!
//! # Key Features
//!
//! - **Executable Resolution**: macOS bundles and binaries, Windows and Linux installations
//! - **Process Launching**: Platform-specific argument conventions, including `open` for bundles
//! - **Project Export**: Writing the `autogenerated.colt` descriptor
//! - **Remote Runs**: Authorization, token validation and background execution with reporting
//! - **Settings**: YAML-backed installation path and security token storage
//!
//! # Examples
//!
//! Resolving the executable of a Linux installation:
//!
//! ```no_run
//! use std::path::Path;
//! use colt_bridge_core::platform::HostOs;
//! use colt_bridge_core::resolver::resolve;
//!
//! let executable = resolve(Path::new("/opt/colt"), &HostOs::current())?;
//! println!("COLT lives at {}", executable.display());
//! # Ok::<(), colt_bridge_core::error::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod file_handling;
pub mod launch;
pub mod notifier;
pub mod platform;
pub mod project;
pub mod resolver;
pub mod rpc;
pub mod session;
pub mod settings;
