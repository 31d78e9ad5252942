//! The work behind each `coltctl` subcommand.

use std::env;
use std::path::PathBuf;
use std::process::Child;
use std::sync::Arc;

use colt_bridge_core::config::{self, Settings};
use colt_bridge_core::error::Result;
use colt_bridge_core::executor::{ExecutorOptions, RemoteActionExecutor};
use colt_bridge_core::launch::Launcher;
use colt_bridge_core::notifier::Notifier;
use colt_bridge_core::platform::HostOs;
use colt_bridge_core::project::{
    export_project, ExportRequest, LocalProject, ProjectDescriptor, XmlDescriptorWriter,
};
use colt_bridge_core::rpc::JsonLineSession;
use colt_bridge_core::session::RemoteAction;
use colt_bridge_core::settings::FileSettingsStore;
use log::{debug, info};

use crate::cli_args::{ConfigArgs, ExportArgs};

/// Opens the settings store at the given (or default) path for the current OS.
pub fn open_settings(settings_path_arg: &Option<String>) -> Result<Arc<FileSettingsStore>> {
    let settings_path = config::get_settings_path(settings_path_arg);
    debug!("Settings path: `{}`", settings_path);

    Ok(Arc::new(FileSettingsStore::open(
        settings_path,
        HostOs::current(),
    )?))
}

/// Writes `autogenerated.colt` into the project directory.
pub fn export_descriptor(args: &ExportArgs) -> Result<ProjectDescriptor> {
    let project_dir = match &args.project_dir {
        Some(project_dir) => project_dir.clone(),
        None => env::current_dir()?,
    };

    let project = match &args.name {
        Some(name) => LocalProject::new(project_dir, name.clone()),
        None => LocalProject::from_dir(project_dir),
    };

    let request = ExportRequest {
        name: None,
        main_document: args.main_document.clone(),
        launcher: args.launcher.into(),
    };

    export_project(&project, request, &XmlDescriptorWriter)
}

/// Exports the project and starts COLT with the fresh descriptor.
///
/// The child is left running; COLT outlives `coltctl`.
pub fn launch(settings: Arc<FileSettingsStore>, args: &ExportArgs) -> Result<Child> {
    let descriptor = export_descriptor(args)?;
    let launcher = Launcher::new(settings, HostOs::current());

    let child = launcher.launch(&descriptor.path)?;
    info!(
        "Started COLT (pid {}) with `{}` launcher",
        child.id(),
        descriptor.launcher
    );

    Ok(child)
}

/// Applies the requested changes and returns the resulting settings.
pub fn configure(store: &FileSettingsStore, args: &ConfigArgs) -> Result<Settings> {
    let has_changes =
        args.installation_path.is_some() || args.rpc_port.is_some() || args.forget_token;

    if has_changes {
        store.update(|settings| {
            if let Some(installation_path) = &args.installation_path {
                settings.installation_path = Some(installation_path.clone());
            }
            if let Some(rpc_port) = args.rpc_port {
                settings.rpc_port = rpc_port;
            }
            if args.forget_token {
                settings.security_token = None;
            }
        })?;
    }

    Ok(store.snapshot())
}

/// Human-readable summary of the settings, with the token masked.
pub fn describe_settings(settings: &Settings, settings_path: &str) -> String {
    let installation_path = settings
        .expanded_installation_path()
        .map(|path: PathBuf| path.display().to_string())
        .unwrap_or_else(|| "<not configured>".to_string());
    let token = if settings.security_token.is_some() {
        "<stored>"
    } else {
        "<none>"
    };

    format!(
        "Settings file: {settings_path}\nInstallation path: {installation_path}\nRemote control: {}\nSecurity token: {token}",
        settings.rpc_address()
    )
}

/// Runs a remote action against the running COLT and waits for its outcome.
///
/// Returns whether the run succeeded; a cancelled authorization counts as success.
pub fn run_remote(
    settings: Arc<FileSettingsStore>,
    notifier: Arc<dyn Notifier>,
    action: RemoteAction,
) -> Result<bool> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let snapshot = settings.snapshot();
    let session = Arc::new(JsonLineSession::new(
        snapshot.rpc_address(),
        settings.clone(),
        notifier.clone(),
    ));
    let executor = RemoteActionExecutor::new(session, settings, notifier, runtime.handle().clone())
        .with_options(ExecutorOptions::from(&snapshot));

    let dispatch = executor.run(action);
    let outcome = runtime.block_on(dispatch.outcome());
    debug!("{action} run finished with {outcome:?}");

    Ok(outcome.map_or(true, |outcome| outcome.is_success()))
}
