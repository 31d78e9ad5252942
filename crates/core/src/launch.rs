//! Starting the companion application as a child process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use log::info;

use crate::error::{Error, Result};
use crate::platform::{HostOs, PlatformKind};
use crate::resolver::resolve;
use crate::settings::SettingsStore;

/// Flag telling the companion application it was started by a plugin host.
pub const PLUGIN_MODE_FLAG: &str = "-plugin:WS";

/// macOS launcher used for application bundles.
const MAC_OPEN_COMMAND: &str = "open";

/// The exact program and arguments a launch will run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Whether the launch goes through the macOS `open` indirection.
    pub bundle_open: bool,
}

impl LaunchPlan {
    /// `open -n -a <bundle> --args <descriptor> -plugin:WS`: a new instance, arguments forwarded
    /// to the bundle's main executable.
    fn bundle(bundle: &Path, descriptor: &Path) -> Self {
        Self {
            program: PathBuf::from(MAC_OPEN_COMMAND),
            args: vec![
                OsString::from("-n"),
                OsString::from("-a"),
                bundle.as_os_str().to_os_string(),
                OsString::from("--args"),
                descriptor.as_os_str().to_os_string(),
                OsString::from(PLUGIN_MODE_FLAG),
            ],
            bundle_open: true,
        }
    }

    fn direct(executable: PathBuf, descriptor: &Path) -> Self {
        Self {
            program: executable,
            args: vec![
                descriptor.as_os_str().to_os_string(),
                OsString::from(PLUGIN_MODE_FLAG),
            ],
            bundle_open: false,
        }
    }

    /// The arguments the companion application itself receives.
    pub fn application_args(&self) -> &[OsString] {
        let forwarded = self.args.len().saturating_sub(2);
        &self.args[forwarded..]
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        command
    }
}

/// Builds the launch plan without touching any process.
///
/// # Errors
///
/// - [`Error::UnsupportedPlatform`] when `host` has no launch convention
/// - [`Error::PathNotConfigured`] when the installation path is missing or invalid
/// - [`Error::ExecutableNotFound`] when no executable exists at the expected location
pub fn plan_launch(
    settings: &dyn SettingsStore,
    host: &HostOs,
    descriptor: &Path,
) -> Result<LaunchPlan> {
    if let HostOs::Other(os) = host {
        return Err(Error::unsupported_platform(os.clone()));
    }

    if !settings.is_installation_path_valid() {
        return Err(Error::PathNotConfigured);
    }
    let installation_path = settings
        .installation_path()
        .ok_or(Error::PathNotConfigured)?;

    let executable = resolve(&installation_path, host)?;

    match PlatformKind::detect(host, &installation_path) {
        Some(PlatformKind::MacAppBundle) => Ok(LaunchPlan::bundle(&executable, descriptor)),
        Some(_) => Ok(LaunchPlan::direct(executable, descriptor)),
        None => Err(Error::unsupported_platform(host.to_string())),
    }
}

/// Spawns the companion application for a project descriptor.
pub struct Launcher {
    settings: Arc<dyn SettingsStore>,
    host: HostOs,
}

impl Launcher {
    pub fn new(settings: Arc<dyn SettingsStore>, host: HostOs) -> Self {
        Self { settings, host }
    }

    pub fn plan(&self, descriptor: &Path) -> Result<LaunchPlan> {
        plan_launch(self.settings.as_ref(), &self.host, descriptor)
    }

    /// Starts the companion application with `descriptor`.
    ///
    /// The returned child is owned by the caller; it is neither waited on nor read from here.
    ///
    /// # Errors
    ///
    /// Any error of [`plan_launch`], or [`Error::Launch`] when the OS refuses to start
    /// the process.
    pub fn launch(&self, descriptor: &Path) -> Result<Child> {
        let plan = self.plan(descriptor)?;
        info!(
            "Launching COLT: {} {:?}",
            plan.program.display(),
            plan.args
        );

        plan.to_command().spawn().map_err(Error::Launch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::is_valid_installation;
    use std::fs;
    use tempfile::TempDir;

    struct FixedPath {
        path: Option<PathBuf>,
        host: HostOs,
    }

    impl SettingsStore for FixedPath {
        fn is_installation_path_valid(&self) -> bool {
            is_valid_installation(self.path.as_ref(), &self.host)
        }

        fn installation_path(&self) -> Option<PathBuf> {
            self.path.clone()
        }

        fn security_token(&self) -> Option<String> {
            None
        }

        fn invalidate_token(&self) -> Result<()> {
            Ok(())
        }

        fn set_security_token(&self, _token: String) -> Result<()> {
            Ok(())
        }
    }

    fn expected_app_args(descriptor: &Path) -> Vec<OsString> {
        vec![
            descriptor.as_os_str().to_os_string(),
            OsString::from(PLUGIN_MODE_FLAG),
        ]
    }

    #[test]
    fn test_mac_bundle_uses_open() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("COLT.app");
        fs::create_dir(&bundle).unwrap();
        let descriptor = dir.path().join("autogenerated.colt");
        let settings = FixedPath {
            path: Some(bundle.clone()),
            host: HostOs::MacOs,
        };

        let plan = plan_launch(&settings, &HostOs::MacOs, &descriptor).unwrap();

        assert!(plan.bundle_open);
        assert_eq!(plan.program, PathBuf::from("open"));
        let open_args: Vec<OsString> = vec![
            OsString::from("-n"),
            OsString::from("-a"),
            bundle.as_os_str().to_os_string(),
            OsString::from("--args"),
        ];
        assert_eq!(plan.args[..4].to_vec(), open_args);
        assert_eq!(plan.application_args().to_vec(), expected_app_args(&descriptor));
    }

    #[test]
    fn test_mac_binary_is_invoked_directly() {
        let dir = TempDir::new().unwrap();
        let binary = dir.path().join("colt");
        fs::write(&binary, b"").unwrap();
        let descriptor = dir.path().join("autogenerated.colt");
        let settings = FixedPath {
            path: Some(binary.clone()),
            host: HostOs::MacOs,
        };

        let plan = plan_launch(&settings, &HostOs::MacOs, &descriptor).unwrap();

        assert!(!plan.bundle_open);
        assert_eq!(plan.program, binary);
        assert_eq!(plan.args, expected_app_args(&descriptor));
    }

    #[test]
    fn test_linux_directory_is_invoked_directly() {
        let dir = TempDir::new().unwrap();
        let executable = dir.path().join("colt");
        fs::write(&executable, b"").unwrap();
        let descriptor = dir.path().join("autogenerated.colt");
        let settings = FixedPath {
            path: Some(dir.path().to_path_buf()),
            host: HostOs::Linux,
        };

        let plan = plan_launch(&settings, &HostOs::Linux, &descriptor).unwrap();

        assert!(!plan.bundle_open);
        assert_eq!(plan.program, executable);
        assert_eq!(plan.args, expected_app_args(&descriptor));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_refusal_is_a_launch_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let executable = dir.path().join("colt");
        fs::write(&executable, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&executable, fs::Permissions::from_mode(0o644)).unwrap();
        let settings: Arc<dyn SettingsStore> = Arc::new(FixedPath {
            path: Some(dir.path().to_path_buf()),
            host: HostOs::Linux,
        });
        let launcher = Launcher::new(settings, HostOs::Linux);

        let result = launcher.launch(&dir.path().join("autogenerated.colt"));

        match result {
            Err(Error::Launch(e)) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_windows_directory_without_exe() {
        let dir = TempDir::new().unwrap();
        let settings = FixedPath {
            path: Some(dir.path().to_path_buf()),
            host: HostOs::Windows,
        };

        let result = plan_launch(&settings, &HostOs::Windows, Path::new("project.colt"));
        assert!(matches!(result, Err(Error::ExecutableNotFound { .. })));
    }

    #[test]
    fn test_unconfigured_path_never_spawns() {
        let settings: Arc<dyn SettingsStore> = Arc::new(FixedPath {
            path: None,
            host: HostOs::Linux,
        });
        let launcher = Launcher::new(settings, HostOs::Linux);

        let result = launcher.launch(Path::new("project.colt"));
        assert!(matches!(result, Err(Error::PathNotConfigured)));
    }

    #[test]
    fn test_invalid_path_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let settings = FixedPath {
            path: Some(dir.path().join("missing")),
            host: HostOs::Linux,
        };

        let result = plan_launch(&settings, &HostOs::Linux, Path::new("project.colt"));
        assert!(matches!(result, Err(Error::PathNotConfigured)));
    }

    #[test]
    fn test_unsupported_host() {
        let settings = FixedPath {
            path: Some(PathBuf::from("/opt/colt")),
            host: HostOs::Other("beos".to_string()),
        };

        let result = plan_launch(
            &settings,
            &HostOs::Other("beos".to_string()),
            Path::new("project.colt"),
        );
        assert!(matches!(result, Err(Error::UnsupportedPlatform { .. })));
    }
}
