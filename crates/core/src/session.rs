//! The remote-control channel to a running companion application.

use std::fmt::{Display, Formatter};

use crate::error::SessionError;

/// Remote calls understood by the companion application.
///
/// Every call blocks until the response arrives, so callers must stay off any
/// UI-blocking thread.
pub trait RemoteSession: Send + Sync {
    /// Establishes that this host may talk to the companion application.
    ///
    /// Returns `Ok(false)` when the user or the remote side declines.
    fn authorize(&self) -> Result<bool, SessionError>;

    /// Fails with [`SessionError::InvalidAuthToken`] when `token` is unknown or expired.
    fn check_auth(&self, token: &str) -> Result<(), SessionError>;

    fn start_live(&self, token: &str) -> Result<(), SessionError>;

    fn start_production(&self, token: &str) -> Result<(), SessionError>;
}

/// Which remote run to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    Live,
    Production,
}

impl RemoteAction {
    /// Invokes the remote call bound to this action.
    pub fn invoke(self, session: &dyn RemoteSession, token: &str) -> Result<(), SessionError> {
        match self {
            RemoteAction::Live => session.start_live(token),
            RemoteAction::Production => session.start_production(token),
        }
    }

    pub fn mode(self) -> &'static str {
        match self {
            RemoteAction::Live => "live",
            RemoteAction::Production => "production",
        }
    }
}

impl Display for RemoteAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteAction::Live => formatter.write_str("Live"),
            RemoteAction::Production => formatter.write_str("Production"),
        }
    }
}
