//! Orchestration of a single remote run: authorize, validate the token, execute, report.
//!
//! Authorization and token validation run on the calling thread. The remote run
//! itself is scheduled on a tokio runtime after a short delay, and its outcome is
//! reported exactly once through the [`Notifier`]. Nothing is reported when the
//! user cancels the authorization prompt.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::{Settings, DEFAULT_START_DELAY_MS, DEFAULT_TOKEN_REFRESH_LIMIT};
use crate::error::SessionError;
use crate::notifier::Notifier;
use crate::session::{RemoteAction, RemoteSession};
use crate::settings::SettingsStore;

pub const AUTHORIZATION_PROMPT: &str =
    "This plugin needs an authorization from the COLT application.";
const RETRY_OPTIONS: [&str; 2] = ["Try again", "Cancel"];
const RETRY_CHOICE: usize = 0;

/// Terminal result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Success,
    RemoteFailure(String),
    TransportFailure(String),
    AuthDenied,
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SessionOutcome::Success)
    }
}

impl From<SessionError> for SessionOutcome {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::Remote(message) => SessionOutcome::RemoteFailure(message),
            SessionError::InvalidAuthToken => SessionOutcome::AuthDenied,
            SessionError::Transport(_) | SessionError::Protocol(_) => {
                SessionOutcome::TransportFailure(value.to_string())
            }
        }
    }
}

/// What [`RemoteActionExecutor::run`] did with the request.
#[derive(Debug)]
pub enum Dispatch {
    /// The user cancelled the authorization prompt. Nothing was reported.
    Cancelled,
    /// The run ended before any remote execution; the outcome was already reported.
    Completed(SessionOutcome),
    /// The remote run was handed to the runtime; it reports its own outcome.
    Scheduled(JoinHandle<SessionOutcome>),
}

impl Dispatch {
    /// Waits for the terminal outcome, `None` when cancelled.
    pub async fn outcome(self) -> Option<SessionOutcome> {
        match self {
            Dispatch::Cancelled => None,
            Dispatch::Completed(outcome) => Some(outcome),
            // Only a runtime shutdown or a panicking notifier ends the supervisor early.
            Dispatch::Scheduled(handle) => Some(handle.await.unwrap_or_else(|e| {
                error!("COLT run supervisor ended abnormally: {e}");
                SessionOutcome::TransportFailure(e.to_string())
            })),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Delay before the first remote call, letting the host UI settle.
    pub start_delay: Duration,
    /// How many rejected tokens are re-authorized before giving up.
    pub token_refresh_limit: u32,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(DEFAULT_START_DELAY_MS),
            token_refresh_limit: DEFAULT_TOKEN_REFRESH_LIMIT,
        }
    }
}

impl From<&Settings> for ExecutorOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            start_delay: settings.start_delay(),
            token_refresh_limit: settings.token_refresh_limit,
        }
    }
}

pub struct RemoteActionExecutor {
    session: Arc<dyn RemoteSession>,
    settings: Arc<dyn SettingsStore>,
    notifier: Arc<dyn Notifier>,
    runtime: Handle,
    options: ExecutorOptions,
}

impl RemoteActionExecutor {
    pub fn new(
        session: Arc<dyn RemoteSession>,
        settings: Arc<dyn SettingsStore>,
        notifier: Arc<dyn Notifier>,
        runtime: Handle,
    ) -> Self {
        Self {
            session,
            settings,
            notifier,
            runtime,
            options: ExecutorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecutorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run_live(&self) -> Dispatch {
        self.run(RemoteAction::Live)
    }

    pub fn run_production(&self) -> Dispatch {
        self.run(RemoteAction::Production)
    }

    /// Runs `requested` through the authorization flow and schedules it.
    ///
    /// A declined authorization the user retries, and a token the companion
    /// application rejects, both restart the flow as a live run.
    pub fn run(&self, requested: RemoteAction) -> Dispatch {
        let mut action = requested;
        let mut token_refreshes = 0;

        loop {
            debug!("{action} run: authorizing");
            if !self.authorize() {
                if !self.retry_chosen() {
                    info!("{action} run cancelled at the authorization prompt");
                    return Dispatch::Cancelled;
                }

                debug!("Retrying authorization as a live run");
                action = RemoteAction::Live;
                continue;
            }

            debug!("{action} run: validating token");
            let token = self.settings.security_token().unwrap_or_default();
            match self.session.check_auth(&token) {
                Ok(()) => {}
                Err(SessionError::InvalidAuthToken) => {
                    if token_refreshes >= self.options.token_refresh_limit {
                        warn!("Security token rejected {token_refreshes} times, giving up");
                        return self.complete(action, SessionOutcome::AuthDenied);
                    }
                    token_refreshes += 1;

                    if let Err(e) = self.settings.invalidate_token() {
                        warn!("Failed to persist the invalidated token: {e}");
                    }
                    action = RemoteAction::Live;
                    continue;
                }
                Err(e) => {
                    error!("Token validation failed: {e}");
                    return self.complete(action, SessionOutcome::from(e));
                }
            }

            debug!("{action} run: scheduling remote execution");
            return Dispatch::Scheduled(self.schedule(action));
        }
    }

    fn authorize(&self) -> bool {
        match self.session.authorize() {
            Ok(authorized) => authorized,
            Err(e) => {
                warn!("Authorization with COLT failed: {e}");
                false
            }
        }
    }

    fn retry_chosen(&self) -> bool {
        self.notifier
            .prompt_choice(AUTHORIZATION_PROMPT, &RETRY_OPTIONS)
            == Some(RETRY_CHOICE)
    }

    fn complete(&self, action: RemoteAction, outcome: SessionOutcome) -> Dispatch {
        report(self.notifier.as_ref(), action, &outcome);
        Dispatch::Completed(outcome)
    }

    /// Spawns the delayed remote run and a supervisor that reports its outcome.
    ///
    /// The supervisor reports even when the run task itself panics.
    fn schedule(&self, action: RemoteAction) -> JoinHandle<SessionOutcome> {
        let notifier = Arc::clone(&self.notifier);
        let run = self.runtime.spawn(execute(
            action,
            Arc::clone(&self.session),
            Arc::clone(&self.settings),
            Arc::clone(&self.notifier),
            self.options.start_delay,
        ));

        self.runtime.spawn(async move {
            let outcome = match run.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("COLT {action} run crashed: {e}");
                    SessionOutcome::TransportFailure(e.to_string())
                }
            };

            report(notifier.as_ref(), action, &outcome);
            outcome
        })
    }
}

async fn execute(
    action: RemoteAction,
    session: Arc<dyn RemoteSession>,
    settings: Arc<dyn SettingsStore>,
    notifier: Arc<dyn Notifier>,
    start_delay: Duration,
) -> SessionOutcome {
    tokio::time::sleep(start_delay).await;
    notifier.notify_info(&format!("Starting {action} Session"));

    let token = settings.security_token().unwrap_or_default();
    let call = tokio::task::spawn_blocking(move || action.invoke(session.as_ref(), &token)).await;

    match call {
        Ok(Ok(())) => SessionOutcome::Success,
        Ok(Err(e)) => {
            if !matches!(e, SessionError::Remote(_)) {
                error!("COLT {action} run failed: {e}");
            }
            SessionOutcome::from(e)
        }
        Err(e) => {
            error!("COLT {action} run crashed: {e}");
            SessionOutcome::TransportFailure(e.to_string())
        }
    }
}

fn report(notifier: &dyn Notifier, action: RemoteAction, outcome: &SessionOutcome) {
    match outcome {
        SessionOutcome::Success => notifier.notify_info(&format!(
            "Launching in {} mode is successful",
            action.mode()
        )),
        SessionOutcome::RemoteFailure(message) => notifier.notify_error(&format!(
            "Can't start {action} Session with COLT: {message}"
        )),
        SessionOutcome::TransportFailure(message) => notifier.notify_error(&format!(
            "Starting {action} Session has failed: {message}"
        )),
        SessionOutcome::AuthDenied => notifier.notify_error(&format!(
            "Starting {action} Session has failed: COLT did not accept the security token"
        )),
    }
}
