//! JSON-lines remote session over TCP.
//!
//! Each call opens a connection to the companion application, writes one request
//! line and reads one response line:
//!
//! ```text
//! -> {"method":"checkAuth","params":{"token":"..."}}
//! <- {"result":null}
//! <- {"error":{"kind":"invalidAuthToken","message":"..."}}
//! ```

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::notifier::Notifier;
use crate::session::RemoteSession;
use crate::settings::SettingsStore;

/// Name this host announces when asking for a short code.
pub const CLIENT_NAME: &str = "colt-bridge";

pub const SHORT_CODE_PROMPT: &str = "Enter the authorization key displayed in COLT";

#[derive(Serialize, Debug)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
enum RpcRequest<'a> {
    RequestShortCode {
        client: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    ObtainAuthToken {
        short_code: &'a str,
    },
    CheckAuth {
        token: &'a str,
    },
    StartLive {
        token: &'a str,
    },
    StartProduction {
        token: &'a str,
    },
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
enum RpcResponse {
    Result(serde_json::Value),
    Error(RpcError),
}

#[derive(Deserialize, Debug)]
struct RpcError {
    kind: RpcErrorKind,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
enum RpcErrorKind {
    InvalidAuthToken,
    Remote,
    #[serde(other)]
    Unknown,
}

impl From<RpcError> for SessionError {
    fn from(value: RpcError) -> Self {
        match value.kind {
            RpcErrorKind::InvalidAuthToken => SessionError::InvalidAuthToken,
            RpcErrorKind::Remote => SessionError::Remote(value.message),
            RpcErrorKind::Unknown => SessionError::Protocol(value.message),
        }
    }
}

/// [`RemoteSession`] talking to the companion application's remote-control port.
pub struct JsonLineSession {
    address: String,
    settings: Arc<dyn SettingsStore>,
    notifier: Arc<dyn Notifier>,
}

impl JsonLineSession {
    pub fn new(
        address: impl Into<String>,
        settings: Arc<dyn SettingsStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            address: address.into(),
            settings,
            notifier,
        }
    }

    fn call<T: DeserializeOwned>(&self, request: &RpcRequest<'_>) -> Result<T, SessionError> {
        debug!("Sending COLT request to {}", self.address);
        let mut stream = TcpStream::connect(&self.address)?;

        let mut json = serde_json::to_string(request)?;
        json.push('\n');
        stream.write_all(json.as_bytes())?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(SessionError::Transport(
                "connection closed before a response was received".to_string(),
            ));
        }

        let response: RpcResponse = serde_json::from_str(&line)?;
        match response {
            RpcResponse::Result(value) => Ok(serde_json::from_value(value)?),
            RpcResponse::Error(error) => Err(error.into()),
        }
    }

    /// Short-code handshake: COLT displays a key, the user types it here, and the key
    /// is exchanged for a security token.
    fn obtain_token(&self) -> Result<bool, SessionError> {
        let displayed: bool = self.call(&RpcRequest::RequestShortCode {
            client: CLIENT_NAME,
        })?;
        if !displayed {
            return Ok(false);
        }

        let Some(short_code) = self
            .notifier
            .prompt_input(SHORT_CODE_PROMPT)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
        else {
            return Ok(false);
        };

        let token: String = match self.call(&RpcRequest::ObtainAuthToken {
            short_code: &short_code,
        }) {
            Ok(token) => token,
            Err(SessionError::InvalidAuthToken) | Err(SessionError::Remote(_)) => {
                return Ok(false)
            }
            Err(e) => return Err(e),
        };
        if token.is_empty() {
            return Ok(false);
        }

        if let Err(e) = self.settings.set_security_token(token) {
            warn!("Failed to store the COLT security token: {e}");
            return Ok(false);
        }

        Ok(true)
    }
}

impl RemoteSession for JsonLineSession {
    fn authorize(&self) -> Result<bool, SessionError> {
        if self.settings.security_token().is_some() {
            return Ok(true);
        }

        self.obtain_token()
    }

    fn check_auth(&self, token: &str) -> Result<(), SessionError> {
        self.call(&RpcRequest::CheckAuth { token })
    }

    fn start_live(&self, token: &str) -> Result<(), SessionError> {
        self.call(&RpcRequest::StartLive { token })
    }

    fn start_production(&self, token: &str) -> Result<(), SessionError> {
        self.call(&RpcRequest::StartProduction { token })
    }
}
