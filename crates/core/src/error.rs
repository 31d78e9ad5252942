use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The COLT installation path is not configured or does not point to a valid installation.")]
    PathNotConfigured,

    #[error("Can't locate the COLT executable at `{}`", .path)]
    ExecutableNotFound { path: String },

    #[error("Unsupported OS: {}", .os)]
    UnsupportedPlatform { os: String },

    #[error("Unable to start the COLT process: {}", .0)]
    Launch(#[source] std::io::Error),

    #[error("Can't write COLT project file to `{}`: {}", .path, .original)]
    Serialization {
        path: String,
        original: std::io::Error,
    },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn executable_not_found(path: impl Into<String>) -> Self {
        Self::ExecutableNotFound { path: path.into() }
    }

    pub fn unsupported_platform(os: impl Into<String>) -> Self {
        Self::UnsupportedPlatform { os: os.into() }
    }

    pub fn serialization_error(path: String, original: std::io::Error) -> Self {
        Self::Serialization { path, original }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }
}

/// Failures of a single call over the remote-control channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The companion application rejected the call with a domain error.
    #[error("{}", .0)]
    Remote(String),

    #[error("The security token was not recognized by COLT")]
    InvalidAuthToken,

    #[error("Transport error: {}", .0)]
    Transport(String),

    #[error("Malformed response from COLT: {}", .0)]
    Protocol(String),
}

impl From<std::io::Error> for SessionError {
    fn from(value: std::io::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Protocol(value.to_string())
    }
}
