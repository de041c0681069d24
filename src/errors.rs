//! Error types for pulsarctl operations.

use crate::NamespaceNameParseError;

/// An error status returned by an admin or bookie endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The reason reported by the service, or the raw body when it carried none.
    pub reason: String,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code: {} reason: {}", self.code, self.reason)
    }
}

impl std::error::Error for RemoteError {}

/// Errors that can occur while running a pulsarctl command.
#[derive(Debug, thiserror::Error)]
pub enum CtlError {
    /// The positional resource name could not be parsed.
    #[error(transparent)]
    InvalidName(#[from] NamespaceNameParseError),

    /// A positional argument or flag value was missing or malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The group or verb is not known.
    #[error("unknown {scope} '{name}'. Available: {}", .available.join(", "))]
    UnknownCommand {
        /// What was being looked up, e.g. "command" or "namespaces command".
        scope: String,
        /// The name that was given.
        name: String,
        /// The names that would have been accepted.
        available: Vec<String>,
    },

    /// The verb flags could not be parsed.
    #[error("{0}")]
    Flags(#[from] getopts::Fail),

    /// The HTTP request could not be completed.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A JSON body could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML document could not be encoded or decoded.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// A service URL could not be parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing output or reading the config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CtlError {
    /// Returns the HTTP status code when the error came from a remote response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote(remote) => Some(remote.code),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// Result alias used throughout pulsarctl.
pub type Result<T> = std::result::Result<T, CtlError>;
