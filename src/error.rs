//! Error types for the poppler MCP server

use crate::options::Violations;
use thiserror::Error;

/// Result type alias for the poppler MCP server
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the poppler MCP server
#[derive(Error, Debug)]
pub enum Error {
    /// One or more usage violations (unknown option, wrong type, option too
    /// new for the installed binary, missing output). Displayed as every
    /// violation message joined with `"; "`.
    #[error("{0}")]
    Usage(Violations),

    /// No binary directory was given and the platform ships no default
    #[error("{platform} poppler-util binaries are not provided, please pass the installation directory as a parameter to the Poppler instance.")]
    UnsupportedPlatform { platform: String },

    /// The binary does not exist under the configured directory
    #[error("Binary not found: {path}")]
    BinaryNotFound { path: String },

    /// The binary exists but could not be started
    #[error("Failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The binary's `-v` output did not contain a version triple
    #[error("Unable to determine the version of {binary} from its output: {output}")]
    VersionUnparseable { binary: String, output: String },

    /// The binary ran and exited unsuccessfully. The message is its own
    /// diagnostic text, unmodified.
    #[error("{message}")]
    Process {
        binary: String,
        code: Option<i32>,
        message: String,
    },

    /// Source could not be turned into an input
    #[error("Invalid source: {reason}")]
    InvalidSource { reason: String },

    /// Base64 decode error
    #[error("Invalid base64 data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Path access denied (outside allowed resource directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },
}

impl Error {
    /// Return an error message safe to send to clients.
    ///
    /// Usage and process errors are passed through verbatim so callers can
    /// correct their options or match known poppler error prefixes. Other
    /// internal details (paths, io errors) are omitted; full details should
    /// be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::Usage(violations) => violations.to_string(),
            Error::Process { message, .. } => message.clone(),
            Error::UnsupportedPlatform { .. } => self.to_string(),
            Error::BinaryNotFound { .. } => "poppler binary not found".to_string(),
            Error::Spawn { .. } => "Failed to start poppler binary".to_string(),
            Error::VersionUnparseable { .. } => {
                "Unable to determine poppler binary version".to_string()
            }
            Error::InvalidSource { reason } => format!("Invalid source: {}", reason),
            Error::Base64Decode(_) => "Invalid base64 data".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
        }
    }

    /// True for errors the caller can fix by changing options or output
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}
