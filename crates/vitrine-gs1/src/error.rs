//! Error types for the GS1 registration client.

use serde::Serialize;

/// Longest raw upstream excerpt embedded in a registry error message.
pub const ERROR_EXCERPT_LEN: usize = 300;

/// Longest raw upstream excerpt embedded in a protocol error message.
pub const PROTOCOL_EXCERPT_LEN: usize = 500;

/// The five failure kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ValidationError,
    AuthFailure,
    TransportError,
    ProtocolError,
    RegistryError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::AuthFailure => "AuthFailure",
            Self::TransportError => "TransportError",
            Self::ProtocolError => "ProtocolError",
            Self::RegistryError => "RegistryError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GS1 client errors.
#[derive(Debug, thiserror::Error)]
pub enum Gs1Error {
    /// Missing or malformed input, rejected before any network call.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Credential exchange rejected or returned no usable token.
    #[error("authentication failed: {message}")]
    AuthFailure { message: String },

    /// Network failure reaching the registry.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Response body could not be parsed as expected.
    #[error("protocol error: {message}")]
    Protocol {
        message: String,
        /// Full raw response text for diagnostics.
        raw: String,
    },

    /// Registry responded and declined the operation.
    #[error("registry error ({status}): {message}")]
    Registry { status: u16, message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Gs1Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Protocol error whose message carries a truncated excerpt of `raw`.
    pub fn protocol(context: &str, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::Protocol {
            message: format!("{}: {}", context, excerpt(&raw, PROTOCOL_EXCERPT_LEN)),
            raw,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::Config { .. } => ErrorKind::ValidationError,
            Self::AuthFailure { .. } => ErrorKind::AuthFailure,
            Self::Transport { .. } => ErrorKind::TransportError,
            Self::Protocol { .. } => ErrorKind::ProtocolError,
            Self::Registry { .. } => ErrorKind::RegistryError,
        }
    }

    /// Human message without the kind prefix, for direct display.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::AuthFailure { message }
            | Self::Transport { message }
            | Self::Protocol { message, .. }
            | Self::Registry { message, .. }
            | Self::Config { message } => message,
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::Config { .. } => 2,
            Self::AuthFailure { .. } => 3,
            Self::Registry { .. } => 4,
            Self::Transport { .. } => 5,
            Self::Protocol { .. } => 6,
        }
    }
}

impl From<reqwest::Error> for Gs1Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Result type for GS1 operations.
pub type Gs1Result<T> = Result<T, Gs1Error>;
