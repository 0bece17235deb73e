//! Error types shared by the bridges.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while turning a raw argument list into typed values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("expected {expected} argument(s), transport delivered {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("argument {position} cannot be converted to {target}: {reason}")]
    InvalidValue {
        position: usize,
        target: &'static str,
        reason: String,
    },
}

impl ConversionError {
    /// Creates an invalid value error for the argument at `position`.
    pub fn invalid_value(
        position: usize,
        target: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        ConversionError::InvalidValue {
            position,
            target,
            reason: reason.into(),
        }
    }
}

/// Fault reported by the underlying transport.
///
/// Carried as an ordinary value on the connection error signal, and used as
/// the failure type of transport registration calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl TransportError {
    /// Creates a transport error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Attaches a transport-specific error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    ConversionFailed,
    TransportFailed,
    DispatchFailed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::ConversionFailed => "CONVERSION_FAILED",
            ErrorCode::TransportFailed => "TRANSPORT_FAILED",
            ErrorCode::DispatchFailed => "DISPATCH_FAILED",
        };
        write!(f, "{}", s)
    }
}

/// Errors surfaced by the event and signal bridges.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// A required factory parameter was empty. Raised before any
    /// subscription exists.
    #[error("argument '{0}' must not be empty")]
    InvalidArgument(&'static str),

    /// A delivered value could not be converted. Terminates only the
    /// affected stream.
    #[error("event '{event}': {source}")]
    Conversion {
        event: String,
        #[source]
        source: ConversionError,
    },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("delivery context '{0}' is no longer accepting work")]
    Dispatch(String),
}

impl BridgeError {
    /// Creates a conversion error attributed to `event`.
    pub fn conversion(event: impl Into<String>, source: ConversionError) -> Self {
        BridgeError::Conversion {
            event: event.into(),
            source,
        }
    }

    /// Returns the category code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            BridgeError::Conversion { .. } => ErrorCode::ConversionFailed,
            BridgeError::Transport(_) => ErrorCode::TransportFailed,
            BridgeError::Dispatch(_) => ErrorCode::DispatchFailed,
        }
    }
}
