//! ConnectionState enum and the StateChange payload of the state-changed signal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a hub connection, as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Reconnecting,
    #[default]
    Disconnected,
}

impl ConnectionState {
    /// Returns true if messages can currently flow.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
            ConnectionState::Reconnecting => "Reconnecting",
            ConnectionState::Disconnected => "Disconnected",
        };
        write!(f, "{}", s)
    }
}

/// Payload of the state-changed signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub old_state: ConnectionState,
    pub new_state: ConnectionState,
}

impl StateChange {
    pub fn new(old_state: ConnectionState, new_state: ConnectionState) -> Self {
        Self {
            old_state,
            new_state,
        }
    }
}
