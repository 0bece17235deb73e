//! EventDescriptor - immutable name + expected arity of a named hub event.

use std::fmt;

use super::BridgeError;

/// Describes one named event: what it is registered under and how many
/// arguments each delivery is expected to carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventDescriptor {
    name: String,
    arity: usize,
}

impl EventDescriptor {
    /// Creates a descriptor, rejecting an empty event name.
    pub fn new(name: impl Into<String>, arity: usize) -> Result<Self, BridgeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BridgeError::InvalidArgument("event_name"));
        }
        Ok(Self { name, arity })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}
