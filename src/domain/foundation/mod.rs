//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the event descriptor, connection lifecycle values
//! and the error taxonomy used by every bridge.

mod connection_state;
mod errors;
mod event_descriptor;
mod ids;

pub use connection_state::{ConnectionState, StateChange};
pub use errors::{BridgeError, ConversionError, ErrorCode, TransportError};
pub use event_descriptor::EventDescriptor;
pub use ids::{HandlerId, RegistrationToken, SubscriptionId};
