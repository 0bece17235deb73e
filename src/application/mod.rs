//! Application layer - the bridges that turn transport events into streams.
//!
//! Each bridge orchestrates domain types (observers, subscriptions) against
//! the ports a transport implements. Nothing here knows which transport or
//! dispatcher is plugged in.

pub mod arguments;
pub mod delegate_bridge;
pub mod delivery_context;
pub mod event_bridge;
pub mod pipeline;

pub use arguments::{ArityPolicy, HubArguments, Single, MAX_ARITY};
pub use delegate_bridge::{ConnectionSignalsExt, FnSignalSource, SignalEvent};
pub use delivery_context::{DeliveryContext, ObserveOn};
pub use event_bridge::{HubEvent, HubTransportExt};
pub use pipeline::{
    ConnectRequest, HubContext, IncomingError, IncomingInvocation, InvocationResult,
    OutgoingInvocation, PipelineEvents, SubjectEvent,
};
