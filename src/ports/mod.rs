//! Ports - Interfaces for the external transport.
//!
//! The transport is an external collaborator; these ports describe only the
//! slice of it that the bridges observe. Adapters implement them.
//!
//! ## Named Events
//!
//! - `HubTransport` - register/deregister handlers under an event name
//! - `ArgumentConverter` - decode one raw argument into a target type
//!
//! ## Fixed Signals
//!
//! - `SignalSource` - add/remove pair for one lifecycle signal
//! - `ConnectionSignals` - the lifecycle signals of a connection
//!
//! ## Delivery
//!
//! - `Dispatcher` - explicit execution context for redispatched emissions

mod argument_converter;
mod dispatcher;
mod hub_transport;
mod signal_source;

pub use argument_converter::ArgumentConverter;
pub use dispatcher::{Dispatcher, Job};
pub use hub_transport::{ArgumentsHandler, HubTransport};
pub use signal_source::{ConnectionSignals, SignalHandler, SignalSource};
