//! Adapters - Implementations of port interfaces.
//!
//! - `converter` - Argument converters (serde_json)
//! - `dispatch` - Delivery contexts (worker thread, tokio task)
//! - `transport` - In-memory hub transport for tests and demos

pub mod converter;
pub mod dispatch;
pub mod transport;

pub use converter::JsonArgumentConverter;
pub use dispatch::{ThreadDispatcher, TokioDispatcher};
pub use transport::{InMemoryHub, InMemorySignal};
