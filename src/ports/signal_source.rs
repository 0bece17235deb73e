//! SignalSource port - Fixed add/remove handler pairs for lifecycle signals.
//!
//! Unlike named events, a fixed signal has one statically known payload
//! type and no name. The transport exposes one source per signal.

use std::sync::Arc;

use crate::domain::foundation::{HandlerId, StateChange, TransportError};

/// Handler attached to a fixed signal.
pub type SignalHandler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Port for one fixed signal.
pub trait SignalSource<T>: Send + Sync {
    /// Attach `handler`; it is invoked once per raised signal.
    fn add_handler(&self, handler: SignalHandler<T>) -> HandlerId;

    /// Detach a handler. Unknown ids are ignored.
    fn remove_handler(&self, id: HandlerId);
}

/// Lifecycle signals of a hub connection.
///
/// | Signal | Payload |
/// |--------|---------|
/// | closed | `()` |
/// | error | [`TransportError`] |
/// | received | raw message text |
/// | reconnecting | `()` |
/// | reconnected | `()` |
/// | state changed | [`StateChange`] |
pub trait ConnectionSignals: Send + Sync {
    fn closed(&self) -> Arc<dyn SignalSource<()>>;

    fn error(&self) -> Arc<dyn SignalSource<TransportError>>;

    fn received(&self) -> Arc<dyn SignalSource<String>>;

    fn reconnecting(&self) -> Arc<dyn SignalSource<()>>;

    fn reconnected(&self) -> Arc<dyn SignalSource<()>>;

    fn state_changed(&self) -> Arc<dyn SignalSource<StateChange>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that traits are object-safe
    #[allow(dead_code)]
    fn assert_source_object_safe(_: &dyn SignalSource<()>) {}

    #[allow(dead_code)]
    fn assert_signals_object_safe(_: &dyn ConnectionSignals) {}
}
