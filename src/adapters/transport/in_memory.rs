//! In-memory hub transport for testing and demos.
//!
//! Provides synchronous, deterministic delivery: `deliver` invokes every
//! matching handler on the calling thread before returning. Register and
//! deregister calls are counted so tests can assert the bridge's
//! one-registration-per-subscription contract.
//!
//! # Note
//!
//! This adapter is for tests and local wiring only. Real transports own
//! their connection lifecycle; this one never connects anywhere.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;

use crate::adapters::converter::JsonArgumentConverter;
use crate::domain::foundation::{
    ConnectionState, HandlerId, RegistrationToken, StateChange, TransportError,
};
use crate::ports::{ArgumentsHandler, ConnectionSignals, HubTransport, SignalHandler, SignalSource};

/// One fixed signal with an in-memory handler list.
pub struct InMemorySignal<T> {
    handlers: RwLock<Vec<(HandlerId, SignalHandler<T>)>>,
    added: AtomicUsize,
    removed: AtomicUsize,
}

impl<T: Clone> InMemorySignal<T> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            added: AtomicUsize::new(0),
            removed: AtomicUsize::new(0),
        }
    }

    /// Invokes every attached handler with `value`. Returns how many ran.
    pub fn raise(&self, value: T) -> usize {
        // Clone handlers to release the lock before invoking them
        let handlers: Vec<SignalHandler<T>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &handlers {
            handler(value.clone());
        }
        handlers.len()
    }

    /// Number of currently attached handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Total `add_handler` calls so far.
    pub fn add_count(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    /// Total `remove_handler` calls that removed something.
    pub fn remove_count(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }
}

impl<T: Clone> Default for InMemorySignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> SignalSource<T> for InMemorySignal<T> {
    fn add_handler(&self, handler: SignalHandler<T>) -> HandlerId {
        let id = HandlerId::new();
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, handler));
        self.added.fetch_add(1, Ordering::SeqCst);
        id
    }

    fn remove_handler(&self, id: HandlerId) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        if handlers.len() < before {
            self.removed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct Registration {
    token: RegistrationToken,
    handler: ArgumentsHandler,
}

/// In-memory hub for testing.
///
/// Features:
/// - Named event registration with synchronous delivery
/// - Fixed connection signals
/// - Register/deregister counters for assertions
/// - Injectable registration failure
///
/// # Example
///
/// ```ignore
/// let hub = Arc::new(InMemoryHub::new());
/// let mut prices = hub.on::<(String, f64)>("priceUpdate")?.stream()?;
///
/// hub.deliver("priceUpdate", vec![json!("AAPL"), json!(193.2)]);
/// assert_eq!(prices.next().await.unwrap()?, ("AAPL".to_string(), 193.2));
/// ```
pub struct InMemoryHub {
    registrations: RwLock<HashMap<String, Vec<Registration>>>,
    registered: AtomicUsize,
    deregistered: AtomicUsize,
    fail_next_register: Mutex<Option<TransportError>>,
    state: Mutex<ConnectionState>,
    closed: Arc<InMemorySignal<()>>,
    error: Arc<InMemorySignal<TransportError>>,
    received: Arc<InMemorySignal<String>>,
    reconnecting: Arc<InMemorySignal<()>>,
    reconnected: Arc<InMemorySignal<()>>,
    state_changed: Arc<InMemorySignal<StateChange>>,
}

impl InMemoryHub {
    /// Creates a hub with no registrations, in the `Disconnected` state.
    pub fn new() -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
            registered: AtomicUsize::new(0),
            deregistered: AtomicUsize::new(0),
            fail_next_register: Mutex::new(None),
            state: Mutex::new(ConnectionState::default()),
            closed: Arc::new(InMemorySignal::new()),
            error: Arc::new(InMemorySignal::new()),
            received: Arc::new(InMemorySignal::new()),
            reconnecting: Arc::new(InMemorySignal::new()),
            reconnected: Arc::new(InMemorySignal::new()),
            state_changed: Arc::new(InMemorySignal::new()),
        }
    }

    // === Delivery ===

    /// Delivers a named message to every handler registered for it.
    ///
    /// Returns the number of handlers invoked.
    pub fn deliver(&self, event_name: &str, args: Vec<Value>) -> usize {
        let handlers: Vec<ArgumentsHandler> = {
            let registrations = self
                .registrations
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            registrations
                .get(event_name)
                .map(|entries| entries.iter().map(|r| Arc::clone(&r.handler)).collect())
                .unwrap_or_default()
        };

        for handler in &handlers {
            handler(&args);
        }
        handlers.len()
    }

    /// Raises the closed signal and moves to `Disconnected`.
    pub fn raise_closed(&self) -> usize {
        self.transition(ConnectionState::Disconnected);
        self.closed.raise(())
    }

    /// Raises the error signal.
    pub fn raise_error(&self, error: TransportError) -> usize {
        self.error.raise(error)
    }

    /// Raises the received signal with a raw payload.
    pub fn raise_received(&self, payload: impl Into<String>) -> usize {
        self.received.raise(payload.into())
    }

    /// Raises the reconnecting signal and moves to `Reconnecting`.
    pub fn raise_reconnecting(&self) -> usize {
        self.transition(ConnectionState::Reconnecting);
        self.reconnecting.raise(())
    }

    /// Raises the reconnected signal and moves to `Connected`.
    pub fn raise_reconnected(&self) -> usize {
        self.transition(ConnectionState::Connected);
        self.reconnected.raise(())
    }

    /// Moves to `new_state`, raising state-changed if the state differs.
    pub fn transition(&self, new_state: ConnectionState) {
        let old_state = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, new_state)
        };
        if old_state != new_state {
            self.state_changed.raise(StateChange::new(old_state, new_state));
        }
    }

    // === Test Helpers ===

    /// Makes the next `register` call fail with `error`.
    pub fn fail_next_register(&self, error: TransportError) {
        *self
            .fail_next_register
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Total successful `register` calls.
    pub fn register_count(&self) -> usize {
        self.registered.load(Ordering::SeqCst)
    }

    /// Total `deregister` calls that removed a registration.
    pub fn deregister_count(&self) -> usize {
        self.deregistered.load(Ordering::SeqCst)
    }

    /// Number of live registrations for `event_name`.
    pub fn registration_count(&self, event_name: &str) -> usize {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_name)
            .map_or(0, Vec::len)
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn closed_signal(&self) -> &InMemorySignal<()> {
        &self.closed
    }

    pub fn error_signal(&self) -> &InMemorySignal<TransportError> {
        &self.error
    }
}

impl Default for InMemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

impl HubTransport for InMemoryHub {
    type Converter = JsonArgumentConverter;

    fn register(
        &self,
        event_name: &str,
        handler: ArgumentsHandler,
    ) -> Result<RegistrationToken, TransportError> {
        if let Some(error) = self
            .fail_next_register
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            return Err(error);
        }

        let token = RegistrationToken::new();
        self.registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event_name.to_string())
            .or_default()
            .push(Registration { token, handler });
        self.registered.fetch_add(1, Ordering::SeqCst);
        Ok(token)
    }

    fn deregister(&self, token: RegistrationToken) {
        let mut registrations = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut removed = false;
        registrations.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|r| r.token != token);
            removed |= entries.len() < before;
            !entries.is_empty()
        });

        if removed {
            self.deregistered.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn converter(&self) -> Self::Converter {
        JsonArgumentConverter::new()
    }
}

impl ConnectionSignals for InMemoryHub {
    fn closed(&self) -> Arc<dyn SignalSource<()>> {
        self.closed.clone()
    }

    fn error(&self) -> Arc<dyn SignalSource<TransportError>> {
        self.error.clone()
    }

    fn received(&self) -> Arc<dyn SignalSource<String>> {
        self.received.clone()
    }

    fn reconnecting(&self) -> Arc<dyn SignalSource<()>> {
        self.reconnecting.clone()
    }

    fn reconnected(&self) -> Arc<dyn SignalSource<()>> {
        self.reconnected.clone()
    }

    fn state_changed(&self) -> Arc<dyn SignalSource<StateChange>> {
        self.state_changed.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicBool;

    fn counting_handler(counter: Arc<AtomicUsize>) -> ArgumentsHandler {
        Arc::new(move |_: &[Value]| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn deliver_reaches_only_matching_event() {
        let hub = InMemoryHub::new();
        let counter = Arc::new(AtomicUsize::new(0));

        hub.register("a", counting_handler(counter.clone())).unwrap();

        assert_eq!(hub.deliver("a", vec![json!(1)]), 1);
        assert_eq!(hub.deliver("b", vec![json!(1)]), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deregister_removes_handler_and_counts() {
        let hub = InMemoryHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let token = hub.register("a", counting_handler(counter.clone())).unwrap();

        hub.deregister(token);
        hub.deregister(token);
        hub.deliver("a", vec![]);

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(hub.register_count(), 1);
        assert_eq!(hub.deregister_count(), 1);
        assert_eq!(hub.registration_count("a"), 0);
    }

    #[test]
    fn handler_may_deregister_during_delivery() {
        let hub = Arc::new(InMemoryHub::new());
        let token_slot: Arc<Mutex<Option<RegistrationToken>>> = Arc::new(Mutex::new(None));

        let hub_ref = hub.clone();
        let slot = token_slot.clone();
        let token = hub
            .register(
                "a",
                Arc::new(move |_: &[Value]| {
                    if let Some(token) = slot.lock().unwrap().take() {
                        hub_ref.deregister(token);
                    }
                }),
            )
            .unwrap();
        *token_slot.lock().unwrap() = Some(token);

        hub.deliver("a", vec![]);

        assert_eq!(hub.registration_count("a"), 0);
    }

    #[test]
    fn injected_failure_applies_once() {
        let hub = InMemoryHub::new();
        hub.fail_next_register(TransportError::new("offline"));

        assert!(hub.register("a", Arc::new(|_: &[Value]| {})).is_err());
        assert!(hub.register("a", Arc::new(|_: &[Value]| {})).is_ok());
        assert_eq!(hub.register_count(), 1);
    }

    #[test]
    fn signal_add_raise_remove() {
        let signal: InMemorySignal<()> = InMemorySignal::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let id = signal.add_handler(Arc::new(move |_: ()| flag.store(true, Ordering::SeqCst)));
        assert_eq!(signal.raise(()), 1);
        signal.remove_handler(id);

        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(signal.handler_count(), 0);
        assert_eq!(signal.add_count(), 1);
        assert_eq!(signal.remove_count(), 1);
    }

    #[test]
    fn transitions_raise_state_changed() {
        let hub = InMemoryHub::new();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        hub.state_changed()
            .add_handler(Arc::new(move |change: StateChange| sink.lock().unwrap().push(change)));

        hub.transition(ConnectionState::Connected);
        hub.transition(ConnectionState::Connected);
        hub.raise_reconnecting();

        let changes = changes.lock().unwrap();
        assert_eq!(
            *changes,
            vec![
                StateChange::new(ConnectionState::Disconnected, ConnectionState::Connected),
                StateChange::new(ConnectionState::Connected, ConnectionState::Reconnecting),
            ]
        );
    }
}
