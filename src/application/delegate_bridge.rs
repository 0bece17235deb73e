//! Delegate bridge: fixed add/remove signals as observable sequences.
//!
//! A fixed signal has no name and no variadic payload, so nothing is
//! decoded: the handler attached on subscribe forwards the payload as is.
//! Subscribe/dispose follow the same lifecycle as the event bridge, one
//! `add_handler` per subscription and the paired `remove_handler` exactly
//! once.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::foundation::{BridgeError, HandlerId, StateChange, TransportError};
use crate::domain::reactive::{self, EventStream, Observer, Subscription, SubscriptionCore};
use crate::ports::{ConnectionSignals, SignalHandler, SignalSource};

use super::delivery_context::{observe_on, DeliveryContext};

/// Cold observable over one fixed signal.
pub struct SignalEvent<T> {
    signal: &'static str,
    source: Arc<dyn SignalSource<T>>,
    context: Option<DeliveryContext>,
}

impl<T> SignalEvent<T>
where
    T: Send + 'static,
{
    /// Creates the observable. `signal` names it in logs.
    pub fn new(signal: &'static str, source: Arc<dyn SignalSource<T>>) -> Self {
        Self {
            signal,
            source,
            context: None,
        }
    }

    /// Builds a signal from a bare add/remove pair.
    ///
    /// # Errors
    ///
    /// `BridgeError::InvalidArgument` if `signal` is empty.
    pub fn from_fns<Add, Remove>(
        signal: &'static str,
        add: Add,
        remove: Remove,
    ) -> Result<Self, BridgeError>
    where
        Add: Fn(SignalHandler<T>) -> HandlerId + Send + Sync + 'static,
        Remove: Fn(HandlerId) + Send + Sync + 'static,
    {
        if signal.is_empty() {
            return Err(BridgeError::InvalidArgument("signal"));
        }
        Ok(Self::new(signal, Arc::new(FnSignalSource::new(add, remove))))
    }

    /// Delivers notifications on `context` instead of the transport thread.
    pub fn observe_on(mut self, context: DeliveryContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn signal(&self) -> &'static str {
        self.signal
    }

    /// Attaches a handler that forwards each raised payload to `observer`.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<T> + 'static,
    {
        let core = SubscriptionCore::new();
        let observer = observe_on(
            Arc::new(observer) as Arc<dyn Observer<T>>,
            self.context.as_ref(),
            &core,
        );

        let guard = Arc::clone(&core);
        let signal = self.signal;
        let handler: SignalHandler<T> = Arc::new(move |payload: T| {
            if guard.is_disposed() {
                return;
            }
            tracing::trace!(signal = signal, "Signal raised");
            observer.on_next(payload);
        });

        let id = self.source.add_handler(handler);
        tracing::debug!(signal = signal, subscription_id = %core.id(), "Signal handler added");

        let source = Arc::clone(&self.source);
        let subscription_id = core.id();
        core.arm(move || {
            source.remove_handler(id);
            tracing::debug!(signal = signal, subscription_id = %subscription_id, "Signal handler removed");
        });

        Subscription::from_core(core)
    }

    /// Subscribes and exposes the signal as a `Stream`.
    pub fn stream(&self) -> EventStream<T> {
        let (observer, receiver) = reactive::channel();
        let subscription = self.subscribe(observer);
        EventStream::new(receiver, subscription)
    }
}

impl<T> Clone for SignalEvent<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal,
            source: Arc::clone(&self.source),
            context: self.context.clone(),
        }
    }
}

impl<T> fmt::Debug for SignalEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalEvent")
            .field("signal", &self.signal)
            .field("context", &self.context)
            .finish()
    }
}

/// [`SignalSource`] over a pair of closures.
pub struct FnSignalSource<T, Add, Remove> {
    add: Add,
    remove: Remove,
    _payload: PhantomData<fn(T)>,
}

impl<T, Add, Remove> FnSignalSource<T, Add, Remove>
where
    Add: Fn(SignalHandler<T>) -> HandlerId + Send + Sync,
    Remove: Fn(HandlerId) + Send + Sync,
{
    pub fn new(add: Add, remove: Remove) -> Self {
        Self {
            add,
            remove,
            _payload: PhantomData,
        }
    }
}

impl<T, Add, Remove> SignalSource<T> for FnSignalSource<T, Add, Remove>
where
    Add: Fn(SignalHandler<T>) -> HandlerId + Send + Sync,
    Remove: Fn(HandlerId) + Send + Sync,
{
    fn add_handler(&self, handler: SignalHandler<T>) -> HandlerId {
        (self.add)(handler)
    }

    fn remove_handler(&self, id: HandlerId) {
        (self.remove)(id)
    }
}

/// Observable views of a connection's lifecycle signals.
///
/// Transport faults arrive as values on `error_events`; they never
/// terminate other streams.
pub trait ConnectionSignalsExt {
    fn closed_events(&self) -> SignalEvent<()>;

    fn error_events(&self) -> SignalEvent<TransportError>;

    fn received_events(&self) -> SignalEvent<String>;

    fn reconnecting_events(&self) -> SignalEvent<()>;

    fn reconnected_events(&self) -> SignalEvent<()>;

    fn state_changed_events(&self) -> SignalEvent<StateChange>;
}

impl<C> ConnectionSignalsExt for C
where
    C: ConnectionSignals + ?Sized,
{
    fn closed_events(&self) -> SignalEvent<()> {
        SignalEvent::new("closed", self.closed())
    }

    fn error_events(&self) -> SignalEvent<TransportError> {
        SignalEvent::new("error", self.error())
    }

    fn received_events(&self) -> SignalEvent<String> {
        SignalEvent::new("received", self.received())
    }

    fn reconnecting_events(&self) -> SignalEvent<()> {
        SignalEvent::new("reconnecting", self.reconnecting())
    }

    fn reconnected_events(&self) -> SignalEvent<()> {
        SignalEvent::new("reconnected", self.reconnected())
    }

    fn state_changed_events(&self) -> SignalEvent<StateChange> {
        SignalEvent::new("state_changed", self.state_changed())
    }
}
