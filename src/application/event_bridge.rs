//! Event bridge: named, variadic hub events as typed observable sequences.
//!
//! # Event Flow
//!
//! ```text
//! hub.on::<(String, f64)>("priceUpdate")     (validates, registers nothing)
//!          │
//!          ▼  subscribe / stream
//! ┌────────────────────────┐
//! │ transport.register     │  one registration per subscription
//! └────────────────────────┘
//!          │  raw &[Value] per message
//!          ▼
//! ┌────────────────────────┐
//! │ arity check + decode   │  ArityPolicy, ArgumentConverter
//! └────────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────────┐
//! │ observer (maybe via a  │
//! │ DeliveryContext)       │
//! └────────────────────────┘
//!          │  dispose / drop / conversion error
//!          ▼
//!   transport.deregister     exactly once
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{BridgeError, ConversionError, EventDescriptor};
use crate::domain::reactive::{self, EventStream, FnObserver, Observer, Subscription, SubscriptionCore};
use crate::ports::{ArgumentConverter, ArgumentsHandler, HubTransport};

use super::arguments::{ArityPolicy, HubArguments, Single};
use super::delivery_context::{observe_on, DeliveryContext};

/// Cold observable over one named hub event.
///
/// Creating it registers nothing. Each [`subscribe`](Self::subscribe) or
/// [`stream`](Self::stream) call performs its own registration with the
/// transport; sharing one registration between consumers is left to
/// callers.
pub struct HubEvent<H, A> {
    transport: Arc<H>,
    descriptor: EventDescriptor,
    arity_policy: ArityPolicy,
    context: Option<DeliveryContext>,
    _shape: PhantomData<fn() -> A>,
}

impl<H, A> HubEvent<H, A>
where
    H: HubTransport,
    A: HubArguments,
{
    /// Creates the observable.
    ///
    /// # Errors
    ///
    /// `BridgeError::InvalidArgument` if `event_name` is empty.
    pub fn new(transport: Arc<H>, event_name: impl Into<String>) -> Result<Self, BridgeError> {
        let descriptor = EventDescriptor::new(event_name, A::ARITY)?;
        Ok(Self {
            transport,
            descriptor,
            arity_policy: ArityPolicy::default(),
            context: None,
            _shape: PhantomData,
        })
    }

    /// Delivers notifications on `context` instead of the transport thread.
    pub fn observe_on(mut self, context: DeliveryContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets how argument-count mismatches are handled.
    pub fn with_arity_policy(mut self, policy: ArityPolicy) -> Self {
        self.arity_policy = policy;
        self
    }

    pub fn descriptor(&self) -> &EventDescriptor {
        &self.descriptor
    }

    /// Registers with the transport and pushes decoded values to `observer`.
    ///
    /// A conversion failure is delivered as `on_error`, after which the
    /// registration is released and later messages are ignored.
    ///
    /// # Errors
    ///
    /// `BridgeError::Transport` if the transport refuses the registration.
    pub fn subscribe<O>(&self, observer: O) -> Result<Subscription, BridgeError>
    where
        O: Observer<A::Output> + 'static,
    {
        let core = SubscriptionCore::new();
        let observer = observe_on(
            Arc::new(observer) as Arc<dyn Observer<A::Output>>,
            self.context.as_ref(),
            &core,
        );
        let handler = self.handler(Arc::clone(&core), observer);

        let token = self.transport.register(self.descriptor.name(), handler)?;
        tracing::debug!(
            event = %self.descriptor.name(),
            arity = self.descriptor.arity(),
            subscription_id = %core.id(),
            token = %token,
            "Registered hub event handler"
        );

        let transport = Arc::clone(&self.transport);
        let event = self.descriptor.name().to_string();
        let subscription_id = core.id();
        core.arm(move || {
            transport.deregister(token);
            tracing::debug!(
                event = %event,
                subscription_id = %subscription_id,
                token = %token,
                "Deregistered hub event handler"
            );
        });

        Ok(Subscription::from_core(core))
    }

    /// Subscribes and exposes the sequence as a `Stream`.
    pub fn stream(&self) -> Result<EventStream<A::Output>, BridgeError> {
        let (observer, receiver) = reactive::channel();
        let subscription = self.subscribe(observer)?;
        Ok(EventStream::new(receiver, subscription))
    }

    fn handler(
        &self,
        core: Arc<SubscriptionCore>,
        observer: Arc<dyn Observer<A::Output>>,
    ) -> ArgumentsHandler {
        let converter = self.transport.converter();
        let policy = self.arity_policy;
        let event = self.descriptor.name().to_string();

        Arc::new(move |args: &[Value]| {
            if core.is_disposed() {
                tracing::trace!(event = %event, "Delivery after dispose ignored");
                return;
            }
            tracing::trace!(event = %event, args = args.len(), "Hub event delivered");

            match decode::<A, _>(args, &converter, policy) {
                // Re-checked: a concurrent delivery may have terminated meanwhile.
                Ok(value) if !core.is_disposed() => observer.on_next(value),
                Ok(_) => {}
                Err(source) => {
                    let terminated = core.try_terminate(|| {
                        tracing::warn!(
                            event = %event,
                            subscription_id = %core.id(),
                            error = %source,
                            "Hub event conversion failed, terminating subscription"
                        );
                        observer.on_error(BridgeError::conversion(event.clone(), source));
                    });
                    if !terminated {
                        tracing::trace!(event = %event, "Conversion failure after termination ignored");
                    }
                }
            }
        })
    }
}

fn decode<A, C>(
    args: &[Value],
    converter: &C,
    policy: ArityPolicy,
) -> Result<A::Output, ConversionError>
where
    A: HubArguments,
    C: ArgumentConverter,
{
    policy.check(A::ARITY, args.len())?;
    A::decode(args, converter)
}

impl<H, A> Clone for HubEvent<H, A> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            descriptor: self.descriptor.clone(),
            arity_policy: self.arity_policy,
            context: self.context.clone(),
            _shape: PhantomData,
        }
    }
}

impl<H, A> fmt::Debug for HubEvent<H, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubEvent")
            .field("descriptor", &self.descriptor)
            .field("arity_policy", &self.arity_policy)
            .field("context", &self.context)
            .finish()
    }
}

/// Factory methods for hub events on any shared transport.
///
/// # Example
///
/// ```ignore
/// let hub = Arc::new(InMemoryHub::new());
///
/// let mut prices = hub.on::<(String, f64)>("priceUpdate")?.stream()?;
/// let mut pings = hub.on_unit("ping")?.stream()?;
/// let mut notes = hub.on_value::<String>("note")?.stream()?;
/// ```
pub trait HubTransportExt<H: HubTransport> {
    /// Observable of `A::Output` for `event_name`.
    fn on<A: HubArguments>(&self, event_name: &str) -> Result<HubEvent<H, A>, BridgeError>;

    /// Observable of `()` for a payload-less event.
    fn on_unit(&self, event_name: &str) -> Result<HubEvent<H, ()>, BridgeError> {
        self.on::<()>(event_name)
    }

    /// Observable of a single bare value.
    fn on_value<T>(&self, event_name: &str) -> Result<HubEvent<H, Single<T>>, BridgeError>
    where
        Single<T>: HubArguments,
    {
        self.on::<Single<T>>(event_name)
    }

    /// Registers `callback` directly and returns the registration handle.
    ///
    /// Conversion failures are logged and end the registration.
    fn on_callback<A, F>(&self, event_name: &str, callback: F) -> Result<Subscription, BridgeError>
    where
        A: HubArguments,
        F: Fn(A::Output) + Send + Sync + 'static,
    {
        self.on::<A>(event_name)?
            .subscribe(FnObserver::<A::Output, F>::new(callback))
    }
}

impl<H: HubTransport> HubTransportExt<H> for Arc<H> {
    fn on<A: HubArguments>(&self, event_name: &str) -> Result<HubEvent<H, A>, BridgeError> {
        HubEvent::new(Arc::clone(self), event_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryHub;
    use crate::domain::foundation::{ErrorCode, TransportError};
    use crate::domain::reactive::SubscriptionState;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn hub() -> Arc<InMemoryHub> {
        Arc::new(InMemoryHub::new())
    }

    #[test]
    fn empty_event_name_is_rejected_before_registering() {
        let hub = hub();
        let err = hub.on::<(String,)>("").unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(hub.register_count(), 0);
    }

    #[test]
    fn factory_is_lazy() {
        let hub = hub();
        let event = hub.on::<(String, f64)>("priceUpdate").unwrap();

        assert_eq!(event.descriptor().name(), "priceUpdate");
        assert_eq!(event.descriptor().arity(), 2);
        assert_eq!(hub.register_count(), 0);
    }

    #[test]
    fn subscribe_then_dispose_registers_and_deregisters_once() {
        let hub = hub();
        let event = hub.on::<(String, f64)>("priceUpdate").unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();

        let subscription = event
            .subscribe(FnObserver::new(move |v: (String, f64)| sink.lock().unwrap().push(v)))
            .unwrap();
        assert_eq!(subscription.state(), SubscriptionState::Active);
        subscription.dispose();
        subscription.dispose();

        assert_eq!(hub.register_count(), 1);
        assert_eq!(hub.deregister_count(), 1);
        assert!(received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stream_yields_decoded_tuple() {
        let hub = hub();
        let mut prices = hub.on::<(String, f64)>("priceUpdate").unwrap().stream().unwrap();

        hub.deliver("priceUpdate", vec![json!("AAPL"), json!(193.2)]);

        let (symbol, price) = prices.next().await.unwrap().unwrap();
        assert_eq!(symbol, "AAPL");
        assert_eq!(price, 193.2);
    }

    #[tokio::test]
    async fn strict_policy_terminates_on_short_list() {
        let hub = hub();
        let mut prices = hub.on::<(String, f64)>("priceUpdate").unwrap().stream().unwrap();

        hub.deliver("priceUpdate", vec![json!("AAPL")]);
        hub.deliver("priceUpdate", vec![json!("AAPL"), json!(1.0)]);

        match prices.next().await.unwrap() {
            Err(BridgeError::Conversion { event, source }) => {
                assert_eq!(event, "priceUpdate");
                assert_eq!(
                    source,
                    ConversionError::ArityMismatch {
                        expected: 2,
                        actual: 1
                    }
                );
            }
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(prices.next().await.is_none());
        assert_eq!(hub.registration_count("priceUpdate"), 0);
        assert_eq!(hub.deregister_count(), 1);
    }

    #[tokio::test]
    async fn lenient_policy_fills_missing_with_default() {
        let hub = hub();
        let mut prices = hub
            .on::<(String, f64)>("priceUpdate")
            .unwrap()
            .with_arity_policy(ArityPolicy::Lenient)
            .stream()
            .unwrap();

        hub.deliver("priceUpdate", vec![json!("AAPL")]);
        hub.deliver("priceUpdate", vec![json!("MSFT"), json!(2.5), json!("extra")]);

        assert_eq!(prices.next().await.unwrap().unwrap(), ("AAPL".to_string(), 0.0));
        assert_eq!(prices.next().await.unwrap().unwrap(), ("MSFT".to_string(), 2.5));
    }

    #[tokio::test]
    async fn unit_and_single_shapes() {
        let hub = hub();
        let mut pings = hub.on_unit("ping").unwrap().stream().unwrap();
        let mut notes = hub.on_value::<String>("note").unwrap().stream().unwrap();

        hub.deliver("ping", vec![]);
        hub.deliver("note", vec![json!("hello")]);

        pings.next().await.unwrap().unwrap();
        assert_eq!(notes.next().await.unwrap().unwrap(), "hello");
    }

    #[test]
    fn transport_refusal_surfaces_synchronously() {
        let hub = hub();
        hub.fail_next_register(TransportError::new("not connected"));

        let err = hub.on_unit("ping").unwrap().subscribe(FnObserver::new(|_: ()| {})).unwrap_err();

        assert_eq!(err.code(), ErrorCode::TransportFailed);
        assert_eq!(hub.deregister_count(), 0);
    }

    #[test]
    fn on_callback_receives_values_until_dropped() {
        let hub = hub();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let subscription = hub
            .on_callback::<Single<i64>, _>("count", move |n| sink.lock().unwrap().push(n))
            .unwrap();
        hub.deliver("count", vec![json!(1)]);
        drop(subscription);
        hub.deliver("count", vec![json!(2)]);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(hub.deregister_count(), 1);
    }

    #[test]
    fn conversion_error_stops_later_deliveries() {
        let hub = hub();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let subscription = hub
            .on_callback::<Single<u32>, _>("count", move |n| sink.lock().unwrap().push(n))
            .unwrap();
        hub.deliver("count", vec![json!("bad")]);
        hub.deliver("count", vec![json!(3)]);

        assert!(seen.lock().unwrap().is_empty());
        assert!(subscription.is_disposed());
        assert_eq!(hub.deregister_count(), 1);
    }

    #[test]
    fn concurrent_conversion_failures_terminate_once() {
        let hub = hub();
        let errors = Arc::new(AtomicUsize::new(0));

        struct CountErrors(Arc<AtomicUsize>);

        impl Observer<u32> for CountErrors {
            fn on_next(&self, _: u32) {}

            fn on_error(&self, _: BridgeError) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let subscription = hub
            .on_value::<u32>("count")
            .unwrap()
            .subscribe(CountErrors(errors.clone()))
            .unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let hub = &hub;
                scope.spawn(move || {
                    for _ in 0..50 {
                        hub.deliver("count", vec![json!("bad")]);
                    }
                });
            }
        });

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert!(subscription.is_disposed());
        assert_eq!(hub.deregister_count(), 1);
    }
}
