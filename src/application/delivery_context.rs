//! Delivery-context redispatch.
//!
//! A [`DeliveryContext`] is an explicit, caller-supplied execution target.
//! When a bridge is given one, every notification of the subscription
//! (values, errors, completion) is handed to that context instead of
//! running on the transport's delivery thread. Without one, delivery is
//! inline.
//!
//! Ordering is inherited from the dispatcher: the [`Dispatcher`] contract
//! requires FIFO, one-at-a-time execution, so a single subscription's
//! notifications are never reordered.
//!
//! A notification still queued when its subscription is disposed is
//! dropped when the dispatcher gets to it.

use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::BridgeError;
use crate::domain::reactive::{Observer, SubscriptionCore};
use crate::ports::Dispatcher;

/// Handle to an execution context that notifications are marshalled onto.
#[derive(Clone)]
pub struct DeliveryContext {
    dispatcher: Arc<dyn Dispatcher>,
}

impl DeliveryContext {
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn from_dispatcher<D>(dispatcher: D) -> Self
    where
        D: Dispatcher + 'static,
    {
        Self::new(Arc::new(dispatcher))
    }

    pub fn name(&self) -> &str {
        self.dispatcher.name()
    }

    /// Wraps `observer` so that it is notified on this context.
    pub fn wrap<T>(&self, observer: Arc<dyn Observer<T>>) -> Arc<dyn Observer<T>>
    where
        T: Send + 'static,
    {
        Arc::new(ObserveOn {
            inner: observer,
            context: self.clone(),
            guard: None,
        })
    }

    fn run(&self, job: impl FnOnce() + Send + 'static) {
        if self.dispatcher.dispatch(Box::new(job)).is_err() {
            let error = BridgeError::Dispatch(self.dispatcher.name().to_string());
            tracing::warn!(
                code = %error.code(),
                error = %error,
                "Notification dropped"
            );
        }
    }
}

impl fmt::Debug for DeliveryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryContext")
            .field("name", &self.dispatcher.name())
            .finish()
    }
}

/// Applies an optional context to the observer of the subscription owned
/// by `core`. `None` leaves the observer untouched.
pub(crate) fn observe_on<T>(
    observer: Arc<dyn Observer<T>>,
    context: Option<&DeliveryContext>,
    core: &Arc<SubscriptionCore>,
) -> Arc<dyn Observer<T>>
where
    T: Send + 'static,
{
    match context {
        Some(context) => Arc::new(ObserveOn {
            inner: observer,
            context: context.clone(),
            guard: Some(Arc::clone(core)),
        }),
        None => observer,
    }
}

/// Observer decorator that redispatches each notification.
pub struct ObserveOn<T> {
    inner: Arc<dyn Observer<T>>,
    context: DeliveryContext,
    guard: Option<Arc<SubscriptionCore>>,
}

impl<T> ObserveOn<T>
where
    T: Send + 'static,
{
    fn forward(&self, notify: impl FnOnce(&dyn Observer<T>) + Send + 'static) {
        let inner = Arc::clone(&self.inner);
        let guard = self.guard.clone();
        self.context.run(move || {
            if guard.as_ref().map_or(false, |core| core.is_cancelled()) {
                tracing::trace!("Subscription disposed, queued notification dropped");
                return;
            }
            notify(inner.as_ref());
        });
    }
}

impl<T> Observer<T> for ObserveOn<T>
where
    T: Send + 'static,
{
    fn on_next(&self, value: T) {
        self.forward(move |inner| inner.on_next(value));
    }

    fn on_error(&self, error: BridgeError) {
        self.forward(move |inner| inner.on_error(error));
    }

    fn on_completed(&self) {
        self.forward(|inner| inner.on_completed());
    }
}
