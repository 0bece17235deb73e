//! Observer - the push side of an observable sequence.

use std::marker::PhantomData;

use crate::domain::foundation::BridgeError;

/// Receives the notifications of one subscription.
///
/// Transports may deliver from any thread, so observers must be
/// `Send + Sync`. A sequence delivers any number of `on_next` calls followed
/// by at most one terminal `on_error` or `on_completed`.
pub trait Observer<T>: Send + Sync {
    /// A new value was produced.
    fn on_next(&self, value: T);

    /// The sequence terminated with a failure.
    fn on_error(&self, error: BridgeError);

    /// The sequence terminated normally.
    fn on_completed(&self) {}
}

impl<T, O> Observer<T> for std::sync::Arc<O>
where
    O: Observer<T> + ?Sized,
{
    fn on_next(&self, value: T) {
        (**self).on_next(value)
    }

    fn on_error(&self, error: BridgeError) {
        (**self).on_error(error)
    }

    fn on_completed(&self) {
        (**self).on_completed()
    }
}

/// Observer built from a closure.
///
/// Errors are logged and otherwise dropped, which suits callback-style
/// registrations where nobody is waiting on a terminal signal.
pub struct FnObserver<T, F> {
    on_next: F,
    _value: PhantomData<fn(T)>,
}

impl<T, F> FnObserver<T, F>
where
    F: Fn(T) + Send + Sync,
{
    pub fn new(on_next: F) -> Self {
        Self {
            on_next,
            _value: PhantomData,
        }
    }
}

impl<T, F> Observer<T> for FnObserver<T, F>
where
    F: Fn(T) + Send + Sync,
{
    fn on_next(&self, value: T) {
        (self.on_next)(value)
    }

    fn on_error(&self, error: BridgeError) {
        tracing::warn!(code = %error.code(), error = %error, "Callback registration terminated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn fn_observer_forwards_values() {
        let total = Arc::new(AtomicUsize::new(0));
        let sink = total.clone();
        let observer = FnObserver::new(move |v: usize| {
            sink.fetch_add(v, Ordering::SeqCst);
        });

        observer.on_next(2);
        observer.on_next(3);

        assert_eq!(total.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn arc_observer_delegates() {
        let total = Arc::new(AtomicUsize::new(0));
        let sink = total.clone();
        let observer: Arc<dyn Observer<usize>> = Arc::new(FnObserver::new(move |v: usize| {
            sink.fetch_add(v, Ordering::SeqCst);
        }));

        observer.on_next(7);
        observer.on_error(BridgeError::InvalidArgument("x"));

        assert_eq!(total.load(Ordering::SeqCst), 7);
    }
}
