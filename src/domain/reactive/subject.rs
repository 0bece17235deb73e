//! Subject - a multicast source that fans each value out to every observer.
//!
//! Bridges never share a registration between observers. Subjects are the
//! exception: they back hook-driven sources (the server pipeline) where the
//! host calls in once and every current observer should hear about it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::domain::foundation::SubscriptionId;

use super::observer::Observer;
use super::stream::{self, EventStream};
use super::subscription::{Subscription, SubscriptionCore};

type ObserverMap<T> = HashMap<SubscriptionId, Arc<dyn Observer<T>>>;

/// Multicast observable fed by explicit `publish` calls.
pub struct Subject<T> {
    observers: Arc<RwLock<ObserverMap<T>>>,
}

impl<T> Subject<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            observers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Adds an observer. It sees only values published after this call.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<T> + 'static,
    {
        let core = SubscriptionCore::new();
        let id = core.id();
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(observer));

        let registry: Weak<RwLock<ObserverMap<T>>> = Arc::downgrade(&self.observers);
        core.arm(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&id);
            }
        });
        Subscription::from_core(core)
    }

    /// Subscribes a channel-backed observer and returns it as a stream.
    pub fn stream(&self) -> EventStream<T> {
        let (observer, receiver) = stream::channel();
        let subscription = self.subscribe(observer);
        EventStream::new(receiver, subscription)
    }

    /// Delivers `value` to every current observer.
    pub fn publish(&self, value: T) {
        // Snapshot so observers can subscribe/dispose from inside on_next.
        let observers: Vec<Arc<dyn Observer<T>>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for observer in observers {
            observer.on_next(value.clone());
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T> Default for Subject<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
