//! Reactive primitives - observers, subscription handles and streams.
//!
//! These types know nothing about hubs or transports. The bridges in
//! `application` build on them.

mod observer;
mod stream;
mod subject;
mod subscription;

pub use observer::{FnObserver, Observer};
pub use stream::EventStream;
pub use subject::Subject;
pub use subscription::{Subscription, SubscriptionState};

pub(crate) use stream::channel;
pub(crate) use subscription::SubscriptionCore;
