//! Domain layer containing the bridge vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, descriptors, connection state, errors)
//! - `reactive` - Observers, subscriptions, event streams and subjects

pub mod foundation;
pub mod reactive;
