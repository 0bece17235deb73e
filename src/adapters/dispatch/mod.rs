//! Dispatcher implementations used as explicit delivery contexts.

mod runtime;
mod worker_thread;

pub use runtime::TokioDispatcher;
pub use worker_thread::ThreadDispatcher;
