//! Dispatcher port - An execution context that runs delivery jobs.

/// Unit of work handed to a dispatcher.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Port for an explicit delivery target (task queue, worker thread, UI loop).
///
/// Implementations must run jobs in submission order and one at a time;
/// the delivery-context bridge relies on that to keep emissions ordered.
pub trait Dispatcher: Send + Sync {
    /// Queue `job` for execution.
    ///
    /// Returns the job back if the context no longer accepts work.
    fn dispatch(&self, job: Job) -> Result<(), Job>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
