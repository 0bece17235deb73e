//! Dispatcher that runs jobs on a single task of a tokio runtime.

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::ports::{Dispatcher, Job};

/// FIFO job queue drained by one spawned tokio task.
///
/// Jobs run one after another on that task, so ordering holds even on a
/// multi-threaded runtime. Jobs must not block.
pub struct TokioDispatcher {
    name: String,
    sender: mpsc::UnboundedSender<Job>,
}

impl TokioDispatcher {
    /// Spawns the draining task on `handle`.
    pub fn spawn(handle: &Handle, name: impl Into<String>) -> Self {
        let name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        handle.spawn(async move {
            while let Some(job) = receiver.recv().await {
                job();
            }
        });

        Self { name, sender }
    }

    /// Spawns on the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current(name: impl Into<String>) -> Self {
        Self::spawn(&Handle::current(), name)
    }
}

impl Dispatcher for TokioDispatcher {
    fn dispatch(&self, job: Job) -> Result<(), Job> {
        self.sender.send(job).map_err(|mpsc::error::SendError(job)| job)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
