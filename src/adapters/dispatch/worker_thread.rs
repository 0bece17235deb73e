//! Dispatcher that runs jobs on one dedicated, named OS thread.

use std::io;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::ports::{Dispatcher, Job};

/// A single worker thread draining a FIFO job queue.
///
/// Suits consumers that need every emission on one known thread, the way a
/// UI loop would. The thread exits once the dispatcher is dropped and the
/// queue is drained.
pub struct ThreadDispatcher {
    name: String,
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ThreadDispatcher {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(name: impl Into<String>) -> io::Result<Self> {
        let name = name.into();
        let (sender, receiver) = mpsc::channel::<Job>();

        let worker = thread::Builder::new().name(name.clone()).spawn(move || {
            while let Ok(job) = receiver.recv() {
                job();
            }
        })?;

        tracing::debug!(dispatcher = %name, "Delivery thread started");

        Ok(Self {
            name,
            sender: Mutex::new(Some(sender)),
            worker: Some(worker),
        })
    }

    /// Stops accepting jobs and waits for queued ones to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = self.worker.take() {
            // Joining from the worker itself would deadlock.
            if worker.thread().id() != thread::current().id() && worker.join().is_err() {
                tracing::warn!(dispatcher = %self.name, "Delivery thread panicked");
            }
        }
    }
}

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, job: Job) -> Result<(), Job> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => sender.send(job).map_err(|mpsc::SendError(job)| job),
            None => Err(job),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ThreadDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn runs_jobs_on_named_thread_in_order() {
        let dispatcher = ThreadDispatcher::spawn("delivery-test").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = seen.clone();
            let accepted = dispatcher.dispatch(Box::new(move || {
                let name = thread::current().name().map(str::to_string);
                seen.lock().unwrap().push((i, name));
            }));
            assert!(accepted.is_ok());
        }
        dispatcher.shutdown();

        let seen = seen.lock().unwrap();
        let order: Vec<i32> = seen.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(seen
            .iter()
            .all(|(_, name)| name.as_deref() == Some("delivery-test")));
    }

    #[test]
    fn stopped_dispatcher_rejects_jobs() {
        let mut dispatcher = ThreadDispatcher::spawn("delivery-stop").unwrap();
        dispatcher.stop();
        assert!(dispatcher.dispatch(Box::new(|| {})).is_err());
    }
}
