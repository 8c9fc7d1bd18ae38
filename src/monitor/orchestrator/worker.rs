//! Dedicated background thread fed by a bounded queue.

use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Why a job was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmitError {
    /// The queue already holds a job
    Busy,
    /// The worker was shut down
    Closed,
}

/// One background thread draining a bounded job queue. Submitting never
/// blocks; a full queue rejects the job.
pub(crate) struct Worker<J: Send + 'static> {
    sender: Mutex<Option<SyncSender<J>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<J: Send + 'static> Worker<J> {
    pub(crate) fn spawn<F>(name: String, capacity: usize, mut run: F) -> std::io::Result<Self>
    where
        F: FnMut(J) + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel::<J>(capacity);
        let handle = thread::Builder::new().name(name).spawn(move || {
            for job in receiver {
                run(job);
            }
        })?;
        Ok(Self { sender: Mutex::new(Some(sender)), handle: Mutex::new(Some(handle)) })
    }

    /// Queue a job. On failure the job is handed back to the caller.
    pub(crate) fn submit(&self, job: J) -> Result<(), (SubmitError, J)> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = sender.as_ref() else {
            return Err((SubmitError::Closed, job));
        };
        sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(job) => (SubmitError::Busy, job),
            TrySendError::Disconnected(job) => (SubmitError::Closed, job),
        })
    }

    /// Close the queue and wait for queued and running jobs to finish.
    pub(crate) fn shutdown(&self) {
        drop(self.sender.lock().unwrap_or_else(PoisonError::into_inner).take());
        let handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            let _ = handle.join();
        }
    }
}

impl<J: Send + 'static> Drop for Worker<J> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
