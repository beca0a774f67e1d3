//! Debounced persistence of the issue set
//!
//! Bursts of revisions are coalesced: each schedule call aborts the pending
//! write and starts a new timer, so only the last issue set lands. `flush`
//! writes the pending set immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Issue;

/// Default persistence delay
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Destination for the issue set (`onIssuesChange`)
#[async_trait]
pub trait IssueSink: Send + Sync {
    async fn persist(&self, issues: Vec<Issue>) -> Result<()>;
}

/// Sink wrapping a plain callback
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: Fn(Vec<Issue>) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> IssueSink for CallbackSink<F>
where
    F: Fn(Vec<Issue>) + Send + Sync,
{
    async fn persist(&self, issues: Vec<Issue>) -> Result<()> {
        (self.callback)(issues);
        Ok(())
    }
}

struct Pending {
    handle: JoinHandle<()>,
    issues: Vec<Issue>,
    writing: Arc<AtomicBool>,
}

/// Coalesces writes to an [`IssueSink`]; last write wins.
///
/// Dropping the persister leaves a scheduled write running.
pub struct DebouncedPersister {
    sink: Arc<dyn IssueSink>,
    delay: Duration,
    pending: Mutex<Option<Pending>>,
}

impl DebouncedPersister {
    pub fn new(sink: Arc<dyn IssueSink>, delay: Duration) -> Self {
        Self {
            sink,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Applies to writes scheduled from now on
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Pending>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Schedule a write of `issues`, replacing any pending one.
    /// Must be called within a tokio runtime.
    pub fn schedule(&self, issues: Vec<Issue>) {
        let sink = Arc::clone(&self.sink);
        let delay = self.delay;
        let writing = Arc::new(AtomicBool::new(false));
        let started = Arc::clone(&writing);
        let snapshot = issues.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            started.store(true, Ordering::SeqCst);
            let count = snapshot.len();
            match sink.persist(snapshot).await {
                Ok(()) => debug!(issues = count, "Persisted cascading issues"),
                Err(err) => warn!(error = %err, "Failed to persist cascading issues"),
            }
        });

        let replaced = self.lock().replace(Pending {
            handle,
            issues,
            writing,
        });
        if let Some(previous) = replaced {
            previous.handle.abort();
        }
    }

    /// Write the pending issue set now instead of waiting for the timer
    pub async fn flush(&self) -> Result<()> {
        let pending = self.lock().take();
        let Some(pending) = pending else {
            return Ok(());
        };
        if pending.writing.load(Ordering::SeqCst) {
            // Timer already fired; let that write finish
            let _ = pending.handle.await;
            return Ok(());
        }
        pending.handle.abort();
        let count = pending.issues.len();
        self.sink.persist(pending.issues).await?;
        debug!(issues = count, "Flushed cascading issues");
        Ok(())
    }

    /// Drop the pending write, if any
    pub fn cancel(&self) {
        if let Some(pending) = self.lock().take() {
            pending.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_sink() -> (Arc<dyn IssueSink>, Arc<Mutex<Vec<usize>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let sink = CallbackSink::new(move |issues: Vec<Issue>| {
            recorded.lock().unwrap().push(issues.len());
        });
        (Arc::new(sink), calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_write() {
        let (sink, calls) = recording_sink();
        let persister = DebouncedPersister::new(sink, DEFAULT_DEBOUNCE);

        persister.schedule(Vec::new());
        persister.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_persister_still_writes() {
        let (sink, calls) = recording_sink();
        let persister = DebouncedPersister::new(sink, DEFAULT_DEBOUNCE);

        persister.schedule(Vec::new());
        drop(persister);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(*calls.lock().unwrap(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_once_without_waiting() {
        let (sink, calls) = recording_sink();
        let persister = DebouncedPersister::new(sink, Duration::from_secs(60));

        persister.schedule(Vec::new());
        persister.flush().await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec![0]);

        // Timer was replaced by the flush; nothing else lands
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(*calls.lock().unwrap(), vec![0]);

        // Nothing pending
        persister.flush().await.unwrap();
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
