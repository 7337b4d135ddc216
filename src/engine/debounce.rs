use std::sync::Arc;
use std::time::Duration;
use log::debug;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Value whose updates are only published after a quiet period
///
/// Every `set` restarts the window; only the last value set within the
/// window is published. The timer is a Tokio task that is aborted when it
/// is superseded, cancelled or when the debouncer is dropped, so nothing
/// fires after the owner is gone.
///
/// `set` spawns onto the current Tokio runtime. With a zero window, or
/// outside a runtime, it publishes immediately.
pub struct Debouncer<T> {
    /// Quiescence window
    window: Duration,

    /// Published value
    tx: Arc<watch::Sender<T>>,

    /// Scheduled publication, if any
    pending: Option<Pending<T>>,
}

struct Pending<T> {
    value: T,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T, window: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            window,
            tx: Arc::new(tx),
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `value`, dropping any publication still pending
    pub fn set(&mut self, value: T) {
        self.cancel();

        if self.window.is_zero() {
            self.tx.send_replace(value);
            return;
        }

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!("No Tokio runtime, publishing without debounce");
                self.tx.send_replace(value);
                return;
            }
        };

        let tx = Arc::clone(&self.tx);
        let deadline = Instant::now() + self.window;
        let published = value.clone();
        let task = handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tx.send_replace(published);
        });
        self.pending = Some(Pending { value, task });
    }

    /// Publish `value` right away, dropping any pending publication
    pub fn set_now(&mut self, value: T) {
        self.cancel();
        self.tx.send_replace(value);
    }

    /// Publish the pending value, if any, without waiting for the window
    pub fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.task.is_finished() {
                pending.task.abort();
                self.tx.send_replace(pending.value);
            }
        }
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }

    /// Wait until the pending value, if any, has been published
    pub async fn settle(&mut self) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.task.await;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }

    /// Last published value
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Pending value if one is scheduled, else the published one
    pub fn latest(&self) -> T {
        match &self.pending {
            Some(pending) if !pending.task.is_finished() => pending.value.clone(),
            _ => self.current(),
        }
    }

    /// Receiver notified on every publication
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}
