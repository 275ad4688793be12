//! Deferred scroll after a section expands
//!
//! Purely cosmetic: requests may be dropped (reduced motion, no runtime,
//! superseded by a newer request) without affecting section state.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct ScrollScheduler<E> {
    /// Channel back to the page loop.
    tx: UnboundedSender<E>,
    /// Wraps the section label into the event posted back to the page loop.
    make_event: fn(String) -> E,
    /// Wait before the request is posted.
    delay: Duration,
    /// `false` under reduced motion.
    enabled: bool,
    /// Task of the request not yet posted.
    pending: Option<JoinHandle<()>>,
}

impl<E: Send + 'static> ScrollScheduler<E> {
    pub fn new(tx: UnboundedSender<E>, make_event: fn(String) -> E, delay: Duration) -> Self {
        Self { tx, make_event, delay, enabled: true, pending: None }
    }

    /// Disable scrolling entirely (reduced-motion preference).
    #[must_use]
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.enabled = !reduced_motion;
        self
    }

    /// Post a scroll request for `section` after the configured delay,
    /// replacing any request still pending.
    ///
    /// Returns whether the request was scheduled.
    pub fn schedule(&mut self, section: &str) -> bool {
        self.cancel();

        if !self.enabled {
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(section, "No runtime, scroll request dropped");
            return false;
        };

        let tx = self.tx.clone();
        let event = (self.make_event)(section.to_string());
        let delay = self.delay;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The page loop may already be gone.
            let _ = tx.send(event);
        }));
        true
    }
}

impl<E> ScrollScheduler<E> {
    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<E> Drop for ScrollScheduler<E> {
    fn drop(&mut self) {
        self.cancel();
    }
}
