use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::reveal::capability::ScrollCapability;

/// Delay between a layout change and the trigger re-measure it causes.
pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Coalesces refresh requests: only the last request inside the delay window
/// reaches the capability.
#[derive(Debug)]
pub struct RefreshDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for RefreshDebouncer {
    fn default() -> Self {
        Self::new(REFRESH_DEBOUNCE)
    }
}

impl RefreshDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule a refresh on the current tokio runtime.
    pub fn schedule(&mut self, capability: Arc<dyn ScrollCapability>) {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("refreshing scroll triggers");
            capability.refresh();
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for RefreshDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shell/refresh.rs"]
mod tests;
