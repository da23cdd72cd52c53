//! The scroll-observation seam. The binder drives whatever implements
//! [`ScrollCapability`]; it never reaches for an ambient global.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::foundation::core::ElementId;
use crate::reveal::position::ScrollPosition;

/// Default bound on waiting for the host to provide a capability.
pub const CAPABILITY_WAIT: Duration = Duration::from_secs(5);

/// How trigger progress follows the scroll position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scrub {
    /// Progress equals the scroll-derived value at all times.
    Immediate,
    /// Progress catches up with the scroll-derived value over `lag_secs`.
    Smoothed { lag_secs: f64 },
}

/// Registration request for one scroll-driven trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSpec {
    pub element: ElementId,
    pub start: ScrollPosition,
    pub end: ScrollPosition,
    pub scrub: Scrub,
    /// Higher values are re-measured first on refresh.
    pub refresh_priority: i32,
}

/// Progress callback; receives values in `[0, 1]`.
pub type ProgressFn = Box<dyn FnMut(f64) + Send>;

/// Handle for a registered trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(pub u64);

/// Trigger-registration interface of the host's scroll observer.
pub trait ScrollCapability: Send + Sync {
    /// Register a trigger. Implementations should report the current progress
    /// through `on_update` once the boundaries are measured. `on_update` may
    /// call back into the capability, so it must not run under an internal lock.
    fn register(&self, spec: TriggerSpec, on_update: ProgressFn) -> TriggerId;

    /// Stop and forget a trigger. Unknown ids are ignored.
    fn kill(&self, id: TriggerId);

    /// Re-measure every trigger's boundaries after a layout change.
    fn refresh(&self);
}

/// Readiness slot the host fills once its scroll capability is available.
#[derive(Debug)]
pub struct CapabilitySlot {
    tx: watch::Sender<Option<Arc<dyn ScrollCapability>>>,
}

impl std::fmt::Debug for dyn ScrollCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScrollCapability")
    }
}

impl Default for CapabilitySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilitySlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Readiness callback. Later calls replace the capability.
    pub fn provide(&self, capability: Arc<dyn ScrollCapability>) {
        self.tx.send_replace(Some(capability));
    }

    pub fn current(&self) -> Option<Arc<dyn ScrollCapability>> {
        self.tx.borrow().clone()
    }

    /// Wait until a capability is provided, for at most `timeout`.
    pub async fn wait_ready(&self, timeout: Duration) -> Option<Arc<dyn ScrollCapability>> {
        let mut rx = self.tx.subscribe();
        let wait = async move { rx.wait_for(Option::is_some).await.ok().and_then(|c| c.clone()) };
        match tokio::time::timeout(timeout, wait).await {
            Ok(capability) => capability,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "scroll capability not available, content stays unanimated"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/capability.rs"]
mod tests;
