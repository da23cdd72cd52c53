use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use kurbo::Rect;

/// Opaque handle to a rendered element (a text container or one word span).
///
/// The reveal engine only ever holds these back-references; element storage
/// belongs to whoever renders the panel.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Monotonic allocator for [`ElementId`] values.
///
/// Clones share one counter, so every panel on a page can draw from the same
/// sequence and no two elements ever get the same id.
#[derive(Clone, Debug, Default)]
pub struct ElementIdSeq {
    next: Arc<AtomicU64>,
}

impl ElementIdSeq {
    /// Start allocating at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> ElementId {
        ElementId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Vertical viewport metrics in document pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub height: f64,
    pub scroll_y: f64, // top edge of the viewport in document space
}

impl Viewport {
    pub fn new(height: f64) -> Self {
        Self {
            height: height.max(0.0),
            scroll_y: 0.0,
        }
    }

    pub fn bottom(self) -> f64 {
        self.scroll_y + self.height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
