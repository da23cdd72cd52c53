use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::animation::tween::{Stagger, Tween};
use crate::foundation::core::ElementId;
use crate::foundation::error::{RevealError, RevealResult};
use crate::reveal::capability::{
    CapabilitySlot, ProgressFn, Scrub, ScrollCapability, TriggerId, TriggerSpec,
};
use crate::reveal::position::{Edge, ScrollPosition};

/// Container rotation runs while the container crosses the whole viewport.
pub const ROTATION_START: ScrollPosition = ScrollPosition::new(Edge::Top, Edge::Bottom, 0.0);
pub const ROTATION_END: ScrollPosition = ScrollPosition::new(Edge::Bottom, Edge::Top, 0.0);
/// Word reveal runs from the lower viewport region up to just above center.
pub const WORD_START: ScrollPosition = ScrollPosition::new(Edge::Top, Edge::Bottom, -50.0);
pub const WORD_END: ScrollPosition = ScrollPosition::new(Edge::Top, Edge::Center, -100.0);
pub const WORD_STAGGER: f64 = 0.08;
pub const WORD_SCRUB: Scrub = Scrub::Smoothed { lag_secs: 1.0 };
const REFRESH_PRIORITY: i32 = -1;

/// Reveal parameters for one container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Word opacity before the reveal, in `[0, 1]`.
    pub base_opacity: f64,
    /// Container rotation in degrees before the reveal.
    pub base_rotation: f64,
    /// Word blur radius in pixels before the reveal.
    pub blur_strength: f64,
    pub enable_blur: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            base_opacity: 0.1,
            base_rotation: 3.0,
            blur_strength: 4.0,
            enable_blur: true,
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> RevealResult<()> {
        if !(self.base_opacity.is_finite() && (0.0..=1.0).contains(&self.base_opacity)) {
            return Err(RevealError::validation("base_opacity must be within [0, 1]"));
        }
        if !self.base_rotation.is_finite() {
            return Err(RevealError::validation("base_rotation must be finite"));
        }
        if !(self.blur_strength.is_finite() && self.blur_strength >= 0.0) {
            return Err(RevealError::validation(
                "blur_strength must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Visual state of one word span.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TokenStyle {
    pub opacity: f64,
    pub blur_px: f64,
}

impl Default for TokenStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blur_px: 0.0,
        }
    }
}

/// Receives the visual properties the binder interpolates.
pub trait StyleSink: Send + Sync {
    fn set_rotation(&self, container: ElementId, degrees: f64);
    fn set_opacity(&self, token: ElementId, opacity: f64);
    fn set_blur(&self, token: ElementId, blur_px: f64);
}

/// A mounted container and its word spans, in reading order.
#[derive(Clone)]
pub struct RevealTarget {
    pub container: ElementId,
    pub tokens: Vec<ElementId>,
    pub sink: Arc<dyn StyleSink>,
}

struct ActiveBinding {
    generation: u64,
    triggers: Vec<TriggerId>,
}

#[derive(Default)]
struct Bindings {
    next_generation: u64,
    active: HashMap<ElementId, ActiveBinding>,
}

struct Shared {
    capability: Arc<dyn ScrollCapability>,
    bindings: Mutex<Bindings>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Bindings> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn kill_all(&self, triggers: &[TriggerId]) {
        for id in triggers {
            self.capability.kill(*id);
        }
    }
}

/// Attaches scroll-driven rotation, opacity and blur to rendered containers.
///
/// At most one binding is active per container: binding again supersedes the
/// previous binding and kills its triggers.
#[derive(Clone)]
pub struct RevealBinder {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for RevealBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealBinder")
            .field("bound_containers", &self.shared.lock().active.len())
            .finish()
    }
}

impl RevealBinder {
    pub fn new(capability: Arc<dyn ScrollCapability>) -> Self {
        Self {
            shared: Arc::new(Shared {
                capability,
                bindings: Mutex::new(Bindings::default()),
            }),
        }
    }

    /// Build a binder once the host provides its capability. `None` after
    /// `timeout`, in which case content is left unanimated.
    pub async fn when_ready(slot: &CapabilitySlot, timeout: Duration) -> Option<Self> {
        slot.wait_ready(timeout).await.map(Self::new)
    }

    #[tracing::instrument(
        skip(self, target, config),
        fields(container = %target.container, tokens = target.tokens.len())
    )]
    pub fn bind(&self, target: RevealTarget, config: &RevealConfig) -> RevealResult<ReleaseHandle> {
        config.validate()?;
        let RevealTarget {
            container,
            tokens,
            sink,
        } = target;

        sink.set_rotation(container, config.base_rotation);
        for id in &tokens {
            sink.set_opacity(*id, config.base_opacity);
            if config.enable_blur {
                sink.set_blur(*id, config.blur_strength);
            }
        }

        let capability = &self.shared.capability;
        let mut triggers = Vec::with_capacity(3);

        let rotation = Tween::linear(config.base_rotation, 0.0);
        let rotation_sink = Arc::clone(&sink);
        triggers.push(capability.register(
            TriggerSpec {
                element: container,
                start: ROTATION_START,
                end: ROTATION_END,
                scrub: Scrub::Immediate,
                refresh_priority: REFRESH_PRIORITY,
            },
            Box::new(move |p| rotation_sink.set_rotation(container, rotation.sample(p))),
        ));

        if !tokens.is_empty() {
            let tokens: Arc<[ElementId]> = tokens.into();
            let opacity = Tween::linear(config.base_opacity, 1.0);
            triggers.push(capability.register(
                word_trigger(container),
                staggered(Arc::clone(&tokens), Arc::clone(&sink), move |s, id, t| {
                    s.set_opacity(id, opacity.sample(t));
                }),
            ));

            if config.enable_blur {
                let blur = Tween::linear(config.blur_strength, 0.0);
                triggers.push(capability.register(
                    word_trigger(container),
                    staggered(tokens, sink, move |s, id, t| s.set_blur(id, blur.sample(t))),
                ));
            }
        }

        let (generation, prior) = {
            let mut bindings = self.shared.lock();
            let generation = bindings.next_generation;
            bindings.next_generation += 1;
            let prior = bindings.active.insert(
                container,
                ActiveBinding {
                    generation,
                    triggers: triggers.clone(),
                },
            );
            (generation, prior)
        };

        if let Some(prior) = prior {
            self.shared.kill_all(&prior.triggers);
            tracing::debug!(released = prior.triggers.len(), "superseded prior binding");
        }
        tracing::debug!(triggers = triggers.len(), generation, "reveal bound");

        Ok(ReleaseHandle {
            container,
            generation,
            shared: Arc::downgrade(&self.shared),
        })
    }

    /// Same as [`ReleaseHandle::release`].
    pub fn release(&self, handle: &ReleaseHandle) {
        handle.release();
    }

    /// Ask the capability to re-measure all trigger boundaries.
    pub fn refresh(&self) {
        self.shared.capability.refresh();
    }

    pub fn capability(&self) -> Arc<dyn ScrollCapability> {
        Arc::clone(&self.shared.capability)
    }

    pub fn is_bound(&self, container: ElementId) -> bool {
        self.shared.lock().active.contains_key(&container)
    }

    pub fn active_triggers(&self, container: ElementId) -> usize {
        self.shared
            .lock()
            .active
            .get(&container)
            .map_or(0, |b| b.triggers.len())
    }
}

fn word_trigger(container: ElementId) -> TriggerSpec {
    TriggerSpec {
        element: container,
        start: WORD_START,
        end: WORD_END,
        scrub: WORD_SCRUB,
        refresh_priority: REFRESH_PRIORITY,
    }
}

fn staggered(
    tokens: Arc<[ElementId]>,
    sink: Arc<dyn StyleSink>,
    apply: impl Fn(&dyn StyleSink, ElementId, f64) + Send + 'static,
) -> ProgressFn {
    let stagger = Stagger::new(WORD_STAGGER);
    Box::new(move |p| {
        let count = tokens.len();
        for (i, id) in tokens.iter().enumerate() {
            apply(sink.as_ref(), *id, stagger.local_progress(i, count, p));
        }
    })
}

/// Ownership token for one binding. Releasing is idempotent, and a handle
/// whose binding was superseded by a later `bind` releases nothing.
#[must_use = "dropping the handle releases the binding"]
pub struct ReleaseHandle {
    container: ElementId,
    generation: u64,
    shared: Weak<Shared>,
}

impl std::fmt::Debug for ReleaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseHandle")
            .field("container", &self.container)
            .field("generation", &self.generation)
            .finish()
    }
}

impl ReleaseHandle {
    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn release(&self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let released = {
            let mut bindings = shared.lock();
            match bindings.active.get(&self.container) {
                Some(b) if b.generation == self.generation => {
                    bindings.active.remove(&self.container)
                }
                _ => None,
            }
        };
        if let Some(binding) = released {
            shared.kill_all(&binding.triggers);
            tracing::debug!(
                container = %self.container,
                released = binding.triggers.len(),
                "reveal released"
            );
        }
    }
}

impl Drop for ReleaseHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/binder.rs"]
mod tests;
