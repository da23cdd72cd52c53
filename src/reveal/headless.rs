//! In-process scroll observer and style recorder, used for simulation and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::animation::ease::Ease;
use crate::foundation::core::{ElementId, Rect, Viewport};
use crate::reveal::binder::{StyleSink, TokenStyle};
use crate::reveal::capability::{ProgressFn, Scrub, ScrollCapability, TriggerId, TriggerSpec};
use crate::reveal::position::ScrollRange;

const CATCH_UP_EASE: Ease = Ease::Power3Out;

type Callback = Arc<Mutex<ProgressFn>>;

struct LiveTrigger {
    spec: TriggerSpec,
    range: ScrollRange,
    on_update: Callback,
    current: f64,
    from: f64,
    target: f64,
    elapsed: f64,
}

impl LiveTrigger {
    fn jump_to(&mut self, progress: f64) -> f64 {
        self.current = progress;
        self.from = progress;
        self.target = progress;
        self.elapsed = 0.0;
        progress
    }

    fn retarget(&mut self, progress: f64) -> Option<f64> {
        match self.spec.scrub {
            Scrub::Immediate => Some(self.jump_to(progress)),
            Scrub::Smoothed { .. } => {
                self.from = self.current;
                self.target = progress;
                self.elapsed = 0.0;
                None
            }
        }
    }

    fn advance(&mut self, dt: f64) -> Option<f64> {
        let Scrub::Smoothed { lag_secs } = self.spec.scrub else {
            return None;
        };
        if self.current == self.target {
            return None;
        }
        self.elapsed += dt;
        let t = if lag_secs <= 0.0 {
            1.0
        } else {
            self.elapsed / lag_secs
        };
        self.current = if t >= 1.0 {
            self.target
        } else {
            self.from + (self.target - self.from) * CATCH_UP_EASE.apply(t)
        };
        Some(self.current)
    }
}

/// Progress values to deliver once the scroller lock is released.
type Pending = Vec<(Callback, f64)>;

fn deliver(pending: Pending) {
    for (callback, progress) in pending {
        let mut f = callback.lock().unwrap_or_else(PoisonError::into_inner);
        (*f)(progress);
    }
}

#[derive(Default)]
struct ScrollerState {
    viewport: Viewport,
    layout: HashMap<ElementId, Rect>,
    triggers: BTreeMap<TriggerId, LiveTrigger>,
    next_id: u64,
    kills: usize,
    refreshes: usize,
}

impl ScrollerState {
    fn measure(&self, spec: &TriggerSpec) -> ScrollRange {
        let bounds = self.layout.get(&spec.element).copied().unwrap_or_else(|| {
            tracing::debug!(element = %spec.element, "trigger element has no layout yet");
            Rect::ZERO
        });
        ScrollRange::measure(&spec.start, &spec.end, bounds, self.viewport.height)
    }
}

/// Scroll observer over an explicit element layout and a movable viewport.
///
/// Smoothed triggers only move when [`HeadlessScroller::tick`] advances time.
/// Update callbacks run after the internal lock is released, so they may call
/// back into the scroller.
#[derive(Default)]
pub struct HeadlessScroller {
    state: Mutex<ScrollerState>,
}

impl HeadlessScroller {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            state: Mutex::new(ScrollerState {
                viewport: Viewport::new(viewport_height),
                ..ScrollerState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScrollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place `element` at `bounds`. Takes effect on the next refresh or registration.
    pub fn set_layout(&self, element: ElementId, bounds: Rect) {
        self.lock().layout.insert(element, bounds);
    }

    pub fn viewport(&self) -> Viewport {
        self.lock().viewport
    }

    pub fn scroll_to(&self, scroll_y: f64) {
        let pending: Pending = {
            let mut state = self.lock();
            state.viewport.scroll_y = scroll_y;
            state
                .triggers
                .values_mut()
                .filter_map(|t| {
                    let progress = t.range.progress(scroll_y);
                    t.retarget(progress).map(|p| (Arc::clone(&t.on_update), p))
                })
                .collect()
        };
        deliver(pending);
    }

    /// Advance smoothed triggers by `dt_secs`.
    pub fn tick(&self, dt_secs: f64) {
        let dt = dt_secs.max(0.0);
        let pending: Pending = self
            .lock()
            .triggers
            .values_mut()
            .filter_map(|t| t.advance(dt).map(|p| (Arc::clone(&t.on_update), p)))
            .collect();
        deliver(pending);
    }

    /// Current (possibly lagging) progress of a trigger.
    pub fn progress_of(&self, id: TriggerId) -> Option<f64> {
        self.lock().triggers.get(&id).map(|t| t.current)
    }

    pub fn range_of(&self, id: TriggerId) -> Option<ScrollRange> {
        self.lock().triggers.get(&id).map(|t| t.range)
    }

    pub fn active_triggers(&self) -> usize {
        self.lock().triggers.len()
    }

    pub fn triggers_for(&self, element: ElementId) -> Vec<TriggerId> {
        self.lock()
            .triggers
            .iter()
            .filter(|(_, t)| t.spec.element == element)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of kills that removed a live trigger.
    pub fn kill_count(&self) -> usize {
        self.lock().kills
    }

    pub fn refresh_count(&self) -> usize {
        self.lock().refreshes
    }
}

impl ScrollCapability for HeadlessScroller {
    fn register(&self, spec: TriggerSpec, on_update: ProgressFn) -> TriggerId {
        let on_update: Callback = Arc::new(Mutex::new(on_update));
        let (id, progress) = {
            let mut state = self.lock();
            let id = TriggerId(state.next_id);
            state.next_id += 1;

            let range = state.measure(&spec);
            let mut trigger = LiveTrigger {
                spec,
                range,
                on_update: Arc::clone(&on_update),
                current: 0.0,
                from: 0.0,
                target: 0.0,
                elapsed: 0.0,
            };
            let progress = trigger.jump_to(range.progress(state.viewport.scroll_y));
            state.triggers.insert(id, trigger);
            (id, progress)
        };
        deliver(vec![(on_update, progress)]);
        id
    }

    fn kill(&self, id: TriggerId) {
        let mut state = self.lock();
        if state.triggers.remove(&id).is_some() {
            state.kills += 1;
        }
    }

    fn refresh(&self) {
        let pending: Pending = {
            let mut state = self.lock();
            state.refreshes += 1;

            let mut order: Vec<(i32, TriggerId)> = state
                .triggers
                .iter()
                .map(|(id, t)| (t.spec.refresh_priority, *id))
                .collect();
            order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

            let scroll_y = state.viewport.scroll_y;
            let mut pending = Vec::with_capacity(order.len());
            for (_, id) in order {
                let Some(spec) = state.triggers.get(&id).map(|t| t.spec.clone()) else {
                    continue;
                };
                let range = state.measure(&spec);
                if let Some(trigger) = state.triggers.get_mut(&id) {
                    trigger.range = range;
                    let progress = trigger.jump_to(range.progress(scroll_y));
                    pending.push((Arc::clone(&trigger.on_update), progress));
                }
            }
            pending
        };
        deliver(pending);
    }
}

/// [`StyleSink`] that records the latest visual state per element.
#[derive(Debug, Default)]
pub struct StyleBuffer {
    rotations: Mutex<HashMap<ElementId, f64>>,
    tokens: Mutex<HashMap<ElementId, TokenStyle>>,
}

impl StyleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self, container: ElementId) -> Option<f64> {
        self.rotations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&container)
            .copied()
    }

    pub fn token(&self, token: ElementId) -> Option<TokenStyle> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&token)
            .copied()
    }
}

impl StyleSink for StyleBuffer {
    fn set_rotation(&self, container: ElementId, degrees: f64) {
        self.rotations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(container, degrees);
    }

    fn set_opacity(&self, token: ElementId, opacity: f64) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(token)
            .or_default()
            .opacity = opacity;
    }

    fn set_blur(&self, token: ElementId, blur_px: f64) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(token)
            .or_default()
            .blur_px = blur_px;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/headless.rs"]
mod tests;
