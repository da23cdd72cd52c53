use crate::animation::ease::Ease;

/// Interpolation contract for tweened values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// A from/to pair sampled by normalized progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    #[serde(default)]
    pub ease: Ease,
}

impl<T: Lerp + Copy> Tween<T> {
    pub fn linear(from: T, to: T) -> Self {
        Self {
            from,
            to,
            ease: Ease::None,
        }
    }

    /// Value at `progress`; progress outside `[0, 1]` pins to the endpoints.
    pub fn sample(&self, progress: f64) -> T {
        let t = self.ease.apply(progress);
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }
        T::lerp(&self.from, &self.to, t)
    }
}

/// Fixed per-item offset applied across an ordered sequence of tweens.
///
/// Every item runs for `duration` timeline units and item `i` starts at
/// `i * each`. The whole timeline is normalized so that scroll progress 1.0
/// lands exactly when the last item finishes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stagger {
    pub each: f64,
    pub duration: f64,
}

impl Stagger {
    pub const DEFAULT_DURATION: f64 = 0.5;

    pub fn new(each: f64) -> Self {
        Self {
            each: each.max(0.0),
            duration: Self::DEFAULT_DURATION,
        }
    }

    /// Timeline length for `count` items.
    pub fn total(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.duration + self.each * (count - 1) as f64
    }

    /// Local progress of item `index` when the whole timeline sits at `progress`.
    pub fn local_progress(&self, index: usize, count: usize, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        let total = self.total(count);
        if total <= 0.0 || self.duration <= 0.0 {
            return if progress > 0.0 { 1.0 } else { 0.0 };
        }
        let t = progress * total - self.each * index as f64;
        (t / self.duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
