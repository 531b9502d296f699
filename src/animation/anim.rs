use crate::{
    animation::ease::Ease,
    foundation::error::{HalftoneError, HalftoneResult},
};

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Interpolate from `a` (t = 0) to `b` (t = 1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (f64::from(*a) + (f64::from(*b) - f64::from(*a)) * t) as f32
    }
}

/// One key on a normalized timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Position in [0,1] along the animation.
    pub at: f64,
    /// Value held at this key.
    pub value: T,
    /// Ease applied toward the next key.
    pub ease: Ease,
}

/// Keyframed value sampled by normalized progress.
///
/// Before the first key the first value is held, after the last key the last
/// value is held.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframes<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    /// Validate and wrap a key list (non-empty, finite, sorted by `at`).
    pub fn new(keys: Vec<Keyframe<T>>) -> HalftoneResult<Self> {
        if keys.is_empty() {
            return Err(HalftoneError::validation(
                "keyframes need at least one key",
            ));
        }
        if keys.iter().any(|k| !k.at.is_finite()) {
            return Err(HalftoneError::validation("keyframe positions must be finite"));
        }
        if !keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(HalftoneError::validation(
                "keyframes must be sorted by position",
            ));
        }
        Ok(Self { keys })
    }

    /// Two keys at 0 and 1, eased by `ease`.
    pub fn between(from: T, to: T, ease: Ease) -> Self {
        Self {
            keys: vec![
                Keyframe {
                    at: 0.0,
                    value: from,
                    ease,
                },
                Keyframe {
                    at: 1.0,
                    value: to,
                    ease: Ease::Linear,
                },
            ],
        }
    }

    /// Keys in order.
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Sample at `progress`; NaN samples the first key.
    pub fn sample(&self, progress: f64) -> T {
        let p = if progress.is_nan() { f64::NEG_INFINITY } else { progress };
        let idx = self.keys.partition_point(|k| k.at <= p);

        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return a.value.clone();
        }
        let t = (p - a.at) / span;
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
