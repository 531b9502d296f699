use std::time::{Duration, Instant};

use crate::animation::{anim::Keyframes, ease::Ease};

/// Black/white offsets that position the fade mask's two gradient stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeOffsets {
    /// Black point.
    pub black: f64,
    /// White point.
    pub white: f64,
}

/// Curves driving both fade offsets over one animation.
#[derive(Clone, Debug, PartialEq)]
pub struct FadeCurves {
    /// Black point over normalized time.
    pub black: Keyframes<f64>,
    /// White point over normalized time.
    pub white: Keyframes<f64>,
}

impl FadeCurves {
    /// Reveal: the black point sweeps out past the start while the white point
    /// follows it down from beyond the end.
    pub fn reveal() -> Self {
        Self {
            black: Keyframes::between(1.0, -0.7, Ease::OutQuad),
            white: Keyframes::between(2.0, 0.0, Ease::OutCubic),
        }
    }

    /// Conceal: the white point sweeps out past the start and the black point
    /// follows it down from just beyond the end.
    pub fn conceal() -> Self {
        Self {
            black: Keyframes::between(1.1, 0.0, Ease::OutQuad),
            white: Keyframes::between(1.0, -0.4, Ease::OutQuad),
        }
    }

    /// Sample both curves at normalized progress `t`.
    pub fn sample(&self, t: f64) -> FadeOffsets {
        FadeOffsets {
            black: self.black.sample(t),
            white: self.white.sample(t),
        }
    }
}

/// Token identifying which animation currently owns the fade mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationGeneration(u64);

impl AnimationGeneration {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A time-bounded fade animation started under one generation.
#[derive(Clone, Debug)]
pub struct AnimationRun {
    generation: AnimationGeneration,
    curves: FadeCurves,
    started: Instant,
    duration: Duration,
}

impl AnimationRun {
    /// Build a run; usually created through the compositor's `anim_in`/`anim_out`.
    pub fn new(
        generation: AnimationGeneration,
        curves: FadeCurves,
        started: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            generation,
            curves,
            started,
            duration,
        }
    }

    /// Generation the run was started under.
    pub fn generation(&self) -> AnimationGeneration {
        self.generation
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Elapsed fraction of the duration; a zero duration is immediately complete.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    /// Offsets at `now` together with the progress they were sampled at.
    pub fn sample(&self, now: Instant) -> (FadeOffsets, f64) {
        let t = self.progress(now);
        (self.curves.sample(t), t)
    }
}

/// Per-instance animation scheduler.
///
/// Runs are queued for the next display refresh. Starting a new animation bumps
/// the generation, and queued runs from older generations exit silently when
/// they next come up.
#[derive(Debug, Default)]
pub(crate) struct Animator {
    generation: AnimationGeneration,
    scheduled: Vec<AnimationRun>,
}

impl Animator {
    pub(crate) fn start(
        &mut self,
        curves: FadeCurves,
        started: Instant,
        duration: Duration,
    ) -> AnimationRun {
        self.generation = AnimationGeneration(self.generation.0.wrapping_add(1));
        AnimationRun::new(self.generation, curves, started, duration)
    }

    pub(crate) fn is_current(&self, run: &AnimationRun) -> bool {
        run.generation == self.generation
    }

    pub(crate) fn schedule(&mut self, run: AnimationRun) {
        self.scheduled.push(run);
    }

    pub(crate) fn take_scheduled(&mut self) -> Vec<AnimationRun> {
        std::mem::take(&mut self.scheduled)
    }

    pub(crate) fn generation(&self) -> AnimationGeneration {
        self.generation
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.scheduled.iter().any(|run| self.is_current(run))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/run.rs"]
mod tests;
