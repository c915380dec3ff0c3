//! Per-action animation state.
//!
//! The presentation layer itself lives outside this crate. What the engine
//! needs is the lifecycle: an animation starts when its action's state has
//! been applied and reports `Finished` once its duration has elapsed.

use super::ActionAnimationUpdateResult;

/// Fixed-duration animation driven by host ticks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimedAnimation {
    duration_ms: f32,
    elapsed_ms: f32,
    started: bool,
}

impl TimedAnimation {
    /// Start (or restart) the animation.
    pub fn start(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms as f32;
        self.elapsed_ms = 0.0;
        self.started = true;
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Milliseconds left until the animation finishes.
    #[must_use]
    pub fn remaining_ms(&self) -> f32 {
        (self.duration_ms - self.elapsed_ms).max(0.0)
    }

    /// Advance by `dt_millis`. An animation that was never started counts
    /// as finished.
    pub fn update(&mut self, dt_millis: f32) -> ActionAnimationUpdateResult {
        if !self.started {
            return ActionAnimationUpdateResult::Finished;
        }

        self.elapsed_ms += dt_millis.max(0.0);
        if self.elapsed_ms >= self.duration_ms {
            ActionAnimationUpdateResult::Finished
        } else {
            ActionAnimationUpdateResult::Ongoing
        }
    }
}
