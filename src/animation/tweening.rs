//! Cancellable, wall-clock driven tweens.
//!
//! A [`TimedTask`] is sampled once per display frame. It owns a
//! [`CancellationToken`]; whoever replaces a task cancels the previous token
//! first, so a superseded animation can never write another frame.

use crate::animation::interpolation::EasingFunction;
use crate::traits::Lerp;
use instant::Instant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared cancellation flag for a running task
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Result of sampling a task on a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskStep<T> {
    /// Intermediate eased value
    Running(T),
    /// Final frame; carries the exact target
    Finished(T),
    Cancelled,
}

/// Interpolates `from -> to` over `duration` starting at `start`
#[derive(Debug, Clone)]
pub struct TimedTask<T: Lerp + Clone> {
    pub from: T,
    pub to: T,
    pub start: Instant,
    pub duration: Duration,
    pub easing: EasingFunction,
    token: CancellationToken,
}

impl<T: Lerp + Clone> TimedTask<T> {
    /// Task with the default ease-out cubic curve
    pub fn new(from: T, to: T, start: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing: EasingFunction::default(),
            token: CancellationToken::new(),
        }
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Normalized progress at `now`, 1.0 once the duration has elapsed
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Value for the frame at `now`. The last frame returns `to` verbatim
    /// rather than an interpolated value, so repeated float error never
    /// leaves the animation short of its target.
    pub fn sample(&self, now: Instant) -> TaskStep<T> {
        if self.is_cancelled() {
            return TaskStep::Cancelled;
        }
        let progress = self.progress(now);
        if progress >= 1.0 {
            TaskStep::Finished(self.to.clone())
        } else {
            TaskStep::Running(self.from.lerp(&self.to, self.easing.apply(progress)))
        }
    }
}
