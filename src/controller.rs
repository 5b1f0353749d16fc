//! Hysteresis controller, the decision core.
//!
//! The instantaneous "temperature looks safe" classification is noisy: near a
//! range boundary it can flip every sample, and stopping the fan on a single
//! cool reading produces the stop/restart oscillation this daemon exists to
//! avoid. The controller debounces it: a stop is issued only after the
//! stoppable condition has held continuously for the confirmation window, and
//! any single excursion out of range restarts the count from scratch.
//!
//! A matched range may carry a `threshold` that widens the ceiling for the
//! remainder of the current streak. Once adopted it persists even after the
//! temperature leaves the originally matched range, and on its own can keep a
//! streak alive with no current range match. It is cleared only when the
//! streak breaks or a stop is issued.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::{Config, StopRange};
use crate::ranges::classify;

/// Per-cycle decision. The delay is the sleep to apply before the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NoAction { delay: Duration },
    Stop { delay: Duration },
}

impl Action {
    pub fn delay(&self) -> Duration {
        match *self {
            Action::NoAction { delay } | Action::Stop { delay } => delay,
        }
    }
}

#[derive(Debug)]
pub struct Controller {
    ranges: Vec<StopRange>,
    confirm_window: Duration,
    delay_short: Duration,
    delay_long: Duration,
    /// When the current stoppable streak began; None when not accumulating.
    confirmation_started_at: Option<Instant>,
    /// Ceiling adopted from a matched range's `threshold` for this streak.
    active_threshold: Option<f64>,
}

impl Controller {
    pub fn new(cfg: &Config) -> Self {
        Self {
            ranges: cfg.ranges.clone(),
            confirm_window: cfg.confirm_window(),
            delay_short: cfg.delay_short(),
            delay_long: cfg.delay_long(),
            confirmation_started_at: None,
            active_threshold: None,
        }
    }

    pub fn delay_short(&self) -> Duration {
        self.delay_short
    }

    pub fn delay_long(&self) -> Duration {
        self.delay_long
    }

    /// One decision per poll cycle. Never fails; inputs are pre-validated.
    pub fn evaluate(&mut self, max_temp: f64, max_fan_speed: f64, now: Instant) -> Action {
        if max_fan_speed <= 0.0 {
            // Fan already stopped; nothing to confirm.
            self.reset();
            return Action::NoAction { delay: self.delay_long };
        }

        let matched = classify(max_temp, &self.ranges);
        if let Some(threshold) = matched.and_then(|r| r.threshold) {
            self.active_threshold = Some(threshold);
        }

        let stoppable =
            matched.is_some() || self.active_threshold.is_some_and(|t| max_temp <= t);

        if !stoppable {
            // One excursion out of range restarts confirmation from scratch.
            self.reset();
            return Action::NoAction { delay: self.delay_long };
        }

        match self.confirmation_started_at {
            None => {
                debug!(max_temp, "stoppable condition seen, starting confirmation");
                self.confirmation_started_at = Some(now);
                Action::NoAction { delay: self.delay_short }
            }
            Some(started) if now.duration_since(started) >= self.confirm_window => {
                debug!(max_temp, "confirmation window elapsed, issuing stop");
                self.reset();
                Action::Stop { delay: self.delay_short }
            }
            Some(_) => Action::NoAction { delay: self.delay_short },
        }
    }

    fn reset(&mut self) {
        self.confirmation_started_at = None;
        self.active_threshold = None;
    }
}
