//! Poll loop driver.
//!
//! Infinite read → decide → act → sleep cycle. The controller picks the sleep
//! duration each cycle; a failed or empty sensor read skips the decision
//! entirely (controller state untouched) and retries after the long delay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::actuator::FanStopper;
use crate::controller::{Action, Controller};
use crate::sensors::SensorSource;

/// Granularity of the inter-cycle sleep; bounds shutdown latency without
/// affecting the decision cadence.
const SLEEP_SLICE: Duration = Duration::from_millis(250);

pub fn run_loop(
    sensors: &dyn SensorSource,
    stopper: &dyn FanStopper,
    controller: &mut Controller,
    running: &AtomicBool,
) {
    info!("poll loop starting");
    while running.load(Ordering::SeqCst) {
        let delay = run_cycle(sensors, stopper, controller);
        sleep_interruptible(delay, running);
    }
    info!("poll loop stopped");
}

/// One read → decide → act cycle, split out of the loop for error handling
/// and tests. Returns the delay to sleep before the next cycle.
pub fn run_cycle(
    sensors: &dyn SensorSource,
    stopper: &dyn FanStopper,
    controller: &mut Controller,
) -> Duration {
    let snapshot = match sensors.read() {
        Ok(s) => s,
        Err(e) => {
            warn!("sensor read failed, skipping cycle: {e}");
            return controller.delay_long();
        }
    };

    let Some(max_temp) = snapshot.max_temp() else {
        warn!("empty sensor snapshot, skipping cycle");
        return controller.delay_long();
    };
    let max_fan = snapshot.max_fan_speed();
    debug!(max_temp, max_fan, "sampled sensors");

    match controller.evaluate(max_temp, max_fan, Instant::now()) {
        Action::Stop { delay } => {
            if let Err(e) = stopper.request_stop() {
                // Controller state was already reset; the next cycles rebuild
                // the streak and retry naturally if the condition still holds.
                error!("fan stop failed: {e}");
            }
            delay
        }
        Action::NoAction { delay } => delay,
    }
}

fn sleep_interruptible(total: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + total;
    while running.load(Ordering::SeqCst) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        std::thread::sleep(remaining.min(SLEEP_SLICE));
    }
}
