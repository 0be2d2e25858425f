use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::shared::constants::POLL_INTERVAL;

use super::check_camera_use_case::CycleReport;
use super::scheduler::Scheduler;

/// A unit of work the monitor loop runs on every tick.
pub trait MonitorCycle {
    fn run_cycle(&mut self) -> Result<CycleReport, Box<dyn std::error::Error>>;
}

/// Runs a cycle at a fixed interval until shut down.
///
/// A failing or panicking cycle is logged and the loop keeps going; only
/// the shutdown flag ends it.
pub struct MonitorLoop {
    interval: Duration,
    poll_interval: Duration,
    shutdown: Arc<AtomicBool>,
}

impl MonitorLoop {
    pub fn new(interval: Duration, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            interval,
            poll_interval: POLL_INTERVAL,
            shutdown,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Block until shutdown is requested. Returns the number of cycles run.
    pub fn run(&self, cycle: &mut dyn MonitorCycle) -> usize {
        log::info!(
            "Monitoring started, checking every {}s",
            self.interval.as_secs_f64()
        );
        let mut scheduler = Scheduler::new(self.interval, Instant::now());
        let mut cycles = 0;

        while !self.shutdown.load(Ordering::Relaxed) {
            if scheduler.is_due(Instant::now()) {
                run_guarded(cycle);
                cycles += 1;
                scheduler.mark_ran(Instant::now());
            }
            std::thread::sleep(self.poll_interval);
        }

        log::info!("Monitoring stopped after {cycles} cycle(s)");
        cycles
    }
}

fn run_guarded(cycle: &mut dyn MonitorCycle) {
    match panic::catch_unwind(AssertUnwindSafe(|| cycle.run_cycle())) {
        Ok(Ok(report)) => log::debug!("Cycle finished: {report:?}"),
        Ok(Err(e)) => log::error!("Cycle failed: {e}"),
        Err(payload) => log::error!("Cycle panicked: {}", panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
