use std::time::{Duration, Instant};

/// Fixed-interval job timing.
///
/// The first run is due one interval after creation. Each completed run
/// pushes the next one to a full interval after it finished, so a cycle that
/// overruns never leaves a backlog of missed runs behind.
///
/// A next run that lies beyond the range of [`Instant`] is never due.
#[derive(Clone, Debug)]
pub struct Scheduler {
    interval: Duration,
    next_run: Option<Instant>,
}

impl Scheduler {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_run: now.checked_add(interval),
        }
    }

    pub fn next_run(&self) -> Option<Instant> {
        self.next_run
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_run.is_some_and(|next| now >= next)
    }

    /// Record a run that finished at `finished`.
    pub fn mark_ran(&mut self, finished: Instant) {
        self.next_run = finished.checked_add(self.interval);
    }
}
