use chrono::{DateTime, Local};

/// Source of wall-clock time for file naming and alert timestamps.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
