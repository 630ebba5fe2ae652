//! Wall-clock hour used to window the hourly forecast.

use chrono::Timelike;

pub trait Clock: Send + Sync {
    /// Hour of day, 0-23.
    fn current_hour(&self) -> u32;
}

/// The host's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn current_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_hour(&self) -> u32 {
        self.0
    }
}
