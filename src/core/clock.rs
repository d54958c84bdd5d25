use chrono::{Local, NaiveDate, NaiveDateTime};

/// Clock abstracts access to the current wall-clock time so totals and
/// reminders stay deterministic in tests.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local date. Defaults to `now().date()`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Midnight at the start of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
