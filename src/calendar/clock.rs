use chrono::Local;

use super::date::CalendarDate;

/// Source of "today", injected so the year picker's default window is testable.
pub trait Clock: Send {
    fn today(&self) -> CalendarDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::from(Local::now().date_naive())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
