pub mod clock;
pub mod date;

pub use clock::{Clock, FixedClock, SystemClock};
pub use date::{CalendarDate, iso_week_number, same_day, start_of_grid};

/// Column headers of the date grid, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

pub fn month_label(month: u32) -> String {
    format!("{month}月")
}
