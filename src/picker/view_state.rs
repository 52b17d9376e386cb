use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::error::{PickerError, Result};

pub const YEARS_PER_PAGE: i32 = 16;

/// Offset of the default year window's start from the current year.
const YEARS_BEFORE_TODAY: i32 = 8;

// ── ViewMode ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    DateGrid,
    YearGrid,
    MonthGrid,
}

// ── YearsRange ────────────────────────────────────────────────────────────────

/// A page of the year picker: sixteen consecutive years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearsRange {
    start: i32,
    end: i32,
}

impl YearsRange {
    pub fn starting_at(start: i32) -> Result<Self> {
        let min = NaiveDate::MIN.year();
        let max = NaiveDate::MAX.year();
        let end = start
            .checked_add(YEARS_PER_PAGE - 1)
            .ok_or(PickerError::OutOfRange { year: i64::from(start) })?;
        if start < min {
            return Err(PickerError::OutOfRange { year: i64::from(start) });
        }
        if end > max {
            return Err(PickerError::OutOfRange { year: i64::from(end) });
        }
        Ok(Self { start, end })
    }

    /// The window shown the first time the year picker opens.
    pub fn around(year: i32) -> Result<Self> {
        Self::starting_at(year.saturating_sub(YEARS_BEFORE_TODAY))
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years().contains(&year)
    }

    pub fn next(self) -> Result<Self> {
        Self::starting_at(self.end.saturating_add(1))
    }

    pub fn prev(self) -> Result<Self> {
        Self::starting_at(self.start.saturating_sub(YEARS_PER_PAGE))
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }
}

// ── ViewState ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ViewState {
    mode: ViewMode,
    cursor: CalendarDate,
    years_range: Option<YearsRange>,
}

impl ViewState {
    pub fn new(selected: CalendarDate) -> Self {
        Self {
            mode: ViewMode::DateGrid,
            cursor: selected.first_of_month(),
            years_range: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn cursor(&self) -> CalendarDate {
        self.cursor
    }

    pub fn years_range(&self) -> Option<YearsRange> {
        self.years_range
    }

    pub fn enter_date_grid(&mut self) {
        self.switch(ViewMode::DateGrid);
        self.cursor = self.cursor.first_of_month();
    }

    /// Opens the year picker. The window is created from `today` only on the
    /// first visit and kept for the rest of the widget's life.
    pub fn enter_year_grid(&mut self, today: CalendarDate) -> Result<YearsRange> {
        let range = match self.years_range {
            Some(range) => range,
            None => YearsRange::around(today.year())?,
        };
        self.years_range = Some(range);
        self.switch(ViewMode::YearGrid);
        Ok(range)
    }

    pub fn enter_month_grid(&mut self) {
        self.switch(ViewMode::MonthGrid);
    }

    /// Moves the cursor back onto `selected`'s month and shows the date grid.
    pub fn reset_to(&mut self, selected: CalendarDate) {
        self.cursor = selected.first_of_month();
        self.switch(ViewMode::DateGrid);
    }

    pub fn shift_months(&mut self, delta: i32) -> Result<()> {
        self.cursor = self.cursor.add_months(delta)?;
        Ok(())
    }

    pub fn shift_years(&mut self, delta: i32) -> Result<()> {
        self.cursor = self.cursor.add_years(delta)?;
        Ok(())
    }

    pub fn set_cursor_year(&mut self, year: i32) -> Result<()> {
        self.cursor = self.cursor.with_year(year)?;
        Ok(())
    }

    pub fn set_cursor_month(&mut self, month: u32) -> Result<()> {
        self.cursor = self.cursor.with_month(month)?;
        Ok(())
    }

    pub fn page_years(&mut self, forward: bool) -> Result<YearsRange> {
        let current = self.years_range.ok_or_else(|| {
            PickerError::InvalidArgument("year window is not open".to_string())
        })?;
        let next = if forward { current.next()? } else { current.prev()? };
        self.years_range = Some(next);
        Ok(next)
    }

    fn switch(&mut self, mode: ViewMode) {
        if self.mode != mode {
            log::debug!("view {:?} -> {:?} (cursor {})", self.mode, mode, self.cursor);
        }
        self.mode = mode;
    }
}
