use serde::Serialize;

use crate::calendar::{self, CalendarDate, WEEKDAY_LABELS, iso_week_number, same_day, start_of_grid};
use crate::error::Result;
use crate::picker::view_state::{ViewMode, ViewState, YearsRange};

pub const GRID_WEEKS: usize = 7;
pub const DATE_GRID_CELLS: usize = 1 + 7 + GRID_WEEKS * 8;
pub const MONTH_GRID_CELLS: usize = 12;

// ── Cell ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellRole {
    Blank,
    Weekday,
    WeekNumber,
    Day,
    Year,
    Month,
}

/// What a pickable cell hands back to the controller when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Date(CalendarDate),
    Week(u32),
    Year(i32),
    Month(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellFlags {
    pub is_saturday: bool,
    pub is_sunday: bool,
    pub is_selected: bool,
    pub is_outside_cursor_month: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub role: CellRole,
    pub label: String,
    pub value: Option<CellValue>,
    pub flags: CellFlags,
}

impl Cell {
    fn blank() -> Self {
        Self {
            role: CellRole::Blank,
            label: String::new(),
            value: None,
            flags: CellFlags::default(),
        }
    }

    fn weekday(index: usize, label: &str) -> Self {
        Self {
            role: CellRole::Weekday,
            label: label.to_string(),
            value: None,
            flags: CellFlags {
                is_sunday: index == 0,
                is_saturday: index == 6,
                ..CellFlags::default()
            },
        }
    }

    fn week_number(week: u32) -> Self {
        Self {
            role: CellRole::WeekNumber,
            label: week.to_string(),
            value: Some(CellValue::Week(week)),
            flags: CellFlags::default(),
        }
    }

    fn day(date: CalendarDate, cursor: CalendarDate, selected: CalendarDate) -> Self {
        Self {
            role: CellRole::Day,
            label: date.day().to_string(),
            value: Some(CellValue::Date(date)),
            flags: CellFlags {
                is_saturday: date.is_saturday(),
                is_sunday: date.is_sunday(),
                is_selected: same_day(date, selected),
                is_outside_cursor_month: date.month() != cursor.month(),
            },
        }
    }

    /// Day, year and month cells react to clicks; headers do not.
    pub fn is_pickable(&self) -> bool {
        matches!(self.role, CellRole::Day | CellRole::Year | CellRole::Month)
    }
}

// ── Header & Frame ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Header {
    Date { year: i32, month: u32 },
    Years { start: i32, end: i32 },
    Month { year: i32 },
}

impl Header {
    pub fn label(&self) -> String {
        match self {
            Header::Date { year, month } => format!("{year}年 {month}月"),
            Header::Years { start, end } => format!("{start} - {end}"),
            Header::Month { year } => year.to_string(),
        }
    }
}

/// Everything the rendering surface needs to redraw the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub mode: ViewMode,
    pub header: Header,
    pub selected: CalendarDate,
    pub cells: Vec<Cell>,
}

// ── GridBuilder ───────────────────────────────────────────────────────────────

pub struct GridBuilder;

impl GridBuilder {
    /// Regenerates the whole frame for the active view.
    pub fn build(view: &ViewState, selected: CalendarDate) -> Result<Frame> {
        let cursor = view.cursor();
        let (header, cells) = match (view.mode(), view.years_range()) {
            (ViewMode::DateGrid, _) => (
                Header::Date {
                    year: cursor.year(),
                    month: cursor.month(),
                },
                Self::date_cells(cursor, selected)?,
            ),
            (ViewMode::YearGrid, Some(range)) => (
                Header::Years {
                    start: range.start(),
                    end: range.end(),
                },
                Self::year_cells(range, selected),
            ),
            (ViewMode::YearGrid, None) => {
                // ViewState never enters the year grid without a window.
                log::warn!("year grid requested before its window was set");
                (
                    Header::Month {
                        year: cursor.year(),
                    },
                    Vec::new(),
                )
            }
            (ViewMode::MonthGrid, _) => (
                Header::Month {
                    year: cursor.year(),
                },
                Self::month_cells(cursor, selected),
            ),
        };
        log::trace!("rebuilt {:?}: {} cells", view.mode(), cells.len());
        Ok(Frame {
            mode: view.mode(),
            header,
            selected,
            cells,
        })
    }

    /// Corner blank, seven weekday headers, then per week a week number
    /// followed by seven days.
    pub fn date_cells(cursor: CalendarDate, selected: CalendarDate) -> Result<Vec<Cell>> {
        let mut cells = Vec::with_capacity(DATE_GRID_CELLS);
        cells.push(Cell::blank());
        for (index, label) in WEEKDAY_LABELS.iter().enumerate() {
            cells.push(Cell::weekday(index, label));
        }

        let start = start_of_grid(cursor)?;
        for week in 0..GRID_WEEKS {
            let row_start = start.add_days((week * 7) as i64)?;
            cells.push(Cell::week_number(iso_week_number(row_start)?));
            for offset in 0..7 {
                let date = row_start.add_days(offset)?;
                cells.push(Cell::day(date, cursor, selected));
            }
        }
        Ok(cells)
    }

    pub fn year_cells(range: YearsRange, selected: CalendarDate) -> Vec<Cell> {
        range
            .years()
            .map(|year| Cell {
                role: CellRole::Year,
                label: year.to_string(),
                value: Some(CellValue::Year(year)),
                flags: CellFlags {
                    is_selected: year == selected.year(),
                    ..CellFlags::default()
                },
            })
            .collect()
    }

    pub fn month_cells(cursor: CalendarDate, selected: CalendarDate) -> Vec<Cell> {
        (1..=MONTH_GRID_CELLS as u32)
            .map(|month| Cell {
                role: CellRole::Month,
                label: calendar::month_label(month),
                value: Some(CellValue::Month(month)),
                flags: CellFlags {
                    is_selected: selected.year() == cursor.year() && selected.month() == month,
                    ..CellFlags::default()
                },
            })
            .collect()
    }
}
