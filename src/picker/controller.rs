use crate::calendar::{CalendarDate, Clock, SystemClock};
use crate::error::Result;
use crate::picker::action::{Action, Effect, Update};
use crate::picker::grid::{Frame, GridBuilder};
use crate::picker::view_state::{ViewMode, ViewState, YearsRange};

/// The picker's state machine.
///
/// Every action validates and applies its change on a scratch copy of the
/// view state, rebuilds the frame, and only then commits, so a failing
/// action leaves the controller untouched.
pub struct SelectionController {
    selected: CalendarDate,
    view: ViewState,
    clock: Box<dyn Clock>,
}

impl SelectionController {
    pub fn new(selected: CalendarDate, clock: impl Clock + 'static) -> Self {
        Self {
            selected,
            view: ViewState::new(selected),
            clock: Box::new(clock),
        }
    }

    /// Starts on today's date, read from the local clock.
    pub fn today() -> Self {
        let clock = SystemClock;
        Self::new(clock.today(), clock)
    }

    pub fn selected_date(&self) -> CalendarDate {
        self.selected
    }

    pub fn mode(&self) -> ViewMode {
        self.view.mode()
    }

    pub fn cursor(&self) -> CalendarDate {
        self.view.cursor()
    }

    pub fn years_range(&self) -> Option<YearsRange> {
        self.view.years_range()
    }

    pub fn frame(&self) -> Result<Frame> {
        GridBuilder::build(&self.view, self.selected)
    }

    /// Replaces the selection and shows its month in the date grid.
    pub fn set_selected_date(&mut self, date: CalendarDate) -> Result<Frame> {
        let mut next = self.view.clone();
        next.reset_to(date);
        let frame = GridBuilder::build(&next, date)?;
        self.view = next;
        self.selected = date;
        log::debug!("selection set to {date}");
        Ok(frame)
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Update> {
        let mode = self.view.mode();
        let mut next = self.view.clone();
        let mut selected = self.selected;
        let mut effects = Vec::new();

        match (mode, action) {
            (ViewMode::DateGrid, Action::PagerNext) => next.shift_months(1)?,
            (ViewMode::DateGrid, Action::PagerPrev) => next.shift_months(-1)?,
            (ViewMode::DateGrid, Action::HeaderYearClicked) => {
                next.enter_year_grid(self.clock.today())?;
            }
            (ViewMode::DateGrid, Action::HeaderMonthClicked) => next.enter_month_grid(),
            (ViewMode::DateGrid, Action::DayPicked { date, popup_open }) => {
                if !popup_open {
                    log::debug!("dropped pick of {date}: popup is closed");
                    return Ok(Update::redraw(self.frame()?));
                }
                selected = date;
                next.reset_to(date);
                effects.push(Effect::Commit(date));
                effects.push(Effect::ClosePopup);
            }
            (ViewMode::YearGrid, Action::PagerNext) => {
                next.page_years(true)?;
            }
            (ViewMode::YearGrid, Action::PagerPrev) => {
                next.page_years(false)?;
            }
            (ViewMode::YearGrid, Action::YearPicked(year)) => {
                if !next.years_range().is_some_and(|range| range.contains(year)) {
                    log::debug!("dropped pick of {year}: not on the current year page");
                    return Ok(Update::redraw(self.frame()?));
                }
                next.set_cursor_year(year)?;
                next.enter_month_grid();
            }
            (ViewMode::MonthGrid, Action::PagerNext) => next.shift_years(1)?,
            (ViewMode::MonthGrid, Action::PagerPrev) => next.shift_years(-1)?,
            (ViewMode::MonthGrid, Action::MonthPicked(month)) => {
                next.set_cursor_month(month)?;
                next.enter_date_grid();
            }
            (mode, action) => {
                log::debug!("ignored {action:?} in {mode:?}");
                return Ok(Update::redraw(self.frame()?));
            }
        }

        let frame = GridBuilder::build(&next, selected)?;
        self.view = next;
        self.selected = selected;
        Ok(Update { frame, effects })
    }

    pub fn on_pager_next(&mut self) -> Result<Update> {
        self.dispatch(Action::PagerNext)
    }

    pub fn on_pager_prev(&mut self) -> Result<Update> {
        self.dispatch(Action::PagerPrev)
    }

    pub fn on_header_year_clicked(&mut self) -> Result<Update> {
        self.dispatch(Action::HeaderYearClicked)
    }

    pub fn on_header_month_clicked(&mut self) -> Result<Update> {
        self.dispatch(Action::HeaderMonthClicked)
    }

    pub fn on_day_picked(&mut self, date: CalendarDate, popup_open: bool) -> Result<Update> {
        self.dispatch(Action::DayPicked { date, popup_open })
    }

    pub fn on_year_picked(&mut self, year: i32) -> Result<Update> {
        self.dispatch(Action::YearPicked(year))
    }

    pub fn on_month_picked(&mut self, month: u32) -> Result<Update> {
        self.dispatch(Action::MonthPicked(month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::error::PickerError;
    use crate::picker::grid::{CellRole, CellValue, Header};

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d).expect("valid date")
    }

    fn controller(selected: CalendarDate) -> SelectionController {
        SelectionController::new(selected, FixedClock(date(2024, 6, 10)))
    }

    fn year_labels(frame: &Frame) -> Vec<i32> {
        frame
            .cells
            .iter()
            .filter_map(|c| match c.value {
                Some(CellValue::Year(y)) => Some(y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn date_pager_moves_cursor_by_month() {
        let mut ctl = controller(date(2022, 12, 20));
        let update = ctl.on_pager_next().expect("next");
        assert_eq!(ctl.cursor(), date(2023, 1, 1));
        assert_eq!(update.frame.header, Header::Date { year: 2023, month: 1 });
        assert!(update.effects.is_empty());

        ctl.on_pager_prev().expect("prev");
        ctl.on_pager_prev().expect("prev");
        assert_eq!(ctl.cursor(), date(2022, 11, 1));
        assert_eq!(ctl.selected_date(), date(2022, 12, 20));
    }

    #[test]
    fn day_pick_commits_and_closes() {
        let mut ctl = controller(date(2022, 1, 1));
        let update = ctl.on_day_picked(date(2022, 2, 14), true).expect("pick");
        assert_eq!(update.effects, [Effect::Commit(date(2022, 2, 14)), Effect::ClosePopup]);
        assert_eq!(update.committed(), Some(date(2022, 2, 14)));
        assert_eq!(ctl.selected_date(), date(2022, 2, 14));
        assert_eq!(ctl.cursor(), date(2022, 2, 1));
        assert_eq!(ctl.mode(), ViewMode::DateGrid);
    }

    #[test]
    fn day_pick_while_closed_is_dropped() {
        let mut ctl = controller(date(2022, 1, 1));
        let update = ctl.on_day_picked(date(2022, 1, 20), false).expect("pick");
        assert!(update.effects.is_empty());
        assert_eq!(ctl.selected_date(), date(2022, 1, 1));
        assert_eq!(ctl.cursor(), date(2022, 1, 1));
    }

    #[test]
    fn year_view_pages_in_sixteens() {
        let mut ctl = controller(date(2022, 1, 1));
        let update = ctl.on_header_year_clicked().expect("open");
        assert_eq!(update.frame.mode, ViewMode::YearGrid);
        assert_eq!(year_labels(&update.frame), (2016..=2031).collect::<Vec<_>>());

        let next = ctl.on_pager_next().expect("next");
        assert_eq!(year_labels(&next.frame), (2032..=2047).collect::<Vec<_>>());
        let back = ctl.on_pager_prev().expect("prev");
        assert_eq!(year_labels(&back.frame), (2016..=2031).collect::<Vec<_>>());
        let earlier = ctl.on_pager_prev().expect("prev");
        assert_eq!(year_labels(&earlier.frame), (2000..=2015).collect::<Vec<_>>());
        assert_eq!(ctl.cursor(), date(2022, 1, 1));
    }

    #[test]
    fn year_then_month_pick_returns_to_date_grid() {
        let mut ctl = controller(date(2022, 1, 1));
        ctl.on_header_year_clicked().expect("open");
        let months = ctl.on_year_picked(2019).expect("year");
        assert_eq!(months.frame.mode, ViewMode::MonthGrid);
        assert_eq!(months.frame.header, Header::Month { year: 2019 });
        assert!(months.frame.cells.iter().all(|c| !c.flags.is_selected));

        let grid = ctl.on_month_picked(8).expect("month");
        assert_eq!(grid.frame.mode, ViewMode::DateGrid);
        assert_eq!(grid.frame.header, Header::Date { year: 2019, month: 8 });
        assert_eq!(ctl.cursor(), date(2019, 8, 1));
        assert_eq!(grid.frame.cells.len(), 64);
        assert_eq!(ctl.selected_date(), date(2022, 1, 1));
    }

    #[test]
    fn year_pick_off_the_current_page_is_ignored() {
        let mut ctl = controller(date(2022, 1, 1));
        ctl.on_header_year_clicked().expect("open");
        for year in [2015, 2032, 1999] {
            let update = ctl.on_year_picked(year).expect("ignored");
            assert_eq!(update.frame.mode, ViewMode::YearGrid);
            assert_eq!(year_labels(&update.frame), (2016..=2031).collect::<Vec<_>>());
        }
        assert_eq!(ctl.cursor(), date(2022, 1, 1));

        ctl.on_pager_next().expect("next");
        let months = ctl.on_year_picked(2032).expect("year");
        assert_eq!(months.frame.header, Header::Month { year: 2032 });
    }

    #[test]
    fn month_pager_moves_cursor_by_year() {
        let mut ctl = controller(date(2022, 3, 15));
        ctl.on_header_month_clicked().expect("open");
        let update = ctl.on_pager_next().expect("next");
        assert_eq!(update.frame.header, Header::Month { year: 2023 });
        assert!(update.frame.cells.iter().all(|c| !c.flags.is_selected));
        let update = ctl.on_pager_prev().expect("prev");
        let active: Vec<&str> = update
            .frame
            .cells
            .iter()
            .filter(|c| c.flags.is_selected)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(active, ["3月"]);
    }

    #[test]
    fn actions_for_other_views_are_ignored() {
        let mut ctl = controller(date(2022, 1, 1));
        let update = ctl.on_year_picked(1999).expect("ignored");
        assert_eq!(update.frame.mode, ViewMode::DateGrid);
        assert_eq!(ctl.cursor(), date(2022, 1, 1));

        ctl.on_header_month_clicked().expect("open");
        let update = ctl
            .on_day_picked(date(2022, 1, 5), true)
            .expect("ignored");
        assert!(update.effects.is_empty());
        assert_eq!(ctl.mode(), ViewMode::MonthGrid);
        assert_eq!(ctl.selected_date(), date(2022, 1, 1));
    }

    #[test]
    fn invalid_month_leaves_state_untouched() {
        let mut ctl = controller(date(2022, 1, 1));
        ctl.on_header_month_clicked().expect("open");
        let err = ctl.on_month_picked(13).expect_err("month 13");
        assert!(matches!(err, PickerError::InvalidArgument(_)));
        assert_eq!(ctl.mode(), ViewMode::MonthGrid);
        assert_eq!(ctl.cursor(), date(2022, 1, 1));
    }

    #[test]
    fn set_selected_date_resets_cursor_and_view() {
        let mut ctl = controller(date(2022, 1, 1));
        ctl.on_header_year_clicked().expect("open");
        let frame = ctl.set_selected_date(date(2022, 3, 15)).expect("set");
        assert_eq!(frame.mode, ViewMode::DateGrid);
        assert_eq!(ctl.cursor(), date(2022, 3, 1));
        assert_eq!(ctl.years_range().map(|r| r.start()), Some(2016));

        let months = ctl.on_header_month_clicked().expect("open");
        let active: Vec<&str> = months
            .frame
            .cells
            .iter()
            .filter(|c| c.flags.is_selected)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(active, ["3月"]);
    }

    #[test]
    fn selected_day_is_marked_in_grid() {
        let ctl = controller(date(2022, 1, 1));
        let frame = ctl.frame().expect("frame");
        let selected: Vec<_> = frame
            .cells
            .iter()
            .filter(|c| c.flags.is_selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].role, CellRole::Day);
        assert!(selected[0].flags.is_saturday);
    }
}
