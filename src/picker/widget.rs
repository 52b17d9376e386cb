use crate::calendar::{CalendarDate, Clock, SystemClock};
use crate::config::PickerConfig;
use crate::error::{PickerError, Result};
use crate::picker::action::{Action, Effect};
use crate::picker::controller::SelectionController;
use crate::picker::grid::Frame;
use crate::picker::view_state::ViewMode;

// ── RenderSurface ─────────────────────────────────────────────────────────────

/// The UI the picker draws into: a DOM, a terminal, a test recorder.
pub trait RenderSurface {
    /// Whatever a click lands on.
    type Target;

    /// Looks up the input for `selector`; `false` when it does not exist.
    fn attach_input(&mut self, selector: &str) -> bool;

    fn is_input(&self, target: &Self::Target) -> bool;

    fn is_descendant_of_container(&self, target: &Self::Target) -> bool;

    fn write_input(&mut self, text: &str);

    fn set_popup_visible(&mut self, visible: bool);

    fn redraw(&mut self, frame: &Frame);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Popup {
    #[default]
    Closed,
    Open,
}

// ── DatePicker ────────────────────────────────────────────────────────────────

/// A picker bound to one input on a rendering surface.
pub struct DatePicker<S: RenderSurface> {
    surface: S,
    controller: SelectionController,
    popup: Popup,
}

impl<S: RenderSurface> DatePicker<S> {
    pub fn new(surface: S, config: &PickerConfig) -> Result<Self> {
        Self::with_clock(surface, config, SystemClock)
    }

    pub fn with_clock(
        mut surface: S,
        config: &PickerConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        if !surface.attach_input(&config.selector) {
            return Err(PickerError::TargetNotFound(config.selector.clone()));
        }
        let initial = config.initial_date()?;
        let selected = initial.unwrap_or_else(|| clock.today());
        let controller = SelectionController::new(selected, clock);
        let frame = controller.frame()?;

        if initial.is_some() && config.apply_to_input {
            surface.write_input(&selected.format());
        }
        surface.set_popup_visible(false);
        surface.redraw(&frame);

        Ok(Self {
            surface,
            controller,
            popup: Popup::Closed,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn popup(&self) -> Popup {
        self.popup
    }

    pub fn is_open(&self) -> bool {
        self.popup == Popup::Open
    }

    pub fn mode(&self) -> ViewMode {
        self.controller.mode()
    }

    pub fn frame(&self) -> Result<Frame> {
        self.controller.frame()
    }

    pub fn get_date(&self) -> CalendarDate {
        self.controller.selected_date()
    }

    pub fn set_date(&mut self, date: CalendarDate, apply_to_input: bool) -> Result<()> {
        let frame = self.controller.set_selected_date(date)?;
        if apply_to_input {
            self.surface.write_input(&date.format());
        }
        self.surface.redraw(&frame);
        Ok(())
    }

    /// Parses `text` first; a malformed date changes nothing.
    pub fn set_date_text(&mut self, text: &str, apply_to_input: bool) -> Result<()> {
        let date = CalendarDate::parse(text)?;
        self.set_date(date, apply_to_input)
    }

    pub fn on_input_clicked(&mut self) -> Result<()> {
        self.popup = Popup::Open;
        self.surface.set_popup_visible(true);
        let frame = self.controller.frame()?;
        self.surface.redraw(&frame);
        Ok(())
    }

    /// Any click on the page: closes the popup unless it hit the input or
    /// landed inside the popup itself.
    pub fn on_document_clicked(&mut self, target: &S::Target) {
        if self.surface.is_input(target) || self.surface.is_descendant_of_container(target) {
            return;
        }
        self.close();
    }

    pub fn pager_next(&mut self) -> Result<ViewMode> {
        self.apply(Action::PagerNext)
    }

    pub fn pager_prev(&mut self) -> Result<ViewMode> {
        self.apply(Action::PagerPrev)
    }

    pub fn header_year_clicked(&mut self) -> Result<ViewMode> {
        self.apply(Action::HeaderYearClicked)
    }

    pub fn header_month_clicked(&mut self) -> Result<ViewMode> {
        self.apply(Action::HeaderMonthClicked)
    }

    pub fn pick_day(&mut self, date: CalendarDate) -> Result<ViewMode> {
        self.apply(Action::DayPicked {
            date,
            popup_open: self.is_open(),
        })
    }

    pub fn pick_year(&mut self, year: i32) -> Result<ViewMode> {
        self.apply(Action::YearPicked(year))
    }

    pub fn pick_month(&mut self, month: u32) -> Result<ViewMode> {
        self.apply(Action::MonthPicked(month))
    }

    /// Runs one action through the controller and plays its effects on the
    /// surface. Day picks are gated on the popup's current state as well as
    /// the flag the caller supplied.
    pub fn apply(&mut self, action: Action) -> Result<ViewMode> {
        let action = match action {
            Action::DayPicked { date, popup_open } => Action::DayPicked {
                date,
                popup_open: popup_open && self.is_open(),
            },
            other => other,
        };
        let update = self.controller.dispatch(action)?;
        for effect in &update.effects {
            match effect {
                Effect::Commit(date) => self.surface.write_input(&date.format()),
                Effect::ClosePopup => self.close(),
            }
        }
        self.surface.redraw(&update.frame);
        Ok(update.frame.mode)
    }

    fn close(&mut self) {
        if self.popup == Popup::Closed {
            return;
        }
        log::debug!("popup closed");
        self.popup = Popup::Closed;
        self.surface.set_popup_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Spot {
        Input,
        Popup,
        Elsewhere,
    }

    #[derive(Default)]
    struct Recorder {
        input: String,
        visible: bool,
        redraws: usize,
    }

    impl RenderSurface for Recorder {
        type Target = Spot;

        fn attach_input(&mut self, selector: &str) -> bool {
            selector == "#date"
        }

        fn is_input(&self, target: &Spot) -> bool {
            *target == Spot::Input
        }

        fn is_descendant_of_container(&self, target: &Spot) -> bool {
            *target == Spot::Popup
        }

        fn write_input(&mut self, text: &str) {
            self.input = text.to_string();
        }

        fn set_popup_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn redraw(&mut self, _frame: &Frame) {
            self.redraws += 1;
        }
    }

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::new(y, m, d).expect("valid date")
    }

    fn picker() -> DatePicker<Recorder> {
        DatePicker::with_clock(
            Recorder::default(),
            &PickerConfig::default(),
            FixedClock(date(2022, 1, 1)),
        )
        .expect("picker")
    }

    #[test]
    fn missing_input_fails_fast() {
        let config = PickerConfig::default().with_selector("#nope");
        let err = DatePicker::with_clock(Recorder::default(), &config, FixedClock(date(2022, 1, 1)))
            .err()
            .expect("should fail");
        assert_eq!(err, PickerError::TargetNotFound("#nope".to_string()));
    }

    #[test]
    fn starts_closed_on_today_without_writing_input() {
        let picker = picker();
        assert_eq!(picker.get_date(), date(2022, 1, 1));
        assert!(!picker.is_open());
        assert_eq!(picker.surface().input, "");
    }

    #[test]
    fn configured_initial_date_is_written() {
        let config = PickerConfig::default().with_initial_date(date(2021, 7, 4));
        let picker = DatePicker::with_clock(Recorder::default(), &config, FixedClock(date(2022, 1, 1)))
            .expect("picker");
        assert_eq!(picker.get_date(), date(2021, 7, 4));
        assert_eq!(picker.surface().input, "2021-07-04");
    }

    #[test]
    fn set_date_respects_apply_flag() {
        let mut picker = picker();
        picker.set_date(date(2023, 5, 6), false).expect("set");
        assert_eq!(picker.get_date(), date(2023, 5, 6));
        assert_eq!(picker.surface().input, "");
        picker.set_date(date(2023, 5, 7), true).expect("set");
        assert_eq!(picker.surface().input, "2023-05-07");
    }

    #[test]
    fn bad_text_changes_nothing() {
        let mut picker = picker();
        let err = picker.set_date_text("2023-02-29", true).expect_err("invalid");
        assert!(matches!(err, PickerError::InvalidArgument(_)));
        assert_eq!(picker.get_date(), date(2022, 1, 1));
        assert_eq!(picker.surface().input, "");
    }

    #[test]
    fn click_outside_closes_but_inside_does_not() {
        let mut picker = picker();
        picker.on_input_clicked().expect("open");
        assert!(picker.surface().visible);

        picker.on_document_clicked(&Spot::Popup);
        picker.on_document_clicked(&Spot::Input);
        assert!(picker.is_open());

        picker.on_document_clicked(&Spot::Elsewhere);
        assert!(!picker.is_open());
        assert!(!picker.surface().visible);
    }

    #[test]
    fn pick_writes_input_and_closes() {
        let mut picker = picker();
        picker.on_input_clicked().expect("open");
        picker.pick_day(date(2022, 1, 19)).expect("pick");
        assert_eq!(picker.get_date(), date(2022, 1, 19));
        assert_eq!(picker.surface().input, "2022-01-19");
        assert!(!picker.is_open());
    }

    #[test]
    fn pick_after_close_is_ignored() {
        let mut picker = picker();
        picker.on_input_clicked().expect("open");
        picker.on_document_clicked(&Spot::Elsewhere);
        picker.pick_day(date(2022, 1, 19)).expect("pick");
        picker
            .apply(Action::DayPicked {
                date: date(2022, 1, 20),
                popup_open: true,
            })
            .expect("pick");
        assert_eq!(picker.get_date(), date(2022, 1, 1));
        assert_eq!(picker.surface().input, "");
    }
}
