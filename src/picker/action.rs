use crate::calendar::CalendarDate;
use crate::picker::grid::Frame;

/// A discrete user input forwarded by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PagerNext,
    PagerPrev,
    HeaderYearClicked,
    HeaderMonthClicked,
    /// `popup_open` is the surface's visibility at the time of the click;
    /// picks arriving while closed (e.g. during the close animation) are dropped.
    DayPicked {
        date: CalendarDate,
        popup_open: bool,
    },
    YearPicked(i32),
    MonthPicked(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The selection changed; the input should show the new value.
    Commit(CalendarDate),
    ClosePopup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub frame: Frame,
    pub effects: Vec<Effect>,
}

impl Update {
    pub fn redraw(frame: Frame) -> Self {
        Self {
            frame,
            effects: Vec::new(),
        }
    }

    pub fn committed(&self) -> Option<CalendarDate> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Commit(date) => Some(*date),
            Effect::ClosePopup => None,
        })
    }
}
