pub mod calendar;
pub mod config;
pub mod error;
pub mod picker;
pub mod terminal;
pub mod ui;

pub use calendar::{CalendarDate, Clock, FixedClock, SystemClock};
pub use config::PickerConfig;
pub use error::{PickerError, Result};
pub use picker::{
    Action, Cell, CellFlags, CellRole, CellValue, DatePicker, Effect, Frame, GridBuilder, Header,
    Popup, RenderSurface, SelectionController, Update, ViewMode, ViewState, YearsRange,
};
