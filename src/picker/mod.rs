pub mod action;
pub mod controller;
pub mod grid;
pub mod view_state;
pub mod widget;

pub use action::{Action, Effect, Update};
pub use controller::SelectionController;
pub use grid::{Cell, CellFlags, CellRole, CellValue, Frame, GridBuilder, Header};
pub use view_state::{ViewMode, ViewState, YearsRange};
pub use widget::{DatePicker, Popup, RenderSurface};
