pub mod input_event;
pub mod terminal;

pub use input_event::{KeyCode, KeyEvent, KeyModifiers};
pub use terminal::Terminal;
