use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::error::{PickerError, Result};

pub const DEFAULT_SELECTOR: &str = "#date";

/// Gap between the input and the popup.
pub const DEFAULT_POPUP_OFFSET: u16 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// Input the picker attaches to.
    pub selector: String,
    /// `YYYY-MM-DD`; today when absent.
    pub initial_date: Option<String>,
    /// Write the initial date into the input on construction.
    pub apply_to_input: bool,
    pub popup_offset: u16,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            initial_date: None,
            apply_to_input: true,
            popup_offset: DEFAULT_POPUP_OFFSET,
        }
    }
}

impl PickerConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|err| PickerError::Config(err.to_string()))?;
        config.initial_date()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| PickerError::Config(format!("{}: {err}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn with_initial_date(mut self, date: CalendarDate) -> Self {
        self.initial_date = Some(date.format());
        self
    }

    pub fn initial_date(&self) -> Result<Option<CalendarDate>> {
        self.initial_date
            .as_deref()
            .map(CalendarDate::parse)
            .transpose()
    }
}
