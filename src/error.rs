use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("year {year} is outside the supported calendar range")]
    OutOfRange { year: i64 },
    #[error("the element for selector `{0}` was not found")]
    TargetNotFound(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PickerError>;
