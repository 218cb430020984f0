use std::num::TryFromIntError;

use thiserror::Error;

/// Jenks Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JenksErr {
    #[error("You can't specify 0 classes. Try a positive number")]
    TooFewClasses,
    #[error("You can't generate {requested} classes from {available} distinct data values")]
    TooManyClasses { requested: usize, available: usize },
    #[error("Values must be strictly ascending, but the value at index {index} is not")]
    NotAscending { index: usize },
    #[error("The count at index {index} is zero: every value must occur at least once")]
    ZeroCount { index: usize },
    #[error("The value at index {index} is not a finite number")]
    InvalidValue { index: usize },
    #[error("The total count up to index {index} is too large to classify in this float type")]
    Overflow { index: usize },
    #[error("At least one data value is required")]
    EmptyInput,
    #[error("An error occurred during numeric conversion")]
    ConversionError,
}

impl From<TryFromIntError> for JenksErr {
    fn from(_: TryFromIntError) -> Self {
        JenksErr::ConversionError
    }
}
