use std::convert::Infallible;
use thiserror::Error;

/// Errors raised while building search parameters or consuming results
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("{what} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        what: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

impl SearchError {
    pub(crate) fn out_of_range(what: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            what: what.into(),
            value,
            min,
            max,
        }
    }
}

impl From<Infallible> for SearchError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
