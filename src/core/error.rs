//! Error kinds surfaced to the presenter

use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Coarse classification handed to [`crate::core::Presenter::on_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidInput,
    DataUnavailable,
    ComputationError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ErrorKind::InvalidInput => "invalid input",
                ErrorKind::DataUnavailable => "data unavailable",
                ErrorKind::ComputationError => "computation error",
            }
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("{0}")]
    InvalidInput(String),

    /// Every current-price provider failed. The payload carries the provider detail
    /// for logs; users only see the generic message.
    #[error("Failed to load market data. Please try again later.")]
    DataUnavailable(String),

    #[error("computation error: {0}")]
    Computation(String),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::InvalidInput(_) => ErrorKind::InvalidInput,
            CalcError::DataUnavailable(_) => ErrorKind::DataUnavailable,
            CalcError::Computation(_) => ErrorKind::ComputationError,
        }
    }
}
