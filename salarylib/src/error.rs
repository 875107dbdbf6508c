//! Единый тип ошибок публичного API.

use serde::Serialize;
use thiserror::Error;

/// Ошибки ввода: строгий разбор суммы и проверка формы сотрудника.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum ValidationError {
    #[error("{0} is required")]
    EmptyField(&'static str),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("amount cannot be negative")]
    NegativeAmount,

    #[error("amount must be greater than 0 and at most 1000000")]
    OutOfRange,

    #[error("at most 2 digits after the decimal separator")]
    PrecisionExceeded,

    #[error("a salary for at least one month is required")]
    NoSalaryProvided,

    #[error("the form has errors, fix them before submitting")]
    SubmitBlocked,
}

#[derive(Debug, Error)]
pub enum SalaryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, SalaryError>;

pub(crate) fn xml<E: std::fmt::Display>(e: E) -> SalaryError {
    SalaryError::Xml(e.to_string())
}
