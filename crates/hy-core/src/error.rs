use thiserror::Error;

pub type HyResult<T> = Result<T, HyError>;

/// Errors raised by the shared numeric helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HyError {
    /// NaN or an infinity reached a physical quantity.
    #[error("Non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
