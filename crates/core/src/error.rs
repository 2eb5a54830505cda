use thiserror::Error;

/// Raised when a synchronized query value is coerced into a domain type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid shop id: {0}")]
    InvalidShopId(String),

    #[error("unknown delivery status: {0}")]
    UnknownDeliveryStatus(String),

    #[error("unknown payment status: {0}")]
    UnknownPaymentStatus(String),

    #[error("invalid date for {key}: {value}")]
    InvalidDate { key: String, value: String },

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("unknown date preset: {0}")]
    UnknownPreset(String),

    #[error("not a tracked filter key: {0}")]
    UnknownKey(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
