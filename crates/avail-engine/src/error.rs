//! Error types for availability computation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    /// Storefront or service missing, or the service belongs to another storefront.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Inverted or oversized date range.
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// A rule or drop that violates its construction invariants.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Malformed or unknown IANA timezone on the storefront.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A collaborator fetch failed. The whole computation aborts; partial
    /// availability is never returned.
    #[error("Data source failure: {0}")]
    DataSource(String),

    /// The caller's cancel flag was raised mid-computation.
    #[error("Computation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
