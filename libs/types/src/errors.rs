//! Error types for the core type layer
//!
//! Error taxonomy using thiserror. Stream-level noise (malformed prices and
//! sizes on the wire) surfaces here as `NumericError`; the ingestion layer
//! drops and counts it rather than propagating.

use thiserror::Error;

/// Errors constructing numeric values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}
