//! Unique identifier types for market-data entities
//!
//! Trade identifiers use UUID v7 for time-sortable ordering, enabling
//! chronological queries over trade tapes without a separate sequence field.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a trade print
///
/// Uses UUID v7 for time-based sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    /// Create a new TradeId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Instrument identifier
///
/// Spot pairs use "BASE/QUOTE" (e.g. "ETH/USDC"); perpetual markets use
/// "BASE-PERP" (e.g. "ETH-PERP").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    /// Create a new InstrumentId from a string
    ///
    /// # Panics
    /// Panics if the symbol is not in BASE/QUOTE or BASE-PERP form
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::try_new(symbol).expect("InstrumentId must be BASE/QUOTE or BASE-PERP")
    }

    /// Try to create an InstrumentId, returning None if invalid
    pub fn try_new(symbol: impl Into<String>) -> Option<Self> {
        let s = symbol.into();
        if s.contains('/') || s.ends_with("-PERP") {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Get the symbol string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a perpetual market
    pub fn is_perp(&self) -> bool {
        self.0.ends_with("-PERP")
    }

    /// The base asset symbol
    pub fn base(&self) -> &str {
        match self.0.split_once('/') {
            Some((base, _)) => base,
            None => self.0.trim_end_matches("-PERP"),
        }
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
