//! Market-side and instrument configuration types
//!
//! `Side` labels the two halves of the book. `Instrument` carries the
//! per-instrument presentation configuration the engine is parameterized
//! by: the enumerated tick-size allow-list and the highlight thresholds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::InstrumentId;

/// Order book side (bid or ask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy side (bid)
    BID,
    /// Sell side (ask)
    ASK,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BID => Side::ASK,
            Side::ASK => Side::BID,
        }
    }
}

/// Thresholds for level-change highlight detection.
///
/// `price_tolerance` is the absolute distance within which a new level is
/// considered the same logical level as a previous one. `total_change_pct`
/// is the relative change in cumulative total (percent) above which the
/// level is flagged as matched.
///
/// Both are per-instrument: an absolute tolerance that suits a $60,000
/// market is meaningless on a $0.0001 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Absolute price distance for level identity.
    pub price_tolerance: Decimal,
    /// Relative cumulative-total change (percent) that triggers a highlight.
    pub total_change_pct: Decimal,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            // 0.1 absolute, 10 percent
            price_tolerance: Decimal::new(1, 1),
            total_change_pct: Decimal::from(10),
        }
    }
}

/// Per-instrument configuration for the reconstruction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Instrument identifier.
    pub id: InstrumentId,
    /// Enumerated tick sizes allowed for price grouping on this instrument.
    pub tick_sizes: Vec<Decimal>,
    /// Highlight detection thresholds.
    pub highlight: HighlightConfig,
}

impl Instrument {
    /// Create an instrument with the default tick-size set and thresholds.
    pub fn new(id: InstrumentId) -> Self {
        Self {
            id,
            tick_sizes: default_tick_sizes(),
            highlight: HighlightConfig::default(),
        }
    }

    /// Replace the tick-size allow-list.
    pub fn with_tick_sizes(mut self, tick_sizes: Vec<Decimal>) -> Self {
        self.tick_sizes = tick_sizes;
        self
    }

    /// Replace the highlight thresholds.
    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.highlight = highlight;
        self
    }

    /// Whether `tick` is in this instrument's allow-list.
    pub fn allows_tick(&self, tick: Decimal) -> bool {
        self.tick_sizes.iter().any(|t| *t == tick)
    }
}

/// Default tick-size allow-list: 0.0001 up to 10 in decade steps.
pub fn default_tick_sizes() -> Vec<Decimal> {
    vec![
        Decimal::new(1, 4),
        Decimal::new(1, 3),
        Decimal::new(1, 2),
        Decimal::new(1, 1),
        Decimal::ONE,
        Decimal::TEN,
    ]
}
