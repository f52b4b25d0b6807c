//! Trade print types
//!
//! A trade print is one executed trade as delivered on the public feed:
//! price, size, and an exchange timestamp in Unix seconds. Prints are the
//! raw input of client-side candle aggregation.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{InstrumentId, TradeId};
use crate::numeric::{Price, Quantity};

/// A single executed trade on the public feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePrint {
    /// Unique trade identifier.
    pub trade_id: TradeId,
    /// Instrument this trade executed on.
    pub instrument: InstrumentId,
    /// Execution price.
    pub price: Price,
    /// Traded size.
    pub size: Quantity,
    /// Execution timestamp, Unix seconds.
    pub timestamp: i64,
}

impl TradePrint {
    /// Create a trade print with a fresh identifier.
    pub fn new(instrument: InstrumentId, price: Price, size: Quantity, timestamp: i64) -> Self {
        Self {
            trade_id: TradeId::new(),
            instrument,
            price,
            size,
            timestamp,
        }
    }

    /// Notional value of the trade (price × size).
    pub fn value(&self) -> Decimal {
        self.price.as_decimal() * self.size.as_decimal()
    }

    /// Execution time as a UTC datetime, if the timestamp is representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }
}
