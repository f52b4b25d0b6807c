//! Wire-shape decoding for the market-data feed
//!
//! The market-data collaborator delivers depth batches and trade prints
//! with prices and sizes as decimal strings:
//!
//! ```text
//! { "bids": [["2999.5","1.2"], ...], "asks": [["3000.5","0.8"], ...] }
//! { "price": "3000.1", "size": "0.25", "timestamp": 1708123456 }
//! ```
//!
//! A size of `"0"` denotes removal of that level. Market-data streams carry
//! occasional noise; entries that fail decimal parsing or violate the sign
//! invariants are dropped here with a warning and counted, never propagated
//! as errors. Well-formed entries in the same batch are unaffected.

use serde::{Deserialize, Serialize};
use tracing::warn;
use types::errors::NumericError;
use types::ids::{InstrumentId, TradeId};
use types::market::Side;
use types::numeric::{Price, Quantity};
use types::trade::TradePrint;
use uuid::Uuid;

use crate::ladder::DepthDelta;

/// A raw depth-delta batch as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthUpdateMessage {
    /// Bid entries as `[price, size]` decimal-string pairs.
    #[serde(default)]
    pub bids: Vec<(String, String)>,
    /// Ask entries as `[price, size]` decimal-string pairs.
    #[serde(default)]
    pub asks: Vec<(String, String)>,
}

/// A raw trade print as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePrintMessage {
    /// Exchange trade identifier, when the venue provides one.
    #[serde(default)]
    pub id: Option<String>,
    /// Execution price as a decimal string.
    pub price: String,
    /// Traded size as a decimal string.
    pub size: String,
    /// Execution timestamp, Unix seconds.
    pub timestamp: i64,
}

/// Running counters over decoded wire entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Entries decoded successfully.
    pub accepted: u64,
    /// Malformed entries dropped.
    pub dropped: u64,
}

/// Decodes wire messages into typed deltas and prints.
///
/// Stateless apart from its counters; one decoder per instrument stream.
#[derive(Debug, Default)]
pub struct FeedDecoder {
    stats: FeedStats,
}

impl FeedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a depth batch, preserving wire order within each side
    /// (bids first, then asks, matching the message layout).
    ///
    /// Malformed entries are dropped and counted; the rest of the batch
    /// goes through untouched.
    pub fn decode_depth(&mut self, msg: &DepthUpdateMessage) -> Vec<DepthDelta> {
        let mut deltas = Vec::with_capacity(msg.bids.len() + msg.asks.len());
        for (price, size) in &msg.bids {
            if let Some(delta) = self.decode_entry(Side::BID, price, size) {
                deltas.push(delta);
            }
        }
        for (price, size) in &msg.asks {
            if let Some(delta) = self.decode_entry(Side::ASK, price, size) {
                deltas.push(delta);
            }
        }
        deltas
    }

    fn decode_entry(&mut self, side: Side, price: &str, size: &str) -> Option<DepthDelta> {
        match parse_entry(price, size) {
            Ok((price, size)) => {
                self.stats.accepted += 1;
                Some(DepthDelta { side, price, size })
            }
            Err(err) => {
                self.stats.dropped += 1;
                warn!(?side, raw_price = price, raw_size = size, %err, "dropping malformed depth entry");
                None
            }
        }
    }

    /// Decode a trade print.
    ///
    /// Prints with unparseable or non-positive price/size are dropped. A
    /// missing or unparseable venue id gets a fresh time-sortable one.
    pub fn decode_trade(
        &mut self,
        instrument: &InstrumentId,
        msg: &TradePrintMessage,
    ) -> Option<TradePrint> {
        let parsed = Price::from_str(&msg.price).and_then(|price| {
            let size = Quantity::from_str(&msg.size)?;
            if size.is_zero() {
                return Err(NumericError::InvalidQuantity(msg.size.clone()));
            }
            Ok((price, size))
        });

        match parsed {
            Ok((price, size)) => {
                self.stats.accepted += 1;
                Some(TradePrint {
                    trade_id: parse_trade_id(msg.id.as_deref()),
                    instrument: instrument.clone(),
                    price,
                    size,
                    timestamp: msg.timestamp,
                })
            }
            Err(err) => {
                self.stats.dropped += 1;
                warn!(
                    %instrument,
                    raw_price = %msg.price,
                    raw_size = %msg.size,
                    %err,
                    "dropping malformed trade print"
                );
                None
            }
        }
    }

    /// Counters since creation.
    pub fn stats(&self) -> FeedStats {
        self.stats
    }
}

/// Parse one `[price, size]` pair.
///
/// Price must be strictly positive; size non-negative (zero = removal).
fn parse_entry(price: &str, size: &str) -> Result<(Price, Quantity), NumericError> {
    let price = Price::from_str(price)?;
    let size = Quantity::from_str(size)?;
    Ok((price, size))
}

fn parse_trade_id(raw: Option<&str>) -> TradeId {
    raw.and_then(|s| Uuid::parse_str(s).ok())
        .map(TradeId::from_uuid)
        .unwrap_or_default()
}
