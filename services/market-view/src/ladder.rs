//! In-memory order book ladder
//!
//! Maintains the bid/ask ladder from incremental depth deltas.
//! Uses `BTreeMap` keyed by `Price` for deterministic sorted iteration.
//! All arithmetic uses `Decimal`.
//!
//! Depth semantics are absolute: a delta carries the new total size at a
//! price, never an increment. Size zero removes the level. Within a batch
//! deltas are applied in array order, so the last write at a price wins.
//!
//! Cumulative totals are recomputed per side on snapshot export by folding
//! from the best price outward. This is O(n) per batch; ladders are tens of
//! levels deep.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::ids::InstrumentId;
use types::market::Side;
use types::numeric::{Price, Quantity};

/// An incremental change to one price level.
///
/// `size` is the new absolute size at `price`; zero means the level is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthDelta {
    /// Which side of the book changed.
    pub side: Side,
    /// The price level that changed.
    pub price: Price,
    /// New total size at this level (zero = level removed).
    pub size: Quantity,
}

/// One row of an exported ladder snapshot.
///
/// `match_key` and `is_matched` are presentation state filled in by the
/// highlight detector; the ladder itself exports them fresh and unmatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// The price of this level.
    pub price: Price,
    /// Total size resting at this level.
    pub size: Quantity,
    /// Running total from the best price out to this level.
    pub cumulative_total: Quantity,
    /// Stable key per logical update event, for highlight animation replay.
    pub match_key: String,
    /// Unix seconds of the last delta that touched this level.
    pub last_updated: i64,
    /// Whether the level changed materially since the previous snapshot.
    pub is_matched: bool,
}

/// An immutable snapshot of the full ladder at a point in time.
///
/// Bids are in descending price order, asks ascending (best price first on
/// both sides). Handed to the presentation layer as a value object; the
/// ladder it was taken from keeps mutating independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderSnapshot {
    pub instrument: InstrumentId,
    /// Bids in descending price order (best first).
    pub bids: Vec<PriceLevel>,
    /// Asks in ascending price order (best first).
    pub asks: Vec<PriceLevel>,
    /// Unix seconds of the last applied batch.
    pub last_update: i64,
}

/// Size and freshness stored per resting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LevelEntry {
    size: Quantity,
    last_updated: i64,
}

/// The maintained bid/ask ladder for a single instrument.
///
/// Created empty on instrument select, replaced wholesale on instrument
/// switch, mutated in place as delta batches arrive. A pure synchronous
/// transform: nothing here blocks, and readers only ever see exported
/// snapshots.
#[derive(Debug, Clone)]
pub struct BookLadder {
    instrument: InstrumentId,
    /// Bid levels (BTreeMap ascending; iterated in reverse for best-first).
    bids: BTreeMap<Price, LevelEntry>,
    /// Ask levels (ascending = best ask first).
    asks: BTreeMap<Price, LevelEntry>,
    /// Unix seconds of the last applied batch.
    last_update: i64,
    /// Deltas applied since creation.
    deltas_applied: u64,
}

impl BookLadder {
    /// Create an empty ladder for the given instrument.
    pub fn new(instrument: InstrumentId) -> Self {
        Self {
            instrument,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            last_update: 0,
            deltas_applied: 0,
        }
    }

    /// Apply a batch of deltas in array order.
    ///
    /// Last write wins per price within the batch. A delta that leaves the
    /// effective size unchanged is still applied and refreshes the level's
    /// `last_updated`. Removing an absent level is a no-op.
    pub fn apply_batch(&mut self, deltas: &[DepthDelta], now: i64) {
        for delta in deltas {
            self.apply(delta, now);
        }
        self.last_update = now;
        debug!(
            instrument = %self.instrument,
            batch_len = deltas.len(),
            bid_depth = self.bids.len(),
            ask_depth = self.asks.len(),
            "applied depth batch"
        );
    }

    fn apply(&mut self, delta: &DepthDelta, now: i64) {
        let levels = match delta.side {
            Side::BID => &mut self.bids,
            Side::ASK => &mut self.asks,
        };

        if delta.size.is_zero() {
            levels.remove(&delta.price);
        } else {
            levels.insert(
                delta.price,
                LevelEntry {
                    size: delta.size,
                    last_updated: now,
                },
            );
        }
        self.deltas_applied += 1;
    }

    /// Export an immutable snapshot with cumulative totals.
    ///
    /// Cumulative totals fold from the best price outward, so they are
    /// non-decreasing walking away from the top of the book.
    pub fn snapshot(&self) -> LadderSnapshot {
        LadderSnapshot {
            instrument: self.instrument.clone(),
            bids: accumulate(self.bids.iter().rev()),
            asks: accumulate(self.asks.iter()),
            last_update: self.last_update,
        }
    }

    /// Current best bid price.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    /// Current best ask price.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// Mid-market price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => {
                Some((bid.as_decimal() + ask.as_decimal()) / Decimal::TWO)
            }
            _ => None,
        }
    }

    /// Spread between best ask and best bid.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.as_decimal() - bid.as_decimal()),
            _ => None,
        }
    }

    /// Total resting size on the bid side.
    pub fn total_bid_size(&self) -> Decimal {
        self.bids.values().map(|e| e.size.as_decimal()).sum()
    }

    /// Total resting size on the ask side.
    pub fn total_ask_size(&self) -> Decimal {
        self.asks.values().map(|e| e.size.as_decimal()).sum()
    }

    /// Whether the book is empty or negligible on either side.
    ///
    /// A degenerate book is not an error; it signals the caller to
    /// substitute synthetic placeholder depth.
    pub fn is_degenerate(&self) -> bool {
        self.bids.is_empty()
            || self.asks.is_empty()
            || self.total_bid_size().is_zero()
            || self.total_ask_size().is_zero()
    }

    /// Number of bid price levels.
    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels.
    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    /// Deltas applied since creation.
    pub fn deltas_applied(&self) -> u64 {
        self.deltas_applied
    }

    /// Instrument this ladder tracks.
    pub fn instrument(&self) -> &InstrumentId {
        &self.instrument
    }
}

/// Fold levels best-first into snapshot rows with running totals.
fn accumulate<'a>(levels: impl Iterator<Item = (&'a Price, &'a LevelEntry)>) -> Vec<PriceLevel> {
    let mut running = Quantity::zero();
    levels
        .map(|(price, entry)| {
            running = running + entry.size;
            PriceLevel {
                price: *price,
                size: entry.size,
                cumulative_total: running,
                match_key: String::new(),
                last_updated: entry.last_updated,
                is_matched: false,
            }
        })
        .collect()
}
