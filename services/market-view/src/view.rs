//! Per-instrument view state
//!
//! `MarketView` owns everything the engine maintains for one selected
//! instrument: the ladder, the previous highlighted snapshot, the candle
//! series, and the grouping tick. The caller creates one on instrument
//! select and drops it on instrument switch; any in-flight transforms for
//! the old instrument are the caller's to discard, never merged.
//!
//! There is exactly one writer (the event-delivery callback). Every update
//! is a synchronous transform that returns a fresh value snapshot, so the
//! presentation layer never observes partial mutation.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::market::Instrument;
use types::trade::TradePrint;

use crate::candles::{Candle, CandleError, CandleSeries};
use crate::feed::{DepthUpdateMessage, FeedDecoder, FeedStats, TradePrintMessage};
use crate::grouping::{GroupingError, GroupingSpec};
use crate::highlight;
use crate::ladder::{BookLadder, LadderSnapshot};
use crate::synthetic::{self, DepthDensity, SyntheticBook};

/// What the book panel should render.
///
/// Synthetic depth is labeled by the variant so the caller can style it
/// apart from real liquidity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookView {
    Real(LadderSnapshot),
    Synthetic(SyntheticBook),
}

/// Errors constructing a view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Grouping(#[from] GroupingError),

    #[error(transparent)]
    Candle(#[from] CandleError),
}

/// Live reconstruction state for one instrument.
#[derive(Debug)]
pub struct MarketView {
    instrument: Instrument,
    decoder: FeedDecoder,
    ladder: BookLadder,
    grouping: GroupingSpec,
    candles: CandleSeries,
    /// Previous highlighted snapshot, diffed against on each batch.
    previous: Option<LadderSnapshot>,
}

impl MarketView {
    /// Create a fresh view.
    ///
    /// `tick` must be in the instrument's allow-list and `bucket_secs`
    /// positive; both are caller configuration, so violations fail fast.
    pub fn new(instrument: Instrument, tick: Decimal, bucket_secs: i64) -> Result<Self, ViewError> {
        let grouping = GroupingSpec::new(tick, &instrument)?;
        let candles = CandleSeries::new(bucket_secs)?;
        let ladder = BookLadder::new(instrument.id.clone());
        debug!(instrument = %instrument.id, %tick, bucket_secs, "market view created");
        Ok(Self {
            instrument,
            decoder: FeedDecoder::new(),
            ladder,
            grouping,
            candles,
            previous: None,
        })
    }

    /// Apply one depth batch and return the highlighted snapshot.
    ///
    /// Decode → merge → diff against the previous snapshot → replace it.
    /// The returned snapshot is an immutable value object ready to render.
    pub fn apply_depth(&mut self, msg: &DepthUpdateMessage, now: i64) -> LadderSnapshot {
        let deltas = self.decoder.decode_depth(msg);
        self.ladder.apply_batch(&deltas, now);

        let raw = self.ladder.snapshot();
        let (prev_bids, prev_asks) = match &self.previous {
            Some(prev) => (prev.bids.as_slice(), prev.asks.as_slice()),
            None => (&[][..], &[][..]),
        };

        let cfg = &self.instrument.highlight;
        let snapshot = LadderSnapshot {
            instrument: raw.instrument,
            bids: highlight::diff(raw.bids, prev_bids, now, cfg),
            asks: highlight::diff(raw.asks, prev_asks, now, cfg),
            last_update: raw.last_update,
        };

        self.previous = Some(snapshot.clone());
        snapshot
    }

    /// Record one trade print into the candle series.
    ///
    /// Returns the decoded print (for the trade tape) or `None` when the
    /// wire entry was malformed and dropped.
    pub fn record_trade(&mut self, msg: &TradePrintMessage) -> Option<TradePrint> {
        let print = self.decoder.decode_trade(&self.instrument.id, msg)?;
        self.candles.push_trade(&print);
        Some(print)
    }

    /// The book to render: the real ladder, or fabricated placeholder depth
    /// around `reference_price` when the ladder is degenerate.
    pub fn book_view(&self, reference_price: Decimal, density: DepthDensity) -> BookView {
        self.book_view_with(&mut rand::thread_rng(), reference_price, density)
    }

    /// `book_view` with a caller-supplied RNG, for pinned-jitter tests.
    pub fn book_view_with<R: Rng>(
        &self,
        rng: &mut R,
        reference_price: Decimal,
        density: DepthDensity,
    ) -> BookView {
        if self.ladder.is_degenerate() {
            BookView::Synthetic(synthetic::generate_with(rng, reference_price, density))
        } else {
            BookView::Real(self.previous.clone().unwrap_or_else(|| self.ladder.snapshot()))
        }
    }

    /// Current candle series, ascending by bucket.
    pub fn candles(&self) -> Vec<Candle> {
        self.candles.candles()
    }

    /// Discard the candle series and start over with a new bucket width
    /// (timeframe switch).
    pub fn reset_candles(&mut self, bucket_secs: i64) -> Result<(), CandleError> {
        self.candles = CandleSeries::new(bucket_secs)?;
        debug!(instrument = %self.instrument.id, bucket_secs, "candle series reset");
        Ok(())
    }

    /// Group a price to the configured display tick.
    pub fn grouped_price(&self, price: Decimal) -> Decimal {
        self.grouping.round_to_tick(price)
    }

    /// The underlying ladder, for read-only queries (best prices, spread).
    pub fn ladder(&self) -> &BookLadder {
        &self.ladder
    }

    /// Feed decode counters.
    pub fn feed_stats(&self) -> FeedStats {
        self.decoder.stats()
    }

    /// Instrument this view tracks.
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }
}
