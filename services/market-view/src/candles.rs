//! OHLCV candle aggregation
//!
//! Two modes back the chart:
//! - **Raw-trade mode**: buckets individual trade prints into fixed-width
//!   time windows client-side. Buckets key a `BTreeMap` so export order is
//!   deterministic; re-aggregating the same prints yields an identical
//!   series.
//! - **Batch mode**: server rows arrive pre-bucketed but with an
//!   inconsistent pair of time fields. `normalize_rows` repairs the shape
//!   (documented precedence: `open_time`, then `timestamp`; both absent is
//!   an explicit error) and sorts ascending. No aggregation math here;
//!   that happened upstream.
//!
//! All arithmetic uses `Decimal`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use types::trade::TradePrint;

/// Default bucket width for client-side aggregation, seconds.
pub const DEFAULT_BUCKET_SECS: i64 = 60;

/// Errors in candle shape repair and series construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandleError {
    #[error("candle row {index} has neither open_time nor timestamp")]
    MissingTime { index: usize },

    #[error("bucket width must be positive, got {0}")]
    InvalidBucketWidth(i64),
}

/// A single OHLCV candle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, Unix seconds, aligned to the bucket width.
    pub bucket_start: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub trade_count: u64,
}

impl Candle {
    /// Create a candle from the first trade in its bucket.
    fn new(bucket_start: i64, price: Decimal, size: Decimal) -> Self {
        Self {
            bucket_start,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: size,
            trade_count: 1,
        }
    }

    /// Fold one more trade into the candle.
    ///
    /// Callers must feed trades in ascending time order; `close` always
    /// reflects the chronologically-latest trade.
    fn update(&mut self, price: Decimal, size: Decimal) {
        if price > self.high {
            self.high = price;
        }
        if price < self.low {
            self.low = price;
        }
        self.close = price;
        self.volume += size;
        self.trade_count += 1;
    }

    /// Validate candle integrity (OHLCV invariants).
    pub fn is_valid(&self) -> bool {
        self.high >= self.open
            && self.high >= self.close
            && self.high >= self.low
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= Decimal::ZERO
    }
}

/// Client-side aggregated candle series for one chart view.
///
/// Accumulates for the lifetime of the view; discarded and rebuilt on
/// timeframe or instrument change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleSeries {
    bucket_secs: i64,
    buckets: BTreeMap<i64, Candle>,
}

impl CandleSeries {
    /// Create an empty series with the given bucket width.
    pub fn new(bucket_secs: i64) -> Result<Self, CandleError> {
        if bucket_secs <= 0 {
            return Err(CandleError::InvalidBucketWidth(bucket_secs));
        }
        Ok(Self {
            bucket_secs,
            buckets: BTreeMap::new(),
        })
    }

    /// Aggregate a set of trade prints in one pass.
    ///
    /// Prints are sorted ascending by timestamp before folding, so input
    /// order does not matter and re-running over the same set produces an
    /// identical series. Empty input yields an empty series.
    pub fn aggregate(trades: &[TradePrint], bucket_secs: i64) -> Result<Self, CandleError> {
        let mut series = Self::new(bucket_secs)?;
        let mut ordered: Vec<&TradePrint> = trades.iter().collect();
        ordered.sort_by_key(|t| t.timestamp);
        for trade in ordered {
            series.push_trade(trade);
        }
        Ok(series)
    }

    /// Fold a single trade print into its bucket.
    ///
    /// Trades must arrive in wire (ascending-time) order for `close` to be
    /// correct; the batch path sorts, this incremental path trusts the feed.
    /// Zero-size prints carry no volume and are skipped.
    pub fn push_trade(&mut self, trade: &TradePrint) {
        let size = trade.size.as_decimal();
        if size.is_zero() {
            warn!(
                instrument = %trade.instrument,
                timestamp = trade.timestamp,
                "skipping zero-size trade print"
            );
            return;
        }

        let bucket_start = self.bucket_start(trade.timestamp);
        let price = trade.price.as_decimal();
        self.buckets
            .entry(bucket_start)
            .and_modify(|candle| candle.update(price, size))
            .or_insert_with(|| Candle::new(bucket_start, price, size));
    }

    /// The bucket a timestamp falls into: floor to the bucket width.
    pub fn bucket_start(&self, timestamp: i64) -> i64 {
        timestamp.div_euclid(self.bucket_secs) * self.bucket_secs
    }

    /// Candles in ascending bucket order.
    pub fn candles(&self) -> Vec<Candle> {
        self.buckets.values().cloned().collect()
    }

    /// The candle for a specific bucket start, if any.
    pub fn get(&self, bucket_start: i64) -> Option<&Candle> {
        self.buckets.get(&bucket_start)
    }

    /// Bucket width, seconds.
    pub fn bucket_secs(&self) -> i64 {
        self.bucket_secs
    }

    /// Number of buckets with at least one trade.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// A pre-bucketed candle row as the history endpoint delivers it.
///
/// Either time field may be absent; the pair is reconciled by
/// `normalize_rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCandleRow {
    #[serde(default)]
    pub open_time: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    #[serde(default)]
    pub trade_count: Option<u64>,
}

impl ServerCandleRow {
    /// Bucket time with documented precedence: `open_time`, then
    /// `timestamp`.
    fn bucket_time(&self) -> Option<i64> {
        self.open_time.or(self.timestamp)
    }
}

/// Repair and validate server-bucketed rows for charting.
///
/// Each row's missing time field defaults from the other; a row with both
/// absent is rejected outright rather than silently coerced. Output is
/// sorted ascending by bucket time. No aggregation math is performed.
pub fn normalize_rows(rows: &[ServerCandleRow]) -> Result<Vec<Candle>, CandleError> {
    let mut candles = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let bucket_start = row
            .bucket_time()
            .ok_or(CandleError::MissingTime { index })?;
        candles.push(Candle {
            bucket_start,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            trade_count: row.trade_count.unwrap_or(0),
        });
    }
    candles.sort_by_key(|c| c.bucket_start);
    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::InstrumentId;
    use types::numeric::{Price, Quantity};

    fn print(price: &str, size: &str, timestamp: i64) -> TradePrint {
        TradePrint::new(
            InstrumentId::new("ETH/USDC"),
            Price::from_str(price).unwrap(),
            Quantity::from_str(size).unwrap(),
            timestamp,
        )
    }

    #[test]
    fn test_empty_input_empty_series() {
        let series = CandleSeries::aggregate(&[], 60).unwrap();
        assert!(series.is_empty());
        assert!(series.candles().is_empty());
    }

    #[test]
    fn test_invalid_bucket_width_rejected() {
        assert_eq!(
            CandleSeries::new(0).unwrap_err(),
            CandleError::InvalidBucketWidth(0)
        );
        assert!(CandleSeries::new(-60).is_err());
    }

    #[test]
    fn test_two_bucket_scenario() {
        let trades = vec![
            print("100", "1", 0),
            print("105", "2", 30),
            print("98", "1", 65),
        ];
        let series = CandleSeries::aggregate(&trades, 60).unwrap();
        let candles = series.candles();
        assert_eq!(candles.len(), 2);

        let first = &candles[0];
        assert_eq!(first.bucket_start, 0);
        assert_eq!(first.open, Decimal::from(100));
        assert_eq!(first.high, Decimal::from(105));
        assert_eq!(first.low, Decimal::from(100));
        assert_eq!(first.close, Decimal::from(105));
        assert_eq!(first.volume, Decimal::from(3));
        assert_eq!(first.trade_count, 2);

        let second = &candles[1];
        assert_eq!(second.bucket_start, 60);
        assert_eq!(second.open, Decimal::from(98));
        assert_eq!(second.high, Decimal::from(98));
        assert_eq!(second.low, Decimal::from(98));
        assert_eq!(second.close, Decimal::from(98));
        assert_eq!(second.volume, Decimal::from(1));
        assert_eq!(second.trade_count, 1);
    }

    #[test]
    fn test_close_tracks_latest_trade_not_input_order() {
        // Shuffled input: the 30s trade is listed before the 10s trade.
        let trades = vec![print("105", "1", 30), print("100", "1", 10)];
        let series = CandleSeries::aggregate(&trades, 60).unwrap();
        let candle = &series.candles()[0];

        assert_eq!(candle.open, Decimal::from(100));
        assert_eq!(candle.close, Decimal::from(105));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let trades = vec![
            print("100", "1", 5),
            print("101.5", "0.5", 20),
            print("99.25", "2", 61),
            print("100.75", "1", 119),
            print("103", "3", 125),
        ];
        let a = CandleSeries::aggregate(&trades, 60).unwrap();
        let b = CandleSeries::aggregate(&trades, 60).unwrap();
        assert_eq!(a.candles(), b.candles());
    }

    #[test]
    fn test_candle_invariants_hold() {
        let trades = vec![
            print("100", "1", 0),
            print("97", "1", 10),
            print("104", "1", 20),
            print("101", "1", 30),
        ];
        let series = CandleSeries::aggregate(&trades, 60).unwrap();
        for candle in series.candles() {
            assert!(candle.is_valid());
            assert!(candle.low <= candle.open.min(candle.close));
            assert!(candle.high >= candle.open.max(candle.close));
        }
    }

    #[test]
    fn test_incremental_push_matches_batch() {
        let trades = vec![
            print("100", "1", 5),
            print("102", "2", 40),
            print("101", "1", 70),
        ];

        let mut incremental = CandleSeries::new(60).unwrap();
        for trade in &trades {
            incremental.push_trade(trade);
        }
        let batch = CandleSeries::aggregate(&trades, 60).unwrap();
        assert_eq!(incremental.candles(), batch.candles());
    }

    #[test]
    fn test_zero_size_print_skipped() {
        let mut series = CandleSeries::new(60).unwrap();
        series.push_trade(&print("100", "0", 5));
        assert!(series.is_empty());
    }

    #[test]
    fn test_bucket_alignment() {
        let series = CandleSeries::new(DEFAULT_BUCKET_SECS).unwrap();
        assert_eq!(series.bucket_start(0), 0);
        assert_eq!(series.bucket_start(59), 0);
        assert_eq!(series.bucket_start(60), 60);
        assert_eq!(series.bucket_start(1_708_123_456), 1_708_123_440);
        // Floor semantics also below the epoch.
        assert_eq!(series.bucket_start(-30), -60);
    }

    #[test]
    fn test_get_by_bucket() {
        let trades = vec![print("100", "1", 5)];
        let series = CandleSeries::aggregate(&trades, 60).unwrap();
        assert!(series.get(0).is_some());
        assert!(series.get(60).is_none());
    }

    fn row(open_time: Option<i64>, timestamp: Option<i64>) -> ServerCandleRow {
        ServerCandleRow {
            open_time,
            timestamp,
            open: Decimal::from(100),
            high: Decimal::from(110),
            low: Decimal::from(95),
            close: Decimal::from(105),
            volume: Decimal::from(12),
            trade_count: Some(4),
        }
    }

    #[test]
    fn test_normalize_prefers_open_time() {
        let rows = vec![row(Some(120), Some(999))];
        let candles = normalize_rows(&rows).unwrap();
        assert_eq!(candles[0].bucket_start, 120);
    }

    #[test]
    fn test_normalize_falls_back_to_timestamp() {
        let rows = vec![row(None, Some(180))];
        let candles = normalize_rows(&rows).unwrap();
        assert_eq!(candles[0].bucket_start, 180);
    }

    #[test]
    fn test_normalize_rejects_rows_with_no_time() {
        let rows = vec![row(Some(60), None), row(None, None)];
        assert_eq!(
            normalize_rows(&rows).unwrap_err(),
            CandleError::MissingTime { index: 1 }
        );
    }

    #[test]
    fn test_normalize_sorts_ascending() {
        let rows = vec![row(Some(180), None), row(Some(60), None), row(Some(120), None)];
        let candles = normalize_rows(&rows).unwrap();
        let times: Vec<_> = candles.iter().map(|c| c.bucket_start).collect();
        assert_eq!(times, vec![60, 120, 180]);
    }

    #[test]
    fn test_server_row_deserialization() {
        let json = r#"{"timestamp": 300, "open": "1.5", "high": "2", "low": "1", "close": "1.75", "volume": "40"}"#;
        let row: ServerCandleRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.bucket_time(), Some(300));
        assert_eq!(row.trade_count, None);

        let candles = normalize_rows(&[row]).unwrap();
        assert_eq!(candles[0].close, Decimal::from_str_exact("1.75").unwrap());
        assert_eq!(candles[0].trade_count, 0);
    }

    #[test]
    fn test_candle_serialization_roundtrip() {
        let trades = vec![print("100", "1", 5)];
        let series = CandleSeries::aggregate(&trades, 60).unwrap();
        let candle = &series.candles()[0];

        let json = serde_json::to_string(candle).unwrap();
        let back: Candle = serde_json::from_str(&json).unwrap();
        assert_eq!(*candle, back);
    }
}
