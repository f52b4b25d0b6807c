//! Criterion benchmarks for the reconstruction hot path.
//!
//! Measures the per-message pipeline: wire decode → ladder merge →
//! snapshot with cumulative totals → highlight diff.
//!
//! Run: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use market_view::feed::{DepthUpdateMessage, FeedDecoder};
use market_view::highlight;
use market_view::ladder::BookLadder;
use types::ids::InstrumentId;
use types::market::HighlightConfig;

/// A realistic depth batch with `n` levels per side as decimal strings.
fn depth_message(n: usize, shift: usize) -> DepthUpdateMessage {
    let bids = (0..n)
        .map(|i| {
            (
                format!("{}.5", 2999 - i),
                format!("{}.25", 1 + (i + shift) % 9),
            )
        })
        .collect();
    let asks = (0..n)
        .map(|i| {
            (
                format!("{}.5", 3000 + i),
                format!("{}.75", 1 + (i + shift) % 7),
            )
        })
        .collect();
    DepthUpdateMessage { bids, asks }
}

fn bench_decode(c: &mut Criterion) {
    let msg = depth_message(25, 0);
    c.bench_function("decode_depth_25x2", |b| {
        b.iter(|| {
            let mut decoder = FeedDecoder::new();
            black_box(decoder.decode_depth(black_box(&msg)))
        })
    });
}

fn bench_merge_and_snapshot(c: &mut Criterion) {
    let mut decoder = FeedDecoder::new();
    let batches: Vec<_> = (0..10)
        .map(|shift| decoder.decode_depth(&depth_message(25, shift)))
        .collect();

    c.bench_function("merge_10_batches_snapshot", |b| {
        b.iter(|| {
            let mut ladder = BookLadder::new(InstrumentId::new("ETH/USDC"));
            for (i, batch) in batches.iter().enumerate() {
                ladder.apply_batch(black_box(batch), i as i64);
            }
            black_box(ladder.snapshot())
        })
    });
}

fn bench_highlight_diff(c: &mut Criterion) {
    let mut decoder = FeedDecoder::new();
    let mut ladder = BookLadder::new(InstrumentId::new("ETH/USDC"));
    ladder.apply_batch(&decoder.decode_depth(&depth_message(25, 0)), 1);
    let previous = ladder.snapshot();
    ladder.apply_batch(&decoder.decode_depth(&depth_message(25, 3)), 2);
    let fresh = ladder.snapshot();
    let cfg = HighlightConfig {
        price_tolerance: Decimal::new(1, 1),
        total_change_pct: Decimal::from(10),
    };

    c.bench_function("highlight_diff_25_levels", |b| {
        b.iter(|| {
            black_box(highlight::diff(
                black_box(fresh.bids.clone()),
                black_box(&previous.bids),
                2,
                &cfg,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_decode,
    bench_merge_and_snapshot,
    bench_highlight_diff
);
criterion_main!(benches);
