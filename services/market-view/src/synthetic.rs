//! Synthetic placeholder depth
//!
//! When the real book is empty or negligible, the front-end still renders a
//! ladder; this module fabricates a plausible one around a reference price.
//! The output is presentation-only; the caller labels it so synthetic depth
//! is never mistaken for real liquidity.
//!
//! Volumes carry a small multiplicative jitter for visual variety, so output
//! is intentionally non-deterministic. The RNG is injectable: tests seed a
//! `StdRng` and assert exact levels.

use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Levels fabricated per side.
pub const SYNTHETIC_LEVELS: usize = 10;

/// How much fabricated depth to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthDensity {
    Light,
    Medium,
    Heavy,
}

impl DepthDensity {
    /// Multiplier applied to both step width and level volume.
    pub fn factor(&self) -> u32 {
        match self {
            DepthDensity::Light => 1,
            DepthDensity::Medium => 2,
            DepthDensity::Heavy => 3,
        }
    }
}

/// One fabricated price level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticLevel {
    pub price: Decimal,
    pub size: Decimal,
    pub cumulative_total: Decimal,
}

/// A fabricated ladder around a reference price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticBook {
    /// Bids in descending price order (best first), all below the reference.
    pub bids: Vec<SyntheticLevel>,
    /// Asks in ascending price order (best first), all above the reference.
    pub asks: Vec<SyntheticLevel>,
    /// Spread between the innermost levels, percent of the reference price.
    pub spread_pct: Decimal,
}

impl SyntheticBook {
    /// An empty book, produced when no usable reference price exists.
    pub fn empty() -> Self {
        Self {
            bids: Vec::new(),
            asks: Vec::new(),
            spread_pct: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Fabricate a ladder around `reference_price` using the thread RNG.
pub fn generate(reference_price: Decimal, density: DepthDensity) -> SyntheticBook {
    generate_with(&mut rand::thread_rng(), reference_price, density)
}

/// Fabricate a ladder around `reference_price` with a caller-supplied RNG.
///
/// Step width scales inversely with price magnitude (tight ladders on
/// expensive assets), multiplied by the density factor. Level volume grows
/// roughly linearly with distance from the top, perturbed by jitter in
/// [0.85, 1.15]. A non-positive reference yields an empty book.
pub fn generate_with<R: Rng>(
    rng: &mut R,
    reference_price: Decimal,
    density: DepthDensity,
) -> SyntheticBook {
    if reference_price <= Decimal::ZERO {
        return SyntheticBook::empty();
    }

    let factor = Decimal::from(density.factor());
    let step = base_step_pct(reference_price) * factor;

    let mut bids = Vec::with_capacity(SYNTHETIC_LEVELS);
    let mut asks = Vec::with_capacity(SYNTHETIC_LEVELS);
    let mut bid_total = Decimal::ZERO;
    let mut ask_total = Decimal::ZERO;

    for i in 1..=SYNTHETIC_LEVELS {
        let offset = reference_price * step * Decimal::from(i);
        let base_size = Decimal::from(i as u32 * density.factor());

        let bid_size = base_size * jitter(rng);
        bid_total += bid_size;
        bids.push(SyntheticLevel {
            price: reference_price - offset,
            size: bid_size,
            cumulative_total: bid_total,
        });

        let ask_size = base_size * jitter(rng);
        ask_total += ask_size;
        asks.push(SyntheticLevel {
            price: reference_price + offset,
            size: ask_size,
            cumulative_total: ask_total,
        });
    }

    // Innermost synthetic levels are one step either side of the reference.
    let spread_pct = (asks[0].price - bids[0].price) / reference_price * Decimal::ONE_HUNDRED;

    SyntheticBook {
        bids,
        asks,
        spread_pct,
    }
}

/// Step percentage tier for the reference price magnitude.
///
/// 0.02% above 5000, widening to 0.2% at or below 50.
fn base_step_pct(reference_price: Decimal) -> Decimal {
    if reference_price > Decimal::from(5000) {
        Decimal::new(2, 4) // 0.0002
    } else if reference_price > Decimal::ONE_THOUSAND {
        Decimal::new(5, 4) // 0.0005
    } else if reference_price > Decimal::from(200) {
        Decimal::new(1, 3) // 0.001
    } else if reference_price > Decimal::from(50) {
        Decimal::new(15, 4) // 0.0015
    } else {
        Decimal::new(2, 3) // 0.002
    }
}

/// Multiplicative volume jitter in [0.85, 1.15].
fn jitter<R: Rng>(rng: &mut R) -> Decimal {
    let sample: f64 = rng.gen_range(0.85..1.15);
    Decimal::from_f64(sample).unwrap_or(Decimal::ONE)
}
