//! Level-change highlight detection
//!
//! Diffs a fresh ladder snapshot against the previous one and flags levels
//! whose cumulative total moved materially, so the UI can replay a
//! highlight animation.
//!
//! Each level carries a `match_key` that is stable per logical update
//! event, decoupled from price identity: a fresh key is minted for new
//! levels and for material changes, and carried over unchanged otherwise.
//! Consumers animate against key churn, not against price equality.
//!
//! Thresholds come from the per-instrument `HighlightConfig`.

use rust_decimal::Decimal;
use types::market::HighlightConfig;
use types::numeric::Price;

use crate::ladder::PriceLevel;

/// Diff `new_levels` (one side of a fresh snapshot) against `previous`
/// (the same side of the prior snapshot).
///
/// With no prior snapshot, pass an empty slice: every level is a first
/// observation and comes back unmatched with a fresh key.
pub fn diff(
    new_levels: Vec<PriceLevel>,
    previous: &[PriceLevel],
    now: i64,
    config: &HighlightConfig,
) -> Vec<PriceLevel> {
    new_levels
        .into_iter()
        .map(|mut level| {
            match find_previous(previous, level.price, config.price_tolerance) {
                None => {
                    // First observation of this level.
                    level.match_key = mint_key(level.price, now);
                    level.is_matched = false;
                }
                Some(prev) => {
                    if total_change_pct(prev, &level) > config.total_change_pct {
                        level.match_key = mint_key(level.price, now);
                        level.is_matched = true;
                    } else {
                        level.match_key = prev.match_key.clone();
                        level.last_updated = prev.last_updated;
                        level.is_matched = false;
                    }
                }
            }
            level
        })
        .collect()
}

/// Locate the previous level within an absolute price tolerance.
fn find_previous<'a>(
    previous: &'a [PriceLevel],
    price: Price,
    tolerance: Decimal,
) -> Option<&'a PriceLevel> {
    previous
        .iter()
        .find(|prev| (prev.price.as_decimal() - price.as_decimal()).abs() <= tolerance)
}

/// Relative change in cumulative total between two observations, percent.
fn total_change_pct(prev: &PriceLevel, new: &PriceLevel) -> Decimal {
    let old = prev.cumulative_total.as_decimal();
    let new = new.cumulative_total.as_decimal();
    if old.is_zero() {
        if new.is_zero() {
            Decimal::ZERO
        } else {
            // Anything out of nothing is a material change.
            Decimal::ONE_HUNDRED
        }
    } else {
        ((new - old) / old).abs() * Decimal::ONE_HUNDRED
    }
}

/// A key unique per (price, update instant) pair.
fn mint_key(price: Price, now: i64) -> String {
    format!("{}-{}", price, now)
}
