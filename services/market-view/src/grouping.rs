//! Tick-size price grouping
//!
//! Rounds prices to an instrument's display tick. Tick sizes come from the
//! instrument's enumerated allow-list, never arbitrary input, so rounding
//! is always exact at a known decimal precision. `Decimal` arithmetic keeps
//! the result drift-free at any magnitude.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use types::ids::InstrumentId;
use types::market::Instrument;

/// Errors selecting a grouping tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingError {
    #[error("tick size {tick} is not allowed for {instrument}")]
    TickNotAllowed {
        tick: Decimal,
        instrument: InstrumentId,
    },
}

/// A validated price-grouping tick for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingSpec {
    tick: Decimal,
}

impl GroupingSpec {
    /// Select a tick from the instrument's allow-list.
    ///
    /// A tick outside the list is a programmer error and fails fast.
    pub fn new(tick: Decimal, instrument: &Instrument) -> Result<Self, GroupingError> {
        if !instrument.allows_tick(tick) {
            return Err(GroupingError::TickNotAllowed {
                tick,
                instrument: instrument.id.clone(),
            });
        }
        Ok(Self { tick })
    }

    /// Round a price to the nearest tick, half-up.
    ///
    /// Zero rounds to zero.
    pub fn round_to_tick(&self, price: Decimal) -> Decimal {
        if price.is_zero() {
            return Decimal::ZERO;
        }
        let steps = (price / self.tick)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        (steps * self.tick).normalize()
    }

    /// The selected tick.
    pub fn tick(&self) -> Decimal {
        self.tick
    }

    /// Fractional digits a price has after grouping to this tick.
    pub fn decimals(&self) -> u32 {
        self.tick.normalize().scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(tick: Decimal) -> GroupingSpec {
        let instrument = Instrument::new(InstrumentId::new("ETH/USDC"));
        GroupingSpec::new(tick, &instrument).unwrap()
    }

    #[test]
    fn test_round_to_tick_basic() {
        let spec = spec(Decimal::new(1, 1));
        assert_eq!(
            spec.round_to_tick(Decimal::from_str_exact("100.234").unwrap()),
            Decimal::from_str_exact("100.2").unwrap()
        );
    }

    #[test]
    fn test_zero_price_rounds_to_zero() {
        let spec = spec(Decimal::ONE);
        assert_eq!(spec.round_to_tick(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_midpoint_rounds_half_up() {
        let spec = spec(Decimal::new(1, 1));
        assert_eq!(
            spec.round_to_tick(Decimal::from_str_exact("100.25").unwrap()),
            Decimal::from_str_exact("100.3").unwrap()
        );
    }

    #[test]
    fn test_no_drift_at_extreme_magnitude() {
        let spec = spec(Decimal::new(1, 2));
        // A float path would wobble here; decimal stays exact.
        assert_eq!(
            spec.round_to_tick(Decimal::from_str_exact("79228162514264.337").unwrap()),
            Decimal::from_str_exact("79228162514264.34").unwrap()
        );
    }

    #[test]
    fn test_sub_cent_tick() {
        let spec = spec(Decimal::new(1, 4));
        assert_eq!(
            spec.round_to_tick(Decimal::from_str_exact("0.00057").unwrap()),
            Decimal::from_str_exact("0.0006").unwrap()
        );
    }

    #[test]
    fn test_disallowed_tick_fails_fast() {
        let instrument = Instrument::new(InstrumentId::new("ETH/USDC"));
        let err = GroupingSpec::new(Decimal::new(7, 2), &instrument).unwrap_err();
        assert!(matches!(err, GroupingError::TickNotAllowed { .. }));
        assert!(err.to_string().contains("ETH/USDC"));
    }

    #[test]
    fn test_decimals_follow_tick() {
        assert_eq!(spec(Decimal::new(1, 4)).decimals(), 4);
        assert_eq!(spec(Decimal::new(1, 1)).decimals(), 1);
        assert_eq!(spec(Decimal::TEN).decimals(), 0);
    }
}
