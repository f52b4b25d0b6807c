//! Market-Microstructure Reconstruction Engine
//!
//! Turns the raw market-data feed of the exchange front-end into renderable
//! state:
//! - Incremental depth deltas → a consistent, ordered bid/ask ladder with
//!   cumulative totals
//! - Trade prints → fixed-interval OHLCV candles (client-side aggregation)
//! - Server pre-bucketed candle rows → shape-repaired, time-sorted series
//! - Level-change highlight detection, synthetic placeholder depth, and
//!   tick-size price grouping
//!
//! # Architecture
//!
//! ```text
//! WebSocket messages              Trade prints
//!        │                             │
//!    ┌───▼───┐                     ┌───▼───┐
//!    │ Feed  │  ← decodes, drops   │ Feed  │
//!    └───┬───┘    malformed noise  └───┬───┘
//!        │                             │
//!    ┌───▼────┐                   ┌────▼────┐
//!    │ Ladder │                   │ Candles │
//!    └───┬────┘                   └────┬────┘
//!        │ snapshot                    │
//!  ┌─────▼─────┐   empty book?        │
//!  │ Highlight │──────────────┐       │
//!  └─────┬─────┘   ┌──────────▼──┐    │
//!        │         │  Synthetic  │    │
//!  ┌─────▼─────┐   └──────────┬──┘    │
//!  │ Grouping  │              │       │
//!  └─────┬─────┘              │       │
//!        └───────►  rendered  ◄───────┘
//!                 value objects
//! ```
//!
//! The engine is single-threaded and event-driven: one writer, no locks, no
//! blocking. Outputs are immutable value snapshots replaced on each update.
//! Callers apply batches and prints in wire order; the engine does not
//! reorder, buffer, or deduplicate across batches.

pub mod candles;
pub mod feed;
pub mod grouping;
pub mod highlight;
pub mod ladder;
pub mod synthetic;
pub mod view;

// Library version
pub const ENGINE_VERSION: &str = "0.1.0";
