//! Real-time APT/USDC analytics across two Aptos DEX protocols.
//!
//! The crate consumes a decoded on-chain log stream, normalizes ThalaSwap
//! and Cellana events into a unified model, maintains per-exchange pool
//! state, and derives per-chunk snapshots (latest swap, spread history,
//! depth-of-market, volume share) for a display consumer.

pub mod config;
pub mod engine;
pub mod errors;
pub mod feed;
pub mod models;
pub mod normalizer;
pub mod utils;
