//! Per-exchange event normalization.
//!
//! Each raw log record yields at most one [`Normalized`] action. Anything
//! that fails payload resolution, address matching, the per-exchange event
//! name whitelist, the target-pool check, or a variant's shape check is
//! dropped silently: the upstream filter is broad and these are expected,
//! high-frequency occurrences, not errors.

pub mod cellana;
pub mod thala;

use serde_json::Value;

use crate::config;
use crate::models::{Exchange, EventKind, LogRecord, PoolEvent, TradeDirection, UnifiedEvent};
use crate::utils;

/// Raw pool balances in base units, as reported by an event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
    pub base: u128,
    pub quote: u128,
}

/// Outcome of normalizing one accepted record.
#[derive(Debug, Clone)]
pub enum Normalized {
    /// A swap fill. ThalaSwap embeds live pool balances in the swap payload;
    /// Cellana does not, so `reserves` is `None` for it.
    Swap {
        event: UnifiedEvent,
        reserves: Option<Reserves>,
    },
    /// An event that reports both pool balances directly (ThalaSwap
    /// add/remove liquidity, Cellana sync).
    Reserves {
        exchange: Exchange,
        kind: EventKind,
        reserves: Reserves,
    },
    /// Matched our pool but carries no balance data (Cellana add/remove
    /// liquidity). Still advances the spread history.
    Touch { exchange: Exchange, kind: EventKind },
}

/// Map a record's source address to an exchange by exact match.
pub fn identify(address: Option<&str>) -> Option<Exchange> {
    match address {
        Some(a) if a == config::THALASWAP_ADDRESS => Some(Exchange::ThalaSwap),
        Some(a) if a == config::CELLANA_ADDRESS => Some(Exchange::Cellana),
        _ => None,
    }
}

/// Normalize a record already attributed to an exchange.
pub fn normalize(
    exchange: Exchange,
    record: &LogRecord,
    received_at_ms: u64,
) -> Option<Normalized> {
    let payload = resolve_payload(&record.decoded);
    match exchange {
        Exchange::ThalaSwap => thala::normalize(record, &payload, received_at_ms),
        Exchange::Cellana => cellana::normalize(record, &payload, received_at_ms),
    }
}

/// Convenience: identify and normalize in one step.
pub fn normalize_record(record: &LogRecord, received_at_ms: u64) -> Option<Normalized> {
    normalize(identify(record.address.as_deref())?, record, received_at_ms)
}

/// The `decoded` field is sometimes delivered as a string holding JSON. Parse
/// it to structured form; if that fails the raw value is kept as-is and the
/// exchange-specific shape checks will reject it downstream.
fn resolve_payload(decoded: &Value) -> Value {
    match decoded {
        Value::String(raw) => serde_json::from_str(raw).unwrap_or_else(|_| decoded.clone()),
        other => other.clone(),
    }
}

/// Pool ids are compared case-insensitively and without regard to an
/// optional `0x` prefix, since the two feeds encode them differently.
pub(crate) fn same_pool_id(a: &str, b: &str) -> bool {
    fn canon(id: &str) -> String {
        let lower = id.to_ascii_lowercase();
        lower.trim_start_matches("0x").to_string()
    }
    canon(a) == canon(b)
}

/// Convert an integer base-unit amount to decimal units.
pub(crate) fn from_base_units(raw: u64, decimals: i32) -> f64 {
    raw as f64 / 10_f64.powi(decimals)
}

/// Assemble the per-record metadata shared by every swap variant.
pub(crate) fn swap_event(
    record: &LogRecord,
    direction: TradeDirection,
    base_amount: f64,
    quote_amount: f64,
    received_at_ms: u64,
) -> PoolEvent {
    let price = if base_amount > 0.0 {
        quote_amount / base_amount
    } else {
        0.0
    };
    PoolEvent {
        kind: EventKind::Swap,
        direction,
        base_amount,
        quote_amount,
        price,
        chain_version: record.block_number.clone(),
        log_index: record.log_index.clone().unwrap_or_else(|| "0x0".into()),
        observed_at_ms: record.timestamp / 1_000,
        latency_ms: utils::api_latency_ms(record.timestamp, received_at_ms),
        tx_hash: record
            .transaction_hash
            .clone()
            .unwrap_or_else(|| "unknown".into()),
    }
}
