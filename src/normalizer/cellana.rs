//! Cellana payload decoding.
//!
//! Cellana swap and liquidity events carry no balance data; reserves flow
//! exclusively through `SyncEvent`, which reports both sides directly.
//! Token identifiers arrive as byte sequences (occasionally plain strings)
//! and are matched by substring containment after decoding to text. A swap
//! whose pair matches neither the buy nor the sell rule keeps direction
//! `Unknown` with both amounts zeroed; that is a passthrough, not an error.

use serde::Deserialize;
use serde_json::Value;

use super::{Normalized, Reserves, from_base_units, same_pool_id, swap_event};
use crate::config::{
    APT_DECIMALS, CELLANA_APT_IDENTIFIER, CELLANA_APT_USDC_POOL_ID, CELLANA_USDC_TOKEN_ID,
    USDC_DECIMALS,
};
use crate::models::{EventKind, Exchange, LogRecord, TradeDirection, UnifiedEvent};
use crate::utils::bytes_to_string;

#[derive(Debug, Deserialize)]
pub(crate) struct SwapPayload {
    pub pool: String,
    #[serde(default)]
    pub from_token: Value,
    #[serde(default)]
    pub to_token: Value,
    pub amount_in: u64,
    pub amount_out: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SyncPayload {
    pub pool: String,
    /// USDC reserve; hex string, decimal string, or number.
    pub reserves_1: Value,
    /// APT reserve; same accepted forms.
    pub reserves_2: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LiquidityPayload {
    pub pool: String,
}

pub(super) fn normalize(
    record: &LogRecord,
    payload: &Value,
    received_at_ms: u64,
) -> Option<Normalized> {
    match record.event_name.as_str() {
        "SwapEvent" => normalize_swap(record, payload, received_at_ms),
        "SyncEvent" => normalize_sync(payload),
        "AddLiquidityEvent" => normalize_liquidity(payload, EventKind::AddLiquidity),
        "RemoveLiquidityEvent" => normalize_liquidity(payload, EventKind::RemoveLiquidity),
        _ => None,
    }
}

fn normalize_swap(record: &LogRecord, payload: &Value, received_at_ms: u64) -> Option<Normalized> {
    let payload: SwapPayload = serde_json::from_value(payload.clone()).ok()?;
    if !same_pool_id(&payload.pool, CELLANA_APT_USDC_POOL_ID) {
        return None;
    }

    let from_token = token_text(&payload.from_token);
    let to_token = token_text(&payload.to_token);

    let base_bought =
        from_token.contains(CELLANA_USDC_TOKEN_ID) && to_token.contains(CELLANA_APT_IDENTIFIER);
    let base_sold =
        from_token.contains(CELLANA_APT_IDENTIFIER) && to_token.contains(CELLANA_USDC_TOKEN_ID);

    let (direction, base_amount, quote_amount) = if base_bought {
        (
            TradeDirection::Buy,
            from_base_units(payload.amount_out, APT_DECIMALS),
            from_base_units(payload.amount_in, USDC_DECIMALS),
        )
    } else if base_sold {
        (
            TradeDirection::Sell,
            from_base_units(payload.amount_in, APT_DECIMALS),
            from_base_units(payload.amount_out, USDC_DECIMALS),
        )
    } else {
        (TradeDirection::Unknown, 0.0, 0.0)
    };

    Some(Normalized::Swap {
        event: UnifiedEvent {
            exchange: Exchange::Cellana,
            event: swap_event(record, direction, base_amount, quote_amount, received_at_ms),
        },
        reserves: None,
    })
}

fn normalize_sync(payload: &Value) -> Option<Normalized> {
    let payload: SyncPayload = serde_json::from_value(payload.clone()).ok()?;
    if !same_pool_id(&payload.pool, CELLANA_APT_USDC_POOL_ID) {
        return None;
    }
    Some(Normalized::Reserves {
        exchange: Exchange::Cellana,
        kind: EventKind::Sync,
        reserves: Reserves {
            base: parse_reserve(&payload.reserves_2)?,
            quote: parse_reserve(&payload.reserves_1)?,
        },
    })
}

fn normalize_liquidity(payload: &Value, kind: EventKind) -> Option<Normalized> {
    let payload: LiquidityPayload = serde_json::from_value(payload.clone()).ok()?;
    if !same_pool_id(&payload.pool, CELLANA_APT_USDC_POOL_ID) {
        return None;
    }
    Some(Normalized::Touch {
        exchange: Exchange::Cellana,
        kind,
    })
}

/// Token fields arrive either as `{ "fields": { "bytes": [..] } }` or as a
/// plain string. Anything else decodes to an empty string, which matches
/// neither identifier and falls through to `Unknown`.
fn token_text(value: &Value) -> String {
    if let Some(bytes) = value.pointer("/fields/bytes").and_then(Value::as_array) {
        let raw: Vec<u8> = bytes
            .iter()
            .filter_map(|b| b.as_u64().map(|n| n as u8))
            .collect();
        return bytes_to_string(&raw);
    }
    value.as_str().map(str::to_owned).unwrap_or_default()
}

/// Reserves may be `0x`-hex strings, decimal strings, or plain numbers.
fn parse_reserve(value: &Value) -> Option<u128> {
    match value {
        Value::String(s) => {
            let lower = s.to_ascii_lowercase();
            if let Some(hex) = lower.strip_prefix("0x") {
                u128::from_str_radix(hex, 16).ok()
            } else {
                s.parse::<u128>().ok()
            }
        }
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u128)),
        _ => None,
    }
}
