//! ThalaSwap payload decoding.
//!
//! Thala events embed live pool balances directly, so every accepted swap or
//! liquidity event overwrites the reserves. Token identifiers are opaque
//! object ids matched by exact equality, which makes direction inference
//! binary: a swap either buys APT or sells it.

use serde::Deserialize;
use serde_json::Value;

use super::{Normalized, Reserves, from_base_units, same_pool_id, swap_event};
use crate::config::{
    APT_DECIMALS, THALA_APT_TOKEN_ID, THALA_APT_USDC_POOL_ID, THALA_USDC_TOKEN_ID, USDC_DECIMALS,
};
use crate::models::{EventKind, Exchange, LogRecord, TradeDirection, UnifiedEvent};

/// `{ "fields": { "inner": "<object id>" } }` wrapper used by Move object
/// references in decoded payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct ObjectRef {
    pub fields: ObjectFields,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectFields {
    pub inner: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwapPayload {
    pub pool_obj: ObjectRef,
    /// `[APT, USDC]` balances in base units after the swap.
    pub pool_balances: Vec<u128>,
    /// Token object refs, positionally aligned with `pool_balances`.
    pub metadata: Vec<ObjectRef>,
    /// Index of the input token within the pair.
    pub idx_in: usize,
    pub amount_in: u64,
    pub amount_out: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LiquidityPayload {
    pub pool_obj: ObjectRef,
    pub pool_balances: Vec<u128>,
}

pub(super) fn normalize(
    record: &LogRecord,
    payload: &Value,
    received_at_ms: u64,
) -> Option<Normalized> {
    match record.event_name.as_str() {
        "SwapEvent" => normalize_swap(record, payload, received_at_ms),
        "AddLiquidityEvent" => normalize_liquidity(payload, EventKind::AddLiquidity),
        "RemoveLiquidityEvent" => normalize_liquidity(payload, EventKind::RemoveLiquidity),
        _ => None,
    }
}

fn normalize_swap(record: &LogRecord, payload: &Value, received_at_ms: u64) -> Option<Normalized> {
    let payload: SwapPayload = serde_json::from_value(payload.clone()).ok()?;
    if !same_pool_id(&payload.pool_obj.fields.inner, THALA_APT_USDC_POOL_ID) {
        return None;
    }

    let base_reserve = *payload.pool_balances.first()?;
    let quote_reserve = *payload.pool_balances.get(1)?;

    let token0 = payload.metadata.first()?.fields.inner.as_str();
    let token1 = payload.metadata.get(1)?.fields.inner.as_str();

    let base_bought = (payload.idx_in == 1
        && token1 == THALA_USDC_TOKEN_ID
        && token0 == THALA_APT_TOKEN_ID)
        || (payload.idx_in == 0
            && token0 == THALA_USDC_TOKEN_ID
            && token1 == THALA_APT_TOKEN_ID);

    let (direction, base_raw, quote_raw) = if base_bought {
        (TradeDirection::Buy, payload.amount_out, payload.amount_in)
    } else {
        (TradeDirection::Sell, payload.amount_in, payload.amount_out)
    };

    let base_amount = from_base_units(base_raw, APT_DECIMALS);
    let quote_amount = from_base_units(quote_raw, USDC_DECIMALS);

    Some(Normalized::Swap {
        event: UnifiedEvent {
            exchange: Exchange::ThalaSwap,
            event: swap_event(record, direction, base_amount, quote_amount, received_at_ms),
        },
        reserves: Some(Reserves {
            base: base_reserve,
            quote: quote_reserve,
        }),
    })
}

fn normalize_liquidity(payload: &Value, kind: EventKind) -> Option<Normalized> {
    let payload: LiquidityPayload = serde_json::from_value(payload.clone()).ok()?;
    if !same_pool_id(&payload.pool_obj.fields.inner, THALA_APT_USDC_POOL_ID) {
        return None;
    }
    Some(Normalized::Reserves {
        exchange: Exchange::ThalaSwap,
        kind,
        reserves: Reserves {
            base: *payload.pool_balances.first()?,
            quote: *payload.pool_balances.get(1)?,
        },
    })
}
