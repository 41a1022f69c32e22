//! Snapshot assembly.
//!
//! Builds the immutable per-chunk view handed to the consumer. Everything in
//! a snapshot is an owned copy; nothing borrows live engine state.

use crate::config::DOM_TIERS;
use crate::engine::history::SpreadHistory;
use crate::engine::pricing;
use crate::engine::state::PoolState;
use crate::engine::volume::VolumeTotals;
use crate::models::{
    DepthRow, EventKind, Exchange, FeedStatus, PoolEvent, Snapshot, SwapSummary, TradeDirection,
    UnifiedEvent, VolumeBreakdown,
};

/// Sentinel transaction hash used when no real swap has been observed.
const PLACEHOLDER_TX_HASH: &str = "0x0000000000000000";

/// Synthesize a stand-in latest swap before the first real one arrives,
/// sourced from whichever exchange already has valid price data (ThalaSwap
/// preferred when both do). `None` when neither pool is priced yet.
pub(super) fn placeholder_swap(
    thala: &PoolState,
    cellana: &PoolState,
    now_ms: u64,
) -> Option<UnifiedEvent> {
    let (exchange, price) = if thala.current_price > 0.0 {
        (Exchange::ThalaSwap, thala.current_price)
    } else if cellana.current_price > 0.0 {
        (Exchange::Cellana, cellana.current_price)
    } else {
        return None;
    };

    Some(UnifiedEvent {
        exchange,
        event: PoolEvent {
            kind: EventKind::Swap,
            direction: TradeDirection::Buy,
            base_amount: 0.0,
            quote_amount: 0.0,
            price,
            chain_version: "0x0".into(),
            log_index: "0x0".into(),
            observed_at_ms: now_ms,
            latency_ms: 0.0,
            tx_hash: PLACEHOLDER_TX_HASH.into(),
        },
    })
}

/// Assemble a full snapshot around a known latest swap (real or synthetic).
pub(super) fn build(
    latest: &UnifiedEvent,
    thala: &PoolState,
    cellana: &PoolState,
    history: &SpreadHistory,
    volume: &VolumeTotals,
    status: FeedStatus,
) -> Snapshot {
    let depth = pricing::depth_of_market(&DOM_TIERS, thala, cellana)
        .into_iter()
        .map(|row| DepthRow {
            notional: row.notional,
            thala_price: row.thala_price,
            thala_impact: row.thala_impact / 100.0,
            cellana_price: row.cellana_price,
            cellana_impact: row.cellana_impact / 100.0,
            spread: row.spread_pct / 100.0,
        })
        .collect();

    Snapshot {
        latest_swap: SwapSummary {
            exchange: latest.exchange,
            side: latest.event.direction,
            base_amount: latest.event.base_amount,
            price: latest.event.price,
            quote_amount: latest.event.quote_amount,
            tx_hash: latest.event.tx_hash.clone(),
            latency_ms: latest.event.latency_ms,
        },
        spread_history: history.samples(),
        depth,
        status,
        volume: volume_breakdown(volume),
    }
}

/// Minimal view for the window before any price data exists: live status and
/// counters with zeroed market metrics. The engine substitutes this rather
/// than blocking on missing data.
pub(super) fn status_only(
    history: &SpreadHistory,
    volume: &VolumeTotals,
    status: FeedStatus,
) -> Snapshot {
    Snapshot {
        latest_swap: SwapSummary {
            exchange: Exchange::ThalaSwap,
            side: TradeDirection::Buy,
            base_amount: 0.0,
            price: 0.0,
            quote_amount: 0.0,
            tx_hash: PLACEHOLDER_TX_HASH.into(),
            latency_ms: 0.0,
        },
        spread_history: history.samples(),
        depth: DOM_TIERS
            .iter()
            .map(|&notional| DepthRow {
                notional,
                thala_price: 0.0,
                thala_impact: 0.0,
                cellana_price: 0.0,
                cellana_impact: 0.0,
                spread: 0.0,
            })
            .collect(),
        status,
        volume: volume_breakdown(volume),
    }
}

fn volume_breakdown(volume: &VolumeTotals) -> VolumeBreakdown {
    let (thala_pct, cellana_pct) = volume.percentages();
    VolumeBreakdown {
        thala_volume: volume.thala(),
        cellana_volume: volume.cellana(),
        total_volume: volume.total(),
        thala_pct,
        cellana_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SPREAD_HISTORY_LEN;
    use crate::normalizer::Reserves;

    fn priced_pool(quote: u128) -> PoolState {
        let mut state = PoolState::new();
        state.set_reserves(Reserves {
            base: 10_000_000_000,
            quote,
        });
        state
    }

    fn idle_status() -> FeedStatus {
        FeedStatus {
            connected: true,
            api_latency_ms: 0.0,
            processing_time_ms: 0.0,
            total_latency_ms: 0.0,
            events_processed: 0,
            current_version: "0x0".into(),
        }
    }

    #[test]
    fn placeholder_prefers_thala_when_both_priced() {
        let swap = placeholder_swap(&priced_pool(600_000_000), &priced_pool(630_000_000), 0)
            .expect("both pools priced");
        assert_eq!(swap.exchange, Exchange::ThalaSwap);
        assert!((swap.event.price - 6.0).abs() < 1e-12);
        assert_eq!(swap.event.base_amount, 0.0);
        assert_eq!(swap.event.tx_hash, PLACEHOLDER_TX_HASH);
        assert_eq!(swap.event.chain_version, "0x0");
    }

    #[test]
    fn placeholder_falls_back_to_cellana() {
        let swap = placeholder_swap(&PoolState::new(), &priced_pool(520_000_000), 0)
            .expect("cellana priced");
        assert_eq!(swap.exchange, Exchange::Cellana);
        assert!((swap.event.price - 5.2).abs() < 1e-12);
    }

    #[test]
    fn no_placeholder_without_any_price() {
        assert!(placeholder_swap(&PoolState::new(), &PoolState::new(), 0).is_none());
    }

    #[test]
    fn build_converts_percent_figures_to_decimals() {
        let thala = priced_pool(600_000_000);
        let cellana = priced_pool(630_000_000);
        let latest = placeholder_swap(&thala, &cellana, 0).expect("priced");

        let snap = build(
            &latest,
            &thala,
            &cellana,
            &SpreadHistory::new(),
            &VolumeTotals::default(),
            idle_status(),
        );

        assert_eq!(snap.spread_history.len(), SPREAD_HISTORY_LEN);
        assert_eq!(snap.depth.len(), 3);
        // Percent impact from pricing divided by 100.
        let row = &snap.depth[0];
        let raw = pricing::price_impact(row.notional, &thala);
        assert!((row.thala_impact - raw.impact / 100.0).abs() < 1e-12);
        assert_eq!(snap.volume.thala_pct, 50.0);
    }

    #[test]
    fn status_only_view_is_fully_zeroed_but_keeps_counters() {
        let mut status = idle_status();
        status.events_processed = 7;
        let snap = status_only(&SpreadHistory::new(), &VolumeTotals::default(), status);

        assert_eq!(snap.latest_swap.price, 0.0);
        assert_eq!(snap.status.events_processed, 7);
        assert_eq!(snap.depth.len(), 3);
        assert!(snap.depth.iter().all(|r| r.thala_price == 0.0));
        assert_eq!(snap.volume.thala_pct, 50.0);
        assert_eq!(snap.spread_history.len(), SPREAD_HISTORY_LEN);
    }
}
