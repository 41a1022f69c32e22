//! Per-exchange liquidity pool state.

use std::collections::VecDeque;

use crate::config::RECENT_EVENTS_CAP;
use crate::engine::pricing;
use crate::models::PoolEvent;
use crate::normalizer::Reserves;

/// Mutable record of one exchange's APT/USDC pool: reserve balances in base
/// units, the derived spot price, and a bounded newest-first event list.
#[derive(Debug, Clone, Default)]
pub struct PoolState {
    pub base_reserve: u128,
    pub quote_reserve: u128,
    /// Derived; recomputed on every reserve mutation. 0 while either
    /// reserve is 0.
    pub current_price: f64,
    /// Newest-first, at most [`RECENT_EVENTS_CAP`] entries.
    pub recent_events: VecDeque<PoolEvent>,
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite both balances from an event payload and refresh the price.
    pub fn set_reserves(&mut self, reserves: Reserves) {
        self.base_reserve = reserves.base;
        self.quote_reserve = reserves.quote;
        self.recompute_price();
    }

    pub fn recompute_price(&mut self) {
        self.current_price = pricing::current_price(self);
    }

    /// Insert newest-first, evicting the oldest entry past capacity.
    pub fn push_event(&mut self, event: PoolEvent) {
        self.recent_events.push_front(event);
        while self.recent_events.len() > RECENT_EVENTS_CAP {
            self.recent_events.pop_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, TradeDirection};

    fn swap_at(version: u64) -> PoolEvent {
        PoolEvent {
            kind: EventKind::Swap,
            direction: TradeDirection::Buy,
            base_amount: 1.0,
            quote_amount: 6.0,
            price: 6.0,
            chain_version: format!("0x{version:x}"),
            log_index: "0x0".into(),
            observed_at_ms: version,
            latency_ms: 0.0,
            tx_hash: "0xabc".into(),
        }
    }

    #[test]
    fn set_reserves_recomputes_price() {
        let mut state = PoolState::new();
        assert_eq!(state.current_price, 0.0);

        state.set_reserves(Reserves {
            base: 10_000_000_000, // 100 APT @ 8 decimals
            quote: 600_000_000,   // 600 USDC @ 6 decimals
        });
        assert!((state.current_price - 6.0).abs() < 1e-12);

        state.set_reserves(Reserves {
            base: 0,
            quote: 600_000_000,
        });
        assert_eq!(state.current_price, 0.0);
    }

    #[test]
    fn recent_events_are_capped_and_newest_first() {
        let mut state = PoolState::new();
        for version in 0..15u64 {
            state.push_event(swap_at(version));
        }
        assert_eq!(state.recent_events.len(), RECENT_EVENTS_CAP);
        // Newest first: versions 14 down to 5.
        let versions: Vec<&str> = state
            .recent_events
            .iter()
            .map(|e| e.chain_version.as_str())
            .collect();
        assert_eq!(versions.first(), Some(&"0xe"));
        assert_eq!(versions.last(), Some(&"0x5"));
    }
}
