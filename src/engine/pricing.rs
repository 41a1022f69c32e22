//! Pure pricing functions over pool state.
//!
//! Everything here is stateless constant-product math; any zero reserve or
//! zero price short-circuits to 0 rather than faulting on division.

use crate::config::{APT_DECIMALS, USDC_DECIMALS};
use crate::engine::state::PoolState;

/// Result of a hypothetical trade against one pool.
#[derive(Debug, Clone, Copy)]
pub struct PriceImpact {
    /// Price after the trade (USDC per APT).
    pub price: f64,
    /// Relative move from the current price, in percent (signed).
    pub impact: f64,
}

/// Depth-of-market row at one notional tier, in percent terms. The snapshot
/// builder converts impact and spread to decimal fractions for display.
#[derive(Debug, Clone, Copy)]
pub struct DomRow {
    pub notional: f64,
    pub thala_price: f64,
    pub thala_impact: f64,
    pub cellana_price: f64,
    pub cellana_impact: f64,
    pub spread_pct: f64,
}

/// Spot price from reserve balances, adjusted for decimals. 0 while either
/// reserve is 0.
pub fn current_price(state: &PoolState) -> f64 {
    if state.base_reserve == 0 || state.quote_reserve == 0 {
        return 0.0;
    }
    let base = state.base_reserve as f64 / 10_f64.powi(APT_DECIMALS);
    let quote = state.quote_reserve as f64 / 10_f64.powi(USDC_DECIMALS);
    quote / base
}

/// Price after swapping `quote_in` USDC (decimal units) into the pool,
/// using the constant-product invariant over raw reserves.
pub fn price_after_trade(quote_in: f64, state: &PoolState) -> f64 {
    if state.base_reserve == 0 || state.quote_reserve == 0 {
        return 0.0;
    }
    let quote_in_raw = quote_in * 10_f64.powi(USDC_DECIMALS);
    let x = state.quote_reserve as f64;
    let y = state.base_reserve as f64;
    let base_out = y - (x * y) / (x + quote_in_raw);

    let new_quote = (x + quote_in_raw) / 10_f64.powi(USDC_DECIMALS);
    let new_base = (y - base_out) / 10_f64.powi(APT_DECIMALS);
    new_quote / new_base
}

/// Hypothetical-trade price and relative impact. `{0, 0}` whenever the
/// current price is 0, for any trade size.
pub fn price_impact(quote_in: f64, state: &PoolState) -> PriceImpact {
    let current = current_price(state);
    if current == 0.0 {
        return PriceImpact {
            price: 0.0,
            impact: 0.0,
        };
    }
    let price = price_after_trade(quote_in, state);
    PriceImpact {
        price,
        impact: (price - current) / current * 100.0,
    }
}

/// Cross-exchange spread in percent: positive means Cellana is priced above
/// ThalaSwap. 0 if either side has no price yet.
pub fn cross_spread(thala: &PoolState, cellana: &PoolState) -> f64 {
    if thala.current_price == 0.0 || cellana.current_price == 0.0 {
        return 0.0;
    }
    let difference = cellana.current_price - thala.current_price;
    difference / thala.current_price.min(cellana.current_price) * 100.0
}

/// Evaluate price impact on both exchanges at each notional tier and derive
/// the per-tier spread from the resulting tier prices.
pub fn depth_of_market(tiers: &[f64], thala: &PoolState, cellana: &PoolState) -> Vec<DomRow> {
    tiers
        .iter()
        .map(|&notional| {
            let t = price_impact(notional, thala);
            let c = price_impact(notional, cellana);
            let spread_pct = if t.price > 0.0 && c.price > 0.0 {
                (c.price - t.price) / t.price.min(c.price) * 100.0
            } else {
                0.0
            };
            DomRow {
                notional,
                thala_price: t.price,
                thala_impact: t.impact,
                cellana_price: c.price,
                cellana_impact: c.impact,
                spread_pct,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DOM_TIERS;

    fn pool(base: u128, quote: u128) -> PoolState {
        let mut state = PoolState {
            base_reserve: base,
            quote_reserve: quote,
            ..PoolState::default()
        };
        state.recompute_price();
        state
    }

    /// 100 APT (8 decimals) against 600 USDC (6 decimals).
    fn reference_pool() -> PoolState {
        pool(10_000_000_000, 600_000_000)
    }

    #[test]
    fn current_price_adjusts_for_decimals() {
        assert!((current_price(&reference_pool()) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn zero_reserve_forces_zero_price() {
        assert_eq!(current_price(&pool(0, 600_000_000)), 0.0);
        assert_eq!(current_price(&pool(10_000_000_000, 0)), 0.0);
        assert_eq!(price_after_trade(1_000.0, &pool(0, 1)), 0.0);
    }

    #[test]
    fn constant_product_worked_example() {
        // x=600, y=100 in adjusted units; 1_000 USDC in:
        // base_out = 100 - (600*100)/(600+1000) = 62.5
        // price    = 1600 / 37.5 = 42.666...
        let price = price_after_trade(1_000.0, &reference_pool());
        assert!((price - 42.666666666666664).abs() < 1e-9);
    }

    #[test]
    fn impact_reflects_post_trade_price() {
        let result = price_impact(1_000.0, &reference_pool());
        assert!((result.price - 42.666666666666664).abs() < 1e-9);
        // (42.666... - 6) / 6 * 100
        assert!((result.impact - 611.1111111111111).abs() < 1e-6);
    }

    #[test]
    fn impact_is_zero_for_priceless_pool() {
        let result = price_impact(100_000.0, &pool(0, 0));
        assert_eq!(result.price, 0.0);
        assert_eq!(result.impact, 0.0);
    }

    #[test]
    fn cross_spread_worked_example() {
        let thala = reference_pool();
        // 100 APT vs 630 USDC => price 6.3
        let cellana = pool(10_000_000_000, 630_000_000);
        let spread = cross_spread(&thala, &cellana);
        assert!((spread - 5.0).abs() < 1e-9);
        // Sign flips with direction.
        assert!((cross_spread(&cellana, &thala) + 5.0).abs() < 1e-9);
    }

    #[test]
    fn cross_spread_is_zero_when_either_side_is_priceless() {
        assert_eq!(cross_spread(&reference_pool(), &pool(0, 0)), 0.0);
        assert_eq!(cross_spread(&pool(0, 0), &reference_pool()), 0.0);
    }

    #[test]
    fn dom_rows_cover_all_tiers_with_tier_spreads() {
        let thala = reference_pool();
        let cellana = pool(10_000_000_000, 630_000_000);
        let rows = depth_of_market(&DOM_TIERS, &thala, &cellana);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].notional, 1_000.0);
        assert_eq!(rows[2].notional, 100_000.0);
        for row in &rows {
            assert!(row.thala_price > 0.0);
            assert!(row.cellana_price > 0.0);
            // Bigger trades push the price further.
            assert!(row.thala_impact > 0.0);
        }
        assert!(rows[2].thala_impact > rows[0].thala_impact);
    }

    #[test]
    fn dom_spread_is_zero_when_one_side_has_no_liquidity() {
        let rows = depth_of_market(&DOM_TIERS, &reference_pool(), &pool(0, 0));
        for row in rows {
            assert_eq!(row.cellana_price, 0.0);
            assert_eq!(row.spread_pct, 0.0);
        }
    }
}
