//! Cumulative traded-volume accounting.

use crate::models::Exchange;

/// Running USDC-notional totals per exchange. Totals only ever grow for the
/// lifetime of the process; shares are derived at read time, never stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeTotals {
    thala: f64,
    cellana: f64,
}

impl VolumeTotals {
    pub fn record(&mut self, exchange: Exchange, quote_amount: f64) {
        match exchange {
            Exchange::ThalaSwap => self.thala += quote_amount,
            Exchange::Cellana => self.cellana += quote_amount,
        }
    }

    pub fn thala(&self) -> f64 {
        self.thala
    }

    pub fn cellana(&self) -> f64 {
        self.cellana
    }

    pub fn total(&self) -> f64 {
        self.thala + self.cellana
    }

    /// Each exchange's share of combined volume, in percent. Defaults to
    /// 50/50 while no volume has been observed.
    pub fn percentages(&self) -> (f64, f64) {
        let total = self.total();
        if total > 0.0 {
            (self.thala / total * 100.0, self.cellana / total * 100.0)
        } else {
            (50.0, 50.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_even_split_with_no_volume() {
        assert_eq!(VolumeTotals::default().percentages(), (50.0, 50.0));
    }

    #[test]
    fn totals_are_monotone_and_shares_sum_to_100() {
        let mut volume = VolumeTotals::default();
        let mut last_total = 0.0;
        for (i, amount) in [120.0, 0.0, 33.5, 900.0, 0.25].iter().enumerate() {
            let exchange = if i % 2 == 0 {
                Exchange::ThalaSwap
            } else {
                Exchange::Cellana
            };
            volume.record(exchange, *amount);
            assert!(volume.total() >= last_total);
            last_total = volume.total();

            let (thala_pct, cellana_pct) = volume.percentages();
            assert!((thala_pct + cellana_pct - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_amount_trades_leave_shares_unchanged() {
        let mut volume = VolumeTotals::default();
        volume.record(Exchange::ThalaSwap, 10.0);
        let before = volume.percentages();
        // Unknown-direction null trades add 0.
        volume.record(Exchange::Cellana, 0.0);
        assert_eq!(volume.percentages(), before);
    }
}
