//! The normalization and analytics engine.
//!
//! `Engine` is the single owner of all mutable market state: two pool
//! records, the latest swap, the spread history, volume totals, and the
//! feed status counters. It is created by the caller at stream start and
//! torn down when the stream ends; there are no globals.
//!
//! Records inside a chunk are folded strictly in arrival order, because
//! volume accumulation and spread history are order-sensitive running
//! aggregates. Each matched record appends exactly one spread sample, but
//! only one snapshot is produced per chunk boundary, so earlier records of
//! a multi-record chunk surface solely through the running aggregates.

pub mod history;
pub mod pricing;
pub mod snapshot;
pub mod state;
pub mod volume;

use std::time::Instant;

use tokio::sync::mpsc;
use tracing::info;

use crate::errors::Result;
use crate::feed::LogFeed;
use crate::models::{Exchange, FeedStatus, LogRecord, Snapshot, UnifiedEvent};
use crate::normalizer::{self, Normalized};
use crate::utils;

use history::SpreadHistory;
use state::PoolState;
use volume::VolumeTotals;

#[derive(Debug, Default)]
pub struct Engine {
    thala: PoolState,
    cellana: PoolState,
    latest_swap: Option<UnifiedEvent>,
    history: SpreadHistory,
    volume: VolumeTotals,
    connected: bool,
    events_processed: u64,
    last_api_latency_ms: f64,
    last_processing_ms: f64,
    last_total_latency_ms: f64,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live ThalaSwap pool state, for the liquidity-view collaborator.
    pub fn thala(&self) -> &PoolState {
        &self.thala
    }

    /// Live Cellana pool state, for the liquidity-view collaborator.
    pub fn cellana(&self) -> &PoolState {
        &self.cellana
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Consume the feed until it ends, folding every chunk and emitting one
    /// snapshot per chunk. The upstream connection is released exactly once,
    /// on normal termination and on transport error alike, before the result
    /// propagates to the caller.
    pub async fn run(
        mut self,
        mut feed: LogFeed,
        snapshot_tx: mpsc::Sender<Snapshot>,
    ) -> Result<()> {
        self.connected = true;
        let result = self.drain(&mut feed, &snapshot_tx).await;
        self.connected = false;
        feed.close().await;
        info!(
            events = self.events_processed,
            "[ENGINE] stream ended, feed released"
        );
        result
    }

    async fn drain(&mut self, feed: &mut LogFeed, tx: &mpsc::Sender<Snapshot>) -> Result<()> {
        while let Some(chunk) = feed.next_chunk().await {
            let chunk = chunk?;
            // One receipt timestamp for the whole chunk.
            let received_at_ms = utils::now_ms();
            self.apply_chunk(&chunk, received_at_ms);
            if tx.send(self.snapshot()).await.is_err() {
                // Consumer went away; stop pulling.
                break;
            }
        }
        Ok(())
    }

    /// Fold one chunk of newline-delimited records, in order. Lines that are
    /// not valid JSON records are dropped silently and do not count toward
    /// `events_processed`.
    pub fn apply_chunk(&mut self, chunk: &str, received_at_ms: u64) {
        for line in chunk.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LogRecord>(line) {
                Ok(record) => self.apply_record(&record, received_at_ms),
                Err(_) => continue,
            }
        }
    }

    /// Fold one structurally-valid record. Counts every record handed to the
    /// dispatcher, including ones the normalizer later drops.
    pub fn apply_record(&mut self, record: &LogRecord, received_at_ms: u64) {
        self.events_processed += 1;
        let started = Instant::now();
        self.last_api_latency_ms = utils::api_latency_ms(record.timestamp, received_at_ms);

        let Some(exchange) = normalizer::identify(record.address.as_deref()) else {
            return;
        };
        if let Some(action) = normalizer::normalize(exchange, record, received_at_ms) {
            self.apply_action(action);
        }

        self.last_processing_ms = started.elapsed().as_secs_f64() * 1_000.0;
        self.last_total_latency_ms = utils::total_latency_ms(record.timestamp, utils::now_ms());
    }

    fn apply_action(&mut self, action: Normalized) {
        match action {
            Normalized::Swap { event, reserves } => {
                let exchange = event.exchange;
                if let Some(reserves) = reserves {
                    self.pool_mut(exchange).set_reserves(reserves);
                }
                // Unknown-direction null trades still land here: 0 volume,
                // one recent-event slot.
                self.volume.record(exchange, event.event.quote_amount);
                self.pool_mut(exchange).push_event(event.event.clone());
                self.pool_mut(exchange).recompute_price();
                self.latest_swap = Some(event);
                self.push_spread_sample();
            }
            Normalized::Reserves {
                exchange, reserves, ..
            } => {
                self.pool_mut(exchange).set_reserves(reserves);
                self.push_spread_sample();
            }
            Normalized::Touch { .. } => self.push_spread_sample(),
        }
    }

    fn pool_mut(&mut self, exchange: Exchange) -> &mut PoolState {
        match exchange {
            Exchange::ThalaSwap => &mut self.thala,
            Exchange::Cellana => &mut self.cellana,
        }
    }

    /// Once per matched event: recompute the cross-exchange spread and
    /// append it to the history as a decimal fraction.
    fn push_spread_sample(&mut self) {
        let spread_pct = pricing::cross_spread(&self.thala, &self.cellana);
        self.history.push(spread_pct / 100.0);
    }

    /// Produce the per-chunk snapshot. Before the first real swap, a
    /// placeholder is synthesized from whichever pool already has a price
    /// and kept as the latest swap; with no price data at all, a
    /// status-only view is returned instead of blocking.
    pub fn snapshot(&mut self) -> Snapshot {
        if self.latest_swap.is_none() {
            self.latest_swap =
                snapshot::placeholder_swap(&self.thala, &self.cellana, utils::now_ms());
        }
        let status = self.status();
        match &self.latest_swap {
            Some(latest) => snapshot::build(
                latest,
                &self.thala,
                &self.cellana,
                &self.history,
                &self.volume,
                status,
            ),
            None => snapshot::status_only(&self.history, &self.volume, status),
        }
    }

    fn status(&self) -> FeedStatus {
        FeedStatus {
            connected: self.connected,
            api_latency_ms: self.last_api_latency_ms,
            processing_time_ms: self.last_processing_ms,
            total_latency_ms: self.last_total_latency_ms,
            events_processed: self.events_processed,
            current_version: self
                .latest_swap
                .as_ref()
                .map(|s| s.event.chain_version.clone())
                .unwrap_or_else(|| "0x0".into()),
        }
    }
}
