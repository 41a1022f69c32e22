//! Shared data structures used throughout the application.

use serde::{Deserialize, Serialize};

/// The two monitored AMM protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Exchange {
    ThalaSwap,
    Cellana,
}

impl Exchange {
    pub fn name(&self) -> &'static str {
        match self {
            Exchange::ThalaSwap => "ThalaSwap",
            Exchange::Cellana => "Cellana",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    Sync,
}

/// Trade direction from the perspective of the base asset (APT).
/// `Unknown` means the swap's token pair matched neither rule; such trades
/// are carried through with zero amounts rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeDirection {
    Buy,
    Sell,
    Unknown,
}

/// A normalized pool event as stored in a pool's recent-event list.
/// Amounts are in decimal units (APT / USDC), not base units.
#[derive(Debug, Clone, Serialize)]
pub struct PoolEvent {
    pub kind: EventKind,
    pub direction: TradeDirection,
    pub base_amount: f64,
    pub quote_amount: f64,
    pub price: f64,
    /// Hex block number the event was emitted at.
    pub chain_version: String,
    pub log_index: String,
    /// Event timestamp, milliseconds since epoch.
    pub observed_at_ms: u64,
    /// Feed latency observed for this event.
    pub latency_ms: f64,
    pub tx_hash: String,
}

/// A pool event tagged with its source exchange.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedEvent {
    pub exchange: Exchange,
    #[serde(flatten)]
    pub event: PoolEvent,
}

/// One raw decoded log record as delivered by the streaming service, one per
/// newline-delimited JSON line. `decoded` is either a structured object or a
/// string holding JSON that still needs a second parse; its inner schema is
/// exchange- and event-specific.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRecord {
    pub decoded: serde_json::Value,
    pub block_number: String,
    #[serde(default)]
    pub log_index: Option<String>,
    /// Microseconds since epoch.
    pub timestamp: u64,
    pub event_name: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// ---------- snapshot aggregates ----------

/// The most recent swap, as surfaced to the consumer.
#[derive(Debug, Clone, Serialize)]
pub struct SwapSummary {
    pub exchange: Exchange,
    pub side: TradeDirection,
    pub base_amount: f64,
    pub price: f64,
    pub quote_amount: f64,
    pub tx_hash: String,
    pub latency_ms: f64,
}

/// One depth-of-market row at a fixed notional tier. Impact and spread are
/// decimal fractions, not percentages.
#[derive(Debug, Clone, Serialize)]
pub struct DepthRow {
    pub notional: f64,
    pub thala_price: f64,
    pub thala_impact: f64,
    pub cellana_price: f64,
    pub cellana_impact: f64,
    pub spread: f64,
}

/// Connection and latency status of the feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedStatus {
    pub connected: bool,
    pub api_latency_ms: f64,
    pub processing_time_ms: f64,
    pub total_latency_ms: f64,
    pub events_processed: u64,
    pub current_version: String,
}

/// Cumulative traded volume per exchange with derived shares.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeBreakdown {
    pub thala_volume: f64,
    pub cellana_volume: f64,
    pub total_volume: f64,
    pub thala_pct: f64,
    pub cellana_pct: f64,
}

/// Immutable, self-consistent view of the engine state, produced once per
/// processed chunk. Consumers receive owned copies, never references into
/// live state.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub latest_swap: SwapSummary,
    /// Oldest-first, always exactly 120 samples (decimal fractions).
    pub spread_history: Vec<f64>,
    pub depth: Vec<DepthRow>,
    pub status: FeedStatus,
    pub volume: VolumeBreakdown,
}
