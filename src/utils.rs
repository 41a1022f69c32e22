//! Miscellaneous helper utilities.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// API latency: time between the on-chain event (feed timestamps are in
/// microseconds) and the moment its chunk arrived.
pub fn api_latency_ms(event_ts_micros: u64, received_at_ms: u64) -> f64 {
    received_at_ms as f64 - (event_ts_micros / 1_000) as f64
}

/// End-to-end latency: on-chain event to the end of local processing.
pub fn total_latency_ms(event_ts_micros: u64, processed_at_ms: u64) -> f64 {
    processed_at_ms as f64 - (event_ts_micros / 1_000) as f64
}

/// Decode a byte sequence into text, replacing invalid UTF-8 rather than
/// failing. Token identifiers in Cellana payloads arrive this way.
pub fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_latency_converts_micros_to_millis() {
        // event at 1_000_000 µs = 1_000 ms, received at 1_250 ms
        assert_eq!(api_latency_ms(1_000_000, 1_250), 250.0);
    }

    #[test]
    fn latency_can_go_negative_on_clock_skew() {
        assert_eq!(total_latency_ms(2_000_000, 1_500), -500.0);
    }

    #[test]
    fn bytes_decode_to_identifier_text() {
        let bytes = [
            97, 112, 116, 111, 115, 95, 99, 111, 105, 110, 58, 58, 65, 112, 116, 111, 115, 67,
            111, 105, 110,
        ];
        assert_eq!(bytes_to_string(&bytes), "aptos_coin::AptosCoin");
    }
}
