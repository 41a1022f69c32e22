//! Static market configuration and environment-driven settings.
//!
//! The contract addresses, pool ids, token identifiers and decimal exponents
//! below are fixed properties of the APT/USDC pair on Aptos mainnet; they are
//! recognized configuration, never parsed out of the feed.

/// ThalaSwap AMM contract address on Aptos mainnet.
pub const THALASWAP_ADDRESS: &str =
    "0x007730cd28ee1cdc9e999336cbc430f99e7c44397c0aa77516f6f23a78559bb5";
/// Cellana AMM contract address on Aptos mainnet.
pub const CELLANA_ADDRESS: &str =
    "0x4bf51972879e3b95c4781a5cdcb9e1ee24ef483e7d22f2d903626f126df62bd1";

/// ThalaSwap APT/USDC pool object id (no 0x prefix in the feed).
pub const THALA_APT_USDC_POOL_ID: &str =
    "a928222429caf1924c944973c2cd9fc306ec41152ba4de27a001327021a4dff7";
/// ThalaSwap token object ids, matched by exact equality.
pub const THALA_APT_TOKEN_ID: &str =
    "000000000000000000000000000000000000000000000000000000000000000a";
pub const THALA_USDC_TOKEN_ID: &str =
    "bae207659db88bea0cbead6da0ed00aac12edcdda169e591cd41c94180b46f3b";

/// Cellana APT/USDC pool id (hex string, 0x-prefixed in the feed).
pub const CELLANA_APT_USDC_POOL_ID: &str =
    "0x71c6ae634bd3c36470eb7e7f4fb0912973bb31543dfdb7d7fb6863d886d81d67";
/// Cellana token identifiers, matched by substring containment after the
/// payload byte sequences are decoded to text.
pub const CELLANA_USDC_TOKEN_ID: &str =
    "bae207659db88bea0cbead6da0ed00aac12edcdda169e591cd41c94180b46f3b";
pub const CELLANA_APT_IDENTIFIER: &str = "aptos_coin::AptosCoin";

/// Decimal exponents of the two traded assets.
pub const APT_DECIMALS: i32 = 8;
pub const USDC_DECIMALS: i32 = 6;

/// Notional tiers (USDC) evaluated for the depth-of-market table.
pub const DOM_TIERS: [f64; 3] = [1_000.0, 10_000.0, 100_000.0];

/// Capacity of the spread history ring buffer.
pub const SPREAD_HISTORY_LEN: usize = 120;
/// Per-pool recent event list capacity.
pub const RECENT_EVENTS_CAP: usize = 10;

/// Event names requested from the upstream filter. `SyncEvent` only exists
/// on Cellana; the normalizer drops it for ThalaSwap.
pub const SUBSCRIBED_EVENT_NAMES: [&str; 4] = [
    "SwapEvent",
    "AddLiquidityEvent",
    "RemoveLiquidityEvent",
    "SyncEvent",
];

/// Runtime settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host of the decoded-log streaming service.
    pub endpoint: String,
    /// Starting block for the subscription (negative = relative to tip).
    pub from_block: String,
}

impl AppConfig {
    /// Load configuration from environment variables, with the defaults the
    /// deployment has always used.
    pub fn load() -> Self {
        let endpoint =
            std::env::var("PANGEA_URL").unwrap_or_else(|_| "aptos.app.pangea.foundation".into());
        let from_block = std::env::var("FROM_BLOCK").unwrap_or_else(|_| "-10000".into());
        Self {
            endpoint,
            from_block,
        }
    }
}
