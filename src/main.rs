use anyhow::Result;
use dex_spread_monitor::{config::AppConfig, engine::Engine, feed::LogFeed, models::Snapshot, utils};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load();
    info!(
        endpoint = %config.endpoint,
        from_block = %config.from_block,
        "[INIT] dex-spread-monitor starting"
    );

    let feed = LogFeed::connect(&config).await?;
    info!("[INIT] log feed connected");

    // Snapshot consumer; a renderer would subscribe here instead.
    let (snapshot_tx, mut snapshot_rx) = mpsc::channel::<Snapshot>(16);
    let consumer = tokio::spawn(async move {
        while let Some(snap) = snapshot_rx.recv().await {
            info!(
                exchange = snap.latest_swap.exchange.name(),
                side = ?snap.latest_swap.side,
                price = snap.latest_swap.price,
                spread = snap.depth.first().map(|r| r.spread).unwrap_or(0.0),
                events = snap.status.events_processed,
                api_latency_ms = snap.status.api_latency_ms,
                thala_volume_pct = snap.volume.thala_pct,
                cellana_volume_pct = snap.volume.cellana_pct,
                "[SNAP] snapshot"
            );
        }
    });

    let result = Engine::new().run(feed, snapshot_tx).await;

    consumer.await?;
    result.map_err(Into::into)
}
