//! Decoded-log streaming client.
//!
//! The upstream service delivers decoded on-chain events as chunks of
//! newline-delimited JSON over a long-lived websocket. This module owns the
//! connection lifecycle: connect, send the subscription filter, hand chunks
//! to the engine, and release the socket when the stream ends.

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use url::Url;

use crate::config::{AppConfig, CELLANA_ADDRESS, SUBSCRIBED_EVENT_NAMES, THALASWAP_ADDRESS};
use crate::errors::Result;
use crate::utils::bytes_to_string;

/// Subscription filter sent once after connecting. The upstream filter is
/// deliberately broad (both contracts, four event names); fine-grained
/// filtering happens in the normalizer.
#[derive(Debug, Serialize)]
struct SubscribeRequest<'a> {
    chains: &'a str,
    from_block: &'a str,
    to_block: &'a str,
    address__in: [&'a str; 2],
    event_name__in: [&'a str; 4],
}

/// Handle on the live log stream.
pub struct LogFeed {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

impl LogFeed {
    /// Connect and subscribe to decoded logs for both exchanges.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let url = Url::parse(&format!("wss://{}/v1/logs/decoded", config.endpoint))?;
        let (mut ws, _response) = connect_async(url.as_str()).await?;

        let request = SubscribeRequest {
            chains: "APTOS",
            from_block: &config.from_block,
            to_block: "none",
            address__in: [CELLANA_ADDRESS, THALASWAP_ADDRESS],
            event_name__in: SUBSCRIBED_EVENT_NAMES,
        };
        ws.send(Message::Text(serde_json::to_string(&request)?))
            .await?;
        debug!(endpoint = %config.endpoint, "[FEED] subscribed");

        Ok(Self { ws, closed: false })
    }

    /// Await the next chunk of newline-delimited records. `None` means the
    /// upstream closed the stream; an `Err` item is a transport failure the
    /// caller should propagate after releasing the feed.
    pub async fn next_chunk(&mut self) -> Option<Result<String>> {
        while let Some(message) = self.ws.next().await {
            match message {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => return Some(Ok(bytes_to_string(&bytes))),
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue, // ping/pong/raw frames
                Err(e) => return Some(Err(e.into())),
            }
        }
        None
    }

    /// Release the connection. Idempotent; a close failure is logged rather
    /// than surfaced, since the stream is finished either way.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.ws.close(None).await {
            warn!(error = %e, "[FEED] close failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_request_serializes_to_upstream_shape() {
        let request = SubscribeRequest {
            chains: "APTOS",
            from_block: "-10000",
            to_block: "none",
            address__in: [CELLANA_ADDRESS, THALASWAP_ADDRESS],
            event_name__in: SUBSCRIBED_EVENT_NAMES,
        };
        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["chains"], "APTOS");
        assert_eq!(value["from_block"], "-10000");
        assert_eq!(value["address__in"][1], THALASWAP_ADDRESS);
        assert_eq!(value["event_name__in"][3], "SyncEvent");
    }
}
