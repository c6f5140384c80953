//! WebSocket link to the relay server
//!
//! [`WsLink`] implements [`Link`] on top of `tokio-websockets`. Each `open`
//! spawns one socket task on the current tokio runtime; the task reports
//! back through an unbounded channel of [`LinkEvent`]s which the owner feeds
//! to the client one at a time.
//!
//! # Task Lifecycle
//!
//! ```text
//! open() ─▶ spawn run_socket ─▶ handshake ─┬─ ok ──▶ LinkEvent::Connected
//!                                          │         loop: outbound ⇄ inbound
//!                                          │         ...socket closes
//!                                          │         LinkEvent::Disconnected
//!                                          └─ err ─▶ wait RECONNECT_DELAY
//!                                                    LinkEvent::Disconnected
//! ```

use crate::networking::error::{TransportError, TransportResult};
use crate::networking::queue::Link;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use url::Url;
use websocket::{ClientBuilder, Message};

/// Pause after a failed handshake before reporting the disconnect
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// What the socket task reports to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
    /// Text frame received from the server
    Frame(String),
}

pub struct WsLink {
    url: Url,
    events: UnboundedSender<LinkEvent>,
    outbound: Option<UnboundedSender<String>>,
}

impl WsLink {
    /// Link to `url` reporting on `events`
    ///
    /// # Errors
    ///
    /// [`TransportError::InvalidUrl`] unless `url` parses with a `ws` or
    /// `wss` scheme.
    pub fn new(url: &str, events: UnboundedSender<LinkEvent>) -> TransportResult<Self> {
        let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(TransportError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }
        Ok(Self {
            url: parsed,
            events,
            outbound: None,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Link for WsLink {
    fn open(&mut self) -> TransportResult<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| TransportError::Runtime(e.to_string()))?;
        let (tx, rx) = unbounded_channel();
        self.outbound = Some(tx);
        info!("[TRANSPORT] Connecting to {}", self.url);
        handle.spawn(run_socket(self.url.to_string(), rx, self.events.clone()));
        Ok(())
    }

    fn send(&mut self, text: String) -> TransportResult<()> {
        let sent = match &self.outbound {
            Some(outbound) => outbound.send(text).map_err(|_| TransportError::Closed),
            None => Err(TransportError::Closed),
        };
        if sent.is_err() {
            // Socket task has exited
            self.outbound = None;
        }
        sent
    }
}

async fn run_socket(
    url: String,
    mut outbound: UnboundedReceiver<String>,
    events: UnboundedSender<LinkEvent>,
) {
    let connected = match ClientBuilder::new().uri(&url) {
        Ok(builder) => builder
            .connect()
            .await
            .map_err(|e| TransportError::Connect(e.to_string())),
        Err(e) => Err(TransportError::Connect(e.to_string())),
    };

    let mut stream = match connected {
        Ok((stream, _response)) => stream,
        Err(err) => {
            warn!("[TRANSPORT] {}", err);
            tokio::time::sleep(RECONNECT_DELAY).await;
            let _ = events.send(LinkEvent::Disconnected);
            return;
        }
    };

    info!("[TRANSPORT] Connected to {}", url);
    if events.send(LinkEvent::Connected).is_err() {
        return;
    }

    loop {
        tokio::select! {
            text = outbound.recv() => match text {
                Some(text) => {
                    if let Err(e) = stream.send(Message::text(text)).await {
                        warn!("[TRANSPORT] Write failed: {}", e);
                        break;
                    }
                }
                None => {
                    debug!("[TRANSPORT] Link dropped, closing socket");
                    let _ = stream.close().await;
                    break;
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(msg)) => {
                    if let Some(text) = msg.as_text() {
                        if events.send(LinkEvent::Frame(text.to_string())).is_err() {
                            break;
                        }
                    } else if msg.is_close() {
                        info!("[TRANSPORT] Server closed the connection");
                        break;
                    }
                }
                Some(Err(e)) => {
                    warn!("[TRANSPORT] Read failed: {}", e);
                    break;
                }
                None => break,
            },
        }
    }

    let _ = events.send(LinkEvent::Disconnected);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_websocket_urls() {
        let (tx, _rx) = unbounded_channel();
        assert!(WsLink::new("http://127.0.0.1:3001", tx.clone()).is_err());
        assert!(WsLink::new("not a url", tx.clone()).is_err());
        assert!(WsLink::new("ws://127.0.0.1:3001", tx).is_ok());
    }

    #[test]
    fn test_send_before_open_is_closed() {
        let (tx, _rx) = unbounded_channel();
        let mut link = WsLink::new("ws://127.0.0.1:3001", tx).expect("valid url");
        assert!(matches!(link.send("{}".to_string()), Err(TransportError::Closed)));
    }

    #[test]
    fn test_open_outside_runtime_fails() {
        //! Opening needs a tokio runtime to spawn the socket task on
        let (tx, _rx) = unbounded_channel();
        let mut link = WsLink::new("ws://127.0.0.1:3001", tx).expect("valid url");
        assert!(matches!(link.open(), Err(TransportError::Runtime(_))));
    }
}
