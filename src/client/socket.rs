//! Tokio WebSocket driver
//!
//! [`SocketConnector`] implements [`Connector`] by spawning one task per
//! connection attempt. Each task owns its socket and reports what happens to
//! it as [`ClientEvent`]s tagged with the attempt's generation; reconnect
//! timers report back on the same channel. All state changes happen on the
//! receiving side, one event at a time.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use super::connection::{Connector, ReconnectTicket, Transport};
use crate::core::ClientError;

/// Events delivered from socket and timer tasks to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Opened { generation: u64 },
    Message { generation: u64, text: String },
    Errored { generation: u64, error: String },
    Closed { generation: u64, reason: String },
    ReconnectDue { token: u64 },
}

/// Transport backed by the outbound channel of a socket task
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl Transport for ChannelTransport {
    fn send_text(&mut self, frame: String) -> Result<(), ClientError> {
        self.tx
            .send(frame)
            .map_err(|_| ClientError::Transport("connection writer has shut down".to_string()))
    }
}

/// Spawns socket tasks and reconnect timers on the current Tokio runtime
pub struct SocketConnector {
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl SocketConnector {
    pub fn new(events: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { events }
    }
}

impl Connector for SocketConnector {
    fn open(&mut self, url: &Url, generation: u64) -> Box<dyn Transport> {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = self.events.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            run_socket(url, generation, events, rx).await;
        });
        Box::new(ChannelTransport { tx })
    }

    fn schedule_reconnect(&mut self, ticket: ReconnectTicket) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ticket.delay).await;
            let _ = events.send(ClientEvent::ReconnectDue {
                token: ticket.token,
            });
        });
    }
}

/// Drive one connection attempt until it closes.
///
/// A failed handshake reports an error followed by a close, like any other
/// dropped connection, so the reconnect path is the same for both. Dropping
/// the [`ChannelTransport`] closes the socket.
async fn run_socket(
    url: String,
    generation: u64,
    events: mpsc::UnboundedSender<ClientEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let (stream, _) = match connect_async(url.as_str()).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::debug!(generation, "Connect to {} failed: {}", url, e);
            let _ = events.send(ClientEvent::Errored {
                generation,
                error: e.to_string(),
            });
            let _ = events.send(ClientEvent::Closed {
                generation,
                reason: format!("connect: {e}"),
            });
            return;
        }
    };

    if events.send(ClientEvent::Opened { generation }).is_err() {
        return;
    }

    let (mut write, mut read) = stream.split();

    let reason = loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if events.send(ClientEvent::Message { generation, text }).is_err() {
                        break "client shut down".to_string();
                    }
                }
                Some(Ok(Message::Close(close))) => {
                    break close
                        .map(|c| format!("closed by server: {} {}", u16::from(c.code), c.reason))
                        .unwrap_or_else(|| "closed by server".to_string());
                }
                Some(Ok(_)) => {} // Binary and Ping/Pong frames handled by tungstenite.
                Some(Err(e)) => {
                    let _ = events.send(ClientEvent::Errored {
                        generation,
                        error: e.to_string(),
                    });
                    break format!("read error: {e}");
                }
                None => break "connection closed".to_string(),
            },
            outgoing = outbound.recv() => match outgoing {
                Some(frame) => {
                    if let Err(e) = write.send(Message::Text(frame)).await {
                        let _ = events.send(ClientEvent::Errored {
                            generation,
                            error: e.to_string(),
                        });
                        break format!("send error: {e}");
                    }
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    break "superseded".to_string();
                }
            },
        }
    };

    tracing::debug!(generation, "Socket task finished: {}", reason);
    let _ = events.send(ClientEvent::Closed { generation, reason });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_channel_transport_reports_dead_writer() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut transport = ChannelTransport { tx };
        assert!(transport.send_text("a".into()).is_ok());
        drop(rx);
        assert!(matches!(
            transport.send_text("b".into()),
            Err(ClientError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_reconnect_timer_delivers_token() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut connector = SocketConnector::new(tx);
        connector.schedule_reconnect(ReconnectTicket {
            token: 7,
            delay: Duration::from_millis(10),
        });

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timer fired")
            .expect("channel open");
        assert_eq!(event, ClientEvent::ReconnectDue { token: 7 });
    }

    #[tokio::test]
    async fn test_refused_connection_reports_error_then_close() {
        // Bind and drop a listener to get a port with nothing behind it.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut connector = SocketConnector::new(tx);
        let url = Url::parse(&format!("ws://127.0.0.1:{port}/ws")).unwrap();
        let _transport = connector.open(&url, 3);

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(first, ClientEvent::Errored { generation: 3, .. }));
        assert!(matches!(second, ClientEvent::Closed { generation: 3, .. }));
    }
}
