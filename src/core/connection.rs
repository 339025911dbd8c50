/// WebSocket plumbing for the position-sync protocol - event-driven and clean!
use anyhow::{Context as _, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, trace, warn};

use crate::core::direction::Direction;
use crate::core::messages::{self, ClientMessage, ServerMessage};

/// Cloneable sending handle. Scene code queues move intents here and never
/// touches the socket directly.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<ClientMessage>,
}

impl Outbox {
    pub fn new(tx: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self { tx }
    }

    /// Queues a move command. Once the socket is gone this silently drops the
    /// intent; movement just stops working until reconnect.
    pub fn send_move(&self, direction: Direction) {
        if self.tx.send(ClientMessage::Move { direction }).is_err() {
            trace!(?direction, "socket closed, move dropped");
        }
    }
}

/// A live session with the server: a reader task decoding frames into a
/// channel and a writer task draining the outbox into the socket.
pub struct Connection {
    inbound: mpsc::UnboundedReceiver<ServerMessage>,
    outbox: Outbox,
}

impl Connection {
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws_stream, _) = connect_async(url)
            .await
            .with_context(|| format!("connecting to {url}"))?;
        info!(%url, "connected to server");
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        let (in_tx, inbound) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();

        tokio::spawn(async move {
            while let Some(frame) = ws_receiver.next().await {
                match frame {
                    Ok(Message::Text(text)) => match messages::decode(text.as_str()) {
                        Ok(msg) => {
                            if in_tx.send(msg).is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(%err, frame = %text.as_str(), "skipping undecodable frame"),
                    },
                    Ok(Message::Close(_)) => break,
                    // Pings are answered by the protocol layer, binary frames
                    // are not part of this protocol.
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%err, "socket error");
                        break;
                    }
                }
            }
            info!("server connection closed");
        });

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let json = match messages::encode(&msg) {
                    Ok(json) => json,
                    Err(err) => {
                        warn!(%err, "dropping unencodable message");
                        continue;
                    }
                };
                if let Err(err) = ws_sender.send(Message::text(json)).await {
                    debug!(%err, "send failed, socket closed");
                    break;
                }
            }
        });

        Ok(Self {
            inbound,
            outbox: Outbox::new(out_tx),
        })
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    /// Next decoded server message, or `None` once the connection is gone.
    pub async fn next_message(&mut self) -> Option<ServerMessage> {
        self.inbound.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    async fn frame_exchange_server(listener: TcpListener, frames: Vec<&'static str>) -> String {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        for frame in frames {
            ws.send(Message::text(frame)).await.unwrap();
        }
        let received = loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => break text.as_str().to_owned(),
                Some(Ok(_)) => continue,
                other => panic!("expected a text frame, got {other:?}"),
            }
        };
        ws.send(Message::text(r#"{"type":"playerLeft","id":"player-1"}"#))
            .await
            .unwrap();
        received
    }

    #[tokio::test]
    async fn round_trips_against_a_live_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(frame_exchange_server(
            listener,
            vec![r#"{"type":"setPlayerId","id":"player-1","x":100,"y":100}"#],
        ));

        let mut conn = Connection::connect(&format!("ws://{addr}")).await.unwrap();
        assert_eq!(
            conn.next_message().await,
            Some(ServerMessage::SetPlayerId {
                id: "player-1".into(),
                x: 100.0,
                y: 100.0,
            })
        );

        conn.outbox().send_move(Direction::Right);
        assert_eq!(
            conn.next_message().await,
            Some(ServerMessage::PlayerLeft {
                id: "player-1".into(),
            })
        );

        let sent = server.await.unwrap();
        assert_eq!(sent, r#"{"type":"move","direction":"right"}"#);
    }

    #[tokio::test]
    async fn undecodable_frames_are_skipped() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(frame_exchange_server(
            listener,
            vec![
                "this is not json",
                r#"{"type":"playerMoved"}"#,
                r#"{"type":"newplayer","id":"player-2","x":150,"y":100}"#,
            ],
        ));

        let mut conn = Connection::connect(&format!("ws://{addr}")).await.unwrap();
        assert_eq!(
            conn.next_message().await,
            Some(ServerMessage::NewPlayer {
                id: "player-2".into(),
                x: 150.0,
                y: 100.0,
            })
        );

        conn.outbox().send_move(Direction::Up);
        assert_eq!(
            conn.next_message().await,
            Some(ServerMessage::PlayerLeft {
                id: "player-1".into(),
            })
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn sending_after_close_is_a_quiet_no_op() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            ws.close(None).await.unwrap();
        });

        let mut conn = Connection::connect(&format!("ws://{addr}")).await.unwrap();
        assert_eq!(conn.next_message().await, None);
        // The socket is gone; this must neither error nor panic.
        conn.outbox().send_move(Direction::Left);
    }
}
