use crate::signaling::SignalSink;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use teleop_core::SignalMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// WebSocket connection to the rendezvous.
///
/// Frames are written by one task in submission order. Inbound frames are
/// parsed and handed out through the receiver returned by [`connect`].
///
/// [`connect`]: SignalingClient::connect
#[derive(Clone)]
pub struct SignalingClient {
    outbound: mpsc::UnboundedSender<SignalMessage>,
}

impl SignalingClient {
    pub async fn connect(url: &str) -> Result<(Self, mpsc::UnboundedReceiver<SignalMessage>)> {
        let (socket, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to rendezvous at {url}"))?;
        info!("Connected to rendezvous at {}", url);

        let (mut sink, mut stream) = socket.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<SignalMessage>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&msg) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize signal: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(msg) => {
                            if inbound_tx.send(msg).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid signal frame: {}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Signaling socket error: {}", e);
                        break;
                    }
                }
            }
            debug!("Signaling stream ended");
        });

        Ok((Self { outbound }, inbound_rx))
    }
}

#[async_trait]
impl SignalSink for SignalingClient {
    async fn send_signal(&self, msg: SignalMessage) -> Result<()> {
        self.outbound
            .send(msg)
            .map_err(|_| anyhow!("Signaling connection closed"))
    }
}
