//! WebSocket listener for the notification relay

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use super::{ConnectionHandle, NotificationRelay};

/// Pause after a failed accept so fd exhaustion does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct RelayServer {
    listener: TcpListener,
    relay: Arc<NotificationRelay>,
}

impl RelayServer {
    pub async fn bind(addr: &str, relay: Arc<NotificationRelay>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, relay })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the listener fails.
    pub async fn run(self) {
        match self.listener.local_addr() {
            Ok(addr) => info!("🔔 Notification relay listening on ws://{}", addr),
            Err(e) => warn!("Notification relay started, local address unknown: {}", e),
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let relay = self.relay.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, relay).await {
                            error!("Connection error from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    relay: Arc<NotificationRelay>,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let connection = ConnectionHandle::new(tx);
    let connection_id = connection.id;
    info!("⚡ [{}] Connected from {}", connection_id, addr);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sender.send(Message::Text(msg)).await {
                error!("[{}] Send error: {}", connection_id, e);
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => relay.handle_frame(&connection, &text).await,
            Ok(Message::Close(frame)) => {
                info!("[{}] Close frame received: {:?}", connection_id, frame);
                break;
            }
            Ok(Message::Binary(data)) => {
                warn!(
                    "[{}] Binary message received ({} bytes), ignoring",
                    connection_id,
                    data.len()
                );
            }
            // Pongs are answered by tungstenite
            Ok(_) => {}
            Err(e) => {
                error!("[{}] WebSocket error: {}", connection_id, e);
                break;
            }
        }
    }

    relay.disconnect(connection_id);
    send_task.abort();
    info!(
        "[{}] Disconnected after {}s",
        connection_id,
        connection.age(Utc::now()).num_seconds()
    );

    Ok(())
}
