//! Best-effort real-time notification relay
//!
//! Every notification is persisted first; it is then pushed to the receiver only
//! if they currently hold a registered socket. Offline receivers pick it up from
//! storage later.

pub mod protocol;
pub mod registry;
pub mod server;
pub mod store;

use std::sync::Arc;

use log::{error, info, warn};
use uuid::Uuid;

use crate::error::StoreResult;

pub use protocol::{ClientFrame, ServerFrame};
pub use registry::{ConnectionHandle, SessionRegistry};
pub use server::RelayServer;
pub use store::{MySqlNotificationStore, NotificationStore};

/// What happened to a notification after it was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Pushed to the receiver's live socket
    Delivered,
    /// Receiver offline; persisted only
    Stored,
}

pub struct NotificationRelay {
    registry: Arc<SessionRegistry>,
    store: Arc<dyn NotificationStore>,
}

impl NotificationRelay {
    pub fn new(registry: Arc<SessionRegistry>, store: Arc<dyn NotificationStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn register(&self, user_id: String, connection: ConnectionHandle) {
        self.registry.register(user_id, connection);
    }

    /// Persists then pushes. A storage failure means nothing was delivered.
    pub async fn send(&self, receiver_id: &str, message: &str, kind: &str) -> StoreResult<Delivery> {
        let notification = self.store.create(receiver_id, message, kind).await?;

        let delivered = match serde_json::to_string(&ServerFrame::NewNotification(&notification)) {
            Ok(frame) => self.registry.send_to(receiver_id, frame),
            Err(e) => {
                error!("Failed to encode notification {}: {}", notification.id, e);
                false
            }
        };

        if delivered {
            info!("Notification {} delivered to {}", notification.id, receiver_id);
            Ok(Delivery::Delivered)
        } else {
            info!("User {} offline, notification {} stored", receiver_id, notification.id);
            Ok(Delivery::Stored)
        }
    }

    pub fn disconnect(&self, connection_id: Uuid) {
        self.registry.remove_connection(connection_id);
    }

    /// Dispatches one client text frame. Malformed frames are logged and dropped.
    pub async fn handle_frame(&self, connection: &ConnectionHandle, text: &str) {
        match serde_json::from_str::<ClientFrame>(text) {
            Ok(ClientFrame::Register(user)) => {
                self.register(user.into_string(), connection.clone());
            }
            Ok(ClientFrame::SendNotification(req)) => {
                info!("🔔 Notification request for {} ({})", req.receiver_id, req.kind);
                if let Err(e) = self.send(&req.receiver_id, &req.message, &req.kind).await {
                    error!("Error saving/sending notification: {}", e);
                }
            }
            Err(e) => {
                warn!("[{}] Ignoring malformed frame: {}", connection.id, e);
            }
        }
    }
}
