//! JSON text frames exchanged on the relay socket

use serde::{Deserialize, Serialize};

use crate::model::notification::Notification;

/// Frames a client may send.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    Register(UserKey),
    SendNotification(SendNotification),
}

/// Clients identify themselves with either a string or a numeric user id.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UserKey {
    Text(String),
    Number(u64),
}

impl UserKey {
    pub fn into_string(self) -> String {
        match self {
            UserKey::Text(s) => s,
            UserKey::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SendNotification {
    #[serde(alias = "receiverId")]
    pub receiver_id: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Frames the relay pushes to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerFrame<'a> {
    NewNotification(&'a Notification),
}
