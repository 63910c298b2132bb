//! Chat message domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::new_token;

/// A message exchanged about a ride, stored in `chat_<rideId>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub ride_id: String,
    pub sender_id: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl ChatMessage {
    pub fn new(ride_id: impl Into<String>, sender_id: impl Into<String>, text: &str) -> Self {
        Self {
            id: new_token(),
            ride_id: ride_id.into(),
            sender_id: sender_id.into(),
            text: text.trim().to_string(),
            sent_at: Utc::now(),
            is_read: false,
        }
    }
}
