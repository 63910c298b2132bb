//! Per-ride chat between the members of a ride

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::ChatMessage;
use crate::ports::{keys, KeyValueStore, KeyValueStoreExt};

/// Longest accepted message, in characters
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Chat service; messages live in `chat_<rideId>`, oldest first
pub struct ChatService {
    store: Arc<dyn KeyValueStore>,
}

impl ChatService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn messages(&self, ride_id: &str) -> Result<Vec<ChatMessage>> {
        self.store.get_json_or_default(&keys::chat(ride_id))
    }

    pub fn send(&self, ride_id: &str, sender_id: &str, text: &str) -> Result<ChatMessage> {
        let message = ChatMessage::new(ride_id, sender_id, text);
        if message.text.is_empty() {
            return Err(Error::validation("message cannot be empty"));
        }
        if message.text.chars().count() > MAX_MESSAGE_LEN {
            return Err(Error::validation(format!(
                "message cannot exceed {} characters",
                MAX_MESSAGE_LEN
            )));
        }

        let mut messages = self.messages(ride_id)?;
        messages.push(message.clone());
        self.store.set_json(&keys::chat(ride_id), &messages)?;
        Ok(message)
    }

    /// Mark messages sent by others as read; returns how many changed
    pub fn mark_read(&self, ride_id: &str, reader_id: &str) -> Result<usize> {
        let mut messages = self.messages(ride_id)?;
        let mut marked = 0;
        for message in messages
            .iter_mut()
            .filter(|m| m.sender_id != reader_id && !m.is_read)
        {
            message.is_read = true;
            marked += 1;
        }

        if marked > 0 {
            self.store.set_json(&keys::chat(ride_id), &messages)?;
        }
        Ok(marked)
    }

    pub fn unread_count(&self, ride_id: &str, reader_id: &str) -> Result<usize> {
        Ok(self
            .messages(ride_id)?
            .iter()
            .filter(|m| m.sender_id != reader_id && !m.is_read)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn service() -> ChatService {
        ChatService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_send_and_read() {
        let chat = service();
        chat.send("r1", "driver", "Estou chegando").unwrap();
        chat.send("r1", "passenger", "  Ok, aguardo  ").unwrap();
        chat.send("r1", "driver", "Portão principal").unwrap();

        let messages = chat.messages("r1").unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, "Ok, aguardo");

        assert_eq!(chat.unread_count("r1", "passenger").unwrap(), 2);
        assert_eq!(chat.mark_read("r1", "passenger").unwrap(), 2);
        assert_eq!(chat.unread_count("r1", "passenger").unwrap(), 0);
        assert_eq!(chat.unread_count("r1", "driver").unwrap(), 1);
    }

    #[test]
    fn test_rejects_blank_and_long_messages() {
        let chat = service();
        assert!(chat.send("r1", "a", "   ").is_err());
        assert!(chat.send("r1", "a", &"x".repeat(MAX_MESSAGE_LEN + 1)).is_err());
        assert!(chat.messages("r1").unwrap().is_empty());
    }

    #[test]
    fn test_chats_are_per_ride() {
        let chat = service();
        chat.send("r1", "a", "oi").unwrap();
        assert!(chat.messages("r2").unwrap().is_empty());
    }
}
