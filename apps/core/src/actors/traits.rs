use crate::actors::messages::AppError;
use async_trait::async_trait;

/// An event delivered by a chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The user started (or restarted) a conversation, e.g. a `/start` command.
    Start { conversation_id: String },
    /// The user asked to forget the conversation, e.g. a `/reset` command.
    Reset { conversation_id: String },
    /// A free-text message.
    Message { conversation_id: String, text: String },
}

/// Defines the boundary between the responder and whatever carries messages
/// to and from users (console, chat platform, HTTP...).
#[async_trait]
pub trait MessageTransport: Send {
    /// Waits for the next inbound event. `Ok(None)` means the transport is closed.
    async fn receive(&mut self) -> Result<Option<InboundEvent>, AppError>;

    /// Delivers a reply to a conversation.
    async fn send(&mut self, conversation_id: &str, text: &str) -> Result<(), AppError>;
}
