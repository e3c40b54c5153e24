use crate::brain::{Reply, Session};
use serde::Serialize;
use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The supervisor task has stopped and no longer accepts messages.
    #[error("Supervisor unavailable: {0}")]
    Unavailable(String),
    /// The supervisor dropped the reply channel without answering.
    #[error("No reply from supervisor: {0}")]
    NoReply(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A user message for a conversation. Creates the conversation's session on first use.
    ProcessUserMessage {
        conversation_id: String,
        content: String,
        /// A channel to send the reply back.
        responder: oneshot::Sender<Reply>,
    },
    /// The transport's session-start command. Answers with the welcome text;
    /// existing session state is kept.
    StartConversation {
        conversation_id: String,
        responder: oneshot::Sender<String>,
    },
    /// Forget a conversation's topic and name. Answers whether a session existed.
    ResetConversation {
        conversation_id: String,
        responder: oneshot::Sender<bool>,
    },
    /// A copy of a conversation's session, if it is still held.
    Snapshot {
        conversation_id: String,
        responder: oneshot::Sender<Option<Session>>,
    },
    /// Number of conversations currently held.
    SessionCount {
        responder: oneshot::Sender<usize>,
    },
    /// A command to stop the supervisor.
    Shutdown,
}
