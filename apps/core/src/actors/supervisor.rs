use crate::actors::messages::{ActorError, AppError, SupervisorMessage};
use crate::brain::{Reply, Responder, Session};
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, info, instrument};

/// A handle to the `SupervisorActor`.
///
/// This is the entry point for the transport layer. The actor owns one
/// [`Session`] per conversation and runs every message through the
/// [`Responder`], so conversations never see each other's topic or name.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    reply_timeout: Duration,
}

impl SupervisorHandle {
    /// Spawns the supervisor on the current Tokio runtime and returns a handle.
    ///
    /// # Arguments
    ///
    /// * `responder` - The engine used to answer every conversation.
    /// * `capacity` - How many conversations are kept; the least recently active is dropped first.
    /// * `reply_timeout` - How long a handle call waits for the actor.
    pub fn new(responder: Responder, capacity: NonZeroUsize, reply_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = SupervisorRunner::new(receiver, responder, capacity);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout,
        }
    }

    /// Answers a user message and reports which branch of the cascade produced it.
    #[instrument(skip(self, content))]
    pub async fn process_message_with_route(
        &self,
        conversation_id: String,
        content: String,
    ) -> Result<Reply, AppError> {
        self.request(|responder| SupervisorMessage::ProcessUserMessage {
            conversation_id,
            content,
            responder,
        })
        .await
    }

    /// Answers a user message.
    pub async fn process_message(
        &self,
        conversation_id: String,
        content: String,
    ) -> Result<String, AppError> {
        Ok(self
            .process_message_with_route(conversation_id, content)
            .await?
            .text)
    }

    /// Welcome text for a conversation starting.
    #[instrument(skip(self))]
    pub async fn start_conversation(&self, conversation_id: String) -> Result<String, AppError> {
        self.request(|responder| SupervisorMessage::StartConversation {
            conversation_id,
            responder,
        })
        .await
    }

    /// Drops a conversation's state. Returns whether it existed.
    #[instrument(skip(self))]
    pub async fn reset_conversation(&self, conversation_id: String) -> Result<bool, AppError> {
        self.request(|responder| SupervisorMessage::ResetConversation {
            conversation_id,
            responder,
        })
        .await
    }

    /// A copy of the conversation's current session.
    pub async fn session_snapshot(
        &self,
        conversation_id: String,
    ) -> Result<Option<Session>, AppError> {
        self.request(|responder| SupervisorMessage::Snapshot {
            conversation_id,
            responder,
        })
        .await
    }

    pub async fn session_count(&self) -> Result<usize, AppError> {
        self.request(|responder| SupervisorMessage::SessionCount { responder })
            .await
    }

    /// Stops the supervisor. Later calls on any handle fail with `ActorError::Unavailable`.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(ActorError::Unavailable(e.to_string())))
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SupervisorMessage,
    ) -> Result<T, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(build(send))
            .await
            .map_err(|e| AppError::Actor(ActorError::Unavailable(e.to_string())))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(ActorError::NoReply(e.to_string())))
    }
}

// --- Actor Runner ---
struct SupervisorRunner {
    receiver: mpsc::Receiver<SupervisorMessage>,
    responder: Responder,
    sessions: LruCache<String, Session>,
}

impl SupervisorRunner {
    fn new(
        receiver: mpsc::Receiver<SupervisorMessage>,
        responder: Responder,
        capacity: NonZeroUsize,
    ) -> Self {
        Self {
            receiver,
            responder,
            sessions: LruCache::new(capacity),
        }
    }

    async fn run(mut self) {
        info!(capacity = self.sessions.cap().get(), "Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, SupervisorMessage::Shutdown) {
                info!("Supervisor shutting down...");
                break;
            }
            self.handle_message(msg);
        }
        info!("Supervisor stopped");
    }

    fn handle_message(&mut self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::ProcessUserMessage {
                conversation_id,
                content,
                responder,
            } => {
                debug!(conversation = %conversation_id, "Supervisor received: {}", content);
                let session = session_entry(&mut self.sessions, conversation_id);
                let reply = self.responder.respond(session, &content);
                let _ = responder.send(reply);
            }
            SupervisorMessage::StartConversation {
                conversation_id,
                responder,
            } => {
                info!(conversation = %conversation_id, "Conversation started");
                session_entry(&mut self.sessions, conversation_id);
                let _ = responder.send(self.responder.welcome().to_string());
            }
            SupervisorMessage::ResetConversation {
                conversation_id,
                responder,
            } => {
                let existed = self.sessions.pop(&conversation_id).is_some();
                info!(conversation = %conversation_id, existed, "Conversation reset");
                let _ = responder.send(existed);
            }
            SupervisorMessage::Snapshot {
                conversation_id,
                responder,
            } => {
                let _ = responder.send(self.sessions.peek(&conversation_id).cloned());
            }
            SupervisorMessage::SessionCount { responder } => {
                let _ = responder.send(self.sessions.len());
            }
            SupervisorMessage::Shutdown => {}
        }
    }
}

/// The conversation's session, created on first use.
fn session_entry(sessions: &mut LruCache<String, Session>, conversation_id: String) -> &mut Session {
    if !sessions.contains(&conversation_id) && sessions.len() == sessions.cap().get() {
        if let Some((evicted, session)) = sessions.pop_lru() {
            info!(
                conversation = %evicted,
                started_at = %session.started_at,
                last_active = %session.last_active,
                replies = session.replies(),
                "Session evicted, capacity reached"
            );
        }
    }
    let id = conversation_id.clone();
    sessions.get_or_insert_mut(conversation_id, || Session::new(id))
}
