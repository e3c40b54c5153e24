//! Console transport and the loop that connects a transport to the supervisor.

use crate::actors::messages::AppError;
use crate::actors::supervisor::SupervisorHandle;
use crate::actors::traits::{InboundEvent, MessageTransport};
use async_trait::async_trait;
use std::borrow::Cow;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info, instrument, warn};

/// Conversation id used for the single console user.
pub const CONSOLE_CONVERSATION: &str = "console";

const START_COMMAND: &str = "/start";
const RESET_COMMAND: &str = "/reset";

/// Line-oriented transport: one line in, one line out, single conversation.
/// Input that is not valid UTF-8 is decoded lossily rather than ending the session.
pub struct ConsoleTransport<R, W> {
    reader: R,
    buffer: Vec<u8>,
    writer: W,
}

impl ConsoleTransport<BufReader<io::Stdin>, io::Stdout> {
    /// Reads from stdin, writes to stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            writer,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> MessageTransport for ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<InboundEvent>, AppError> {
        loop {
            self.buffer.clear();
            if self.reader.read_until(b'\n', &mut self.buffer).await? == 0 {
                return Ok(None);
            }
            let line = String::from_utf8_lossy(&self.buffer);
            if matches!(line, Cow::Owned(_)) {
                warn!("Console input was not valid UTF-8, invalid bytes replaced");
            }
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let conversation_id = CONSOLE_CONVERSATION.to_string();
            let event = match text {
                START_COMMAND => InboundEvent::Start { conversation_id },
                RESET_COMMAND => InboundEvent::Reset { conversation_id },
                _ => InboundEvent::Message {
                    conversation_id,
                    text: text.to_string(),
                },
            };
            return Ok(Some(event));
        }
    }

    async fn send(&mut self, _conversation_id: &str, text: &str) -> Result<(), AppError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Pumps events from a transport through the supervisor until the transport
/// closes. Supervisor failures on one message are logged and the loop goes on;
/// a failing transport ends it.
#[instrument(skip_all)]
pub async fn serve<T: MessageTransport>(
    transport: &mut T,
    supervisor: &SupervisorHandle,
) -> Result<(), AppError> {
    info!("Transport loop started");
    while let Some(event) = transport.receive().await? {
        let (conversation_id, result) = match event {
            InboundEvent::Start { conversation_id } => {
                let result = supervisor.start_conversation(conversation_id.clone()).await;
                (conversation_id, result)
            }
            InboundEvent::Reset { conversation_id } => {
                let result = supervisor
                    .reset_conversation(conversation_id.clone())
                    .await
                    .map(|_| "Conversation cleared.".to_string());
                (conversation_id, result)
            }
            InboundEvent::Message {
                conversation_id,
                text,
            } => {
                let result = supervisor
                    .process_message(conversation_id.clone(), text)
                    .await;
                (conversation_id, result)
            }
        };
        match result {
            Ok(reply) => {
                if let Err(e) = transport.send(&conversation_id, &reply).await {
                    error!(conversation = %conversation_id, "Failed to deliver reply: {}", e);
                    return Err(e);
                }
            }
            Err(e) => warn!(conversation = %conversation_id, "No reply produced: {}", e),
        }
    }
    info!("Transport closed");
    Ok(())
}
