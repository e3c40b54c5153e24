// faqbot entry point
// Console front-end for the enquiry responder. Type /start for the welcome,
// /reset to forget the conversation, Ctrl+D or Ctrl+C to leave.

use anyhow::{Context, Result};
use faqbot_core::actors::supervisor::SupervisorHandle;
use faqbot_core::brain::Responder;
use faqbot_core::config::Settings;
use faqbot_core::telemetry::init_tracing;
use faqbot_core::transport::{serve, ConsoleTransport};
use std::num::NonZeroUsize;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Invalid configuration")?;
    init_tracing(settings.log_format);

    let knowledge = settings
        .knowledge_base()
        .context("Failed to load knowledge base")?;
    let responder = Responder::new(&knowledge, settings.response_selection)
        .context("Failed to build responder")?;

    let capacity = NonZeroUsize::new(settings.session_capacity)
        .context("Session capacity must be non-zero")?;
    let supervisor = SupervisorHandle::new(responder, capacity, settings.reply_timeout());
    info!(
        selection = %settings.response_selection,
        capacity = settings.session_capacity,
        "Responder ready"
    );

    let mut transport = ConsoleTransport::stdio();
    tokio::select! {
        result = serve(&mut transport, &supervisor) => {
            result.context("Console transport failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
        }
    }

    supervisor.shutdown().await.ok();
    Ok(())
}
