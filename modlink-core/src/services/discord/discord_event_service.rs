use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::services::discord::command_handler::{CommandHandler, DiscordMessageEvent};

/// Drains gateway message events and handles each one in its own task, so
/// a slow modmail scan never holds up other members' commands.
pub struct DiscordEventService {
    rx: UnboundedReceiver<DiscordMessageEvent>,
    handler: Arc<CommandHandler>,
}

impl DiscordEventService {
    pub fn new(rx: UnboundedReceiver<DiscordMessageEvent>, handler: Arc<CommandHandler>) -> Self {
        Self { rx, handler }
    }

    /// Runs until every sender (the shard runners) has gone away.
    pub async fn start(mut self) {
        info!("DiscordEventService: Started, listening for messages");

        while let Some(event) = self.rx.recv().await {
            debug!("DiscordEventService: Received message {}", event.message_id);
            let handler = self.handler.clone();
            tokio::spawn(async move {
                handler.handle_message(&event).await;
            });
        }

        info!("DiscordEventService: Shutting down listener loop");
    }
}
