// File: modlink-core/src/services/discord/command_handler.rs

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::services::discord::commands::{parse_command, BotCommand};
use crate::modmail::echo::NOTICE_PREFIX;
use crate::services::discord::reply::{render_help, render_lookup, render_verify};
use crate::services::verification_service::VerificationService;

/// A guild message as delivered by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscordMessageEvent {
    pub message_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub author_id: String,
    pub author_bot: bool,
    pub content: String,
}

/// Runs the prefixed commands found in incoming messages.
pub struct CommandHandler {
    service: Arc<VerificationService>,
}

impl CommandHandler {
    pub fn new(service: Arc<VerificationService>) -> Self {
        Self { service }
    }

    /// Handles one message. Returns the command that ran, if any. Nothing in
    /// here fails the caller: reply and cleanup errors are logged and dropped.
    pub async fn handle_message(&self, event: &DiscordMessageEvent) -> Option<BotCommand> {
        let config = self.service.config();

        if event.author_bot {
            debug!("Ignoring bot message {}", event.message_id);
            return None;
        }
        if event.guild_id.as_deref() != Some(config.guild_id.as_str()) {
            return None;
        }
        if !config.accepts_channel(&event.channel_id) {
            return None;
        }
        let command = parse_command(&config.command_prefix, &event.content)?;
        info!("Command {:?} from {} in {}", command, event.author_id, event.channel_id);

        let reply = match &command {
            BotCommand::Verify(input) => {
                let outcome = self.service.verify_user(input, &event.author_id).await;
                render_verify(&outcome, &config.command_prefix)
            }
            BotCommand::Lookup(target) => {
                let user_id = target.as_deref().unwrap_or(&event.author_id);
                match self.service.lookup_user(user_id).await {
                    Ok(outcome) => render_lookup(&outcome),
                    Err(e) => {
                        warn!("Lookup of {} failed: {}", user_id, e);
                        format!("{NOTICE_PREFIX} I couldn't find that member.")
                    }
                }
            }
            BotCommand::Help => render_help(&config.command_prefix),
        };

        let members = self.service.members();
        if let Err(e) = members
            .send_reply(&event.channel_id, &event.message_id, &reply)
            .await
        {
            warn!("Failed to reply in {}: {}", event.channel_id, e);
        }

        if config.delete_commands {
            if let Err(e) = members
                .delete_message(&event.channel_id, &event.message_id)
                .await
            {
                warn!("Failed to delete command message {}: {}", event.message_id, e);
            }
        }

        Some(command)
    }
}
