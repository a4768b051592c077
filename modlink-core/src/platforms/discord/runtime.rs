use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_model::gateway::payload::incoming::{MessageCreate, Ready as ReadyPayload};

use crate::Error;
use crate::platforms::{ConnectionStatus, PlatformIntegration};
use crate::services::discord::DiscordMessageEvent;

/// Only what the bot acts on: guild messages (with content) and READY.
fn wanted_events() -> EventTypeFlags {
    EventTypeFlags::READY | EventTypeFlags::MESSAGE_CREATE
}

fn message_event(msg: &MessageCreate) -> DiscordMessageEvent {
    DiscordMessageEvent {
        message_id: msg.id.to_string(),
        channel_id: msg.channel_id.to_string(),
        guild_id: msg.guild_id.map(|g| g.to_string()),
        author_id: msg.author.id.to_string(),
        author_bot: msg.author.bot,
        content: msg.content.clone(),
    }
}

/// Reads gateway events for one shard and forwards guild messages to `tx`.
async fn shard_runner(mut shard: Shard, tx: UnboundedSender<DiscordMessageEvent>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    while let Some(item) = shard.next_event(wanted_events()).await {
        match item {
            Ok(Event::Ready(ready)) => {
                let data: &ReadyPayload = ready.as_ref();
                info!(
                    "Shard {shard_id} => READY as {} (ID={}) in {} guilds",
                    data.user.name,
                    data.user.id,
                    data.guilds.len()
                );
            }
            Ok(Event::MessageCreate(msg_create)) => {
                let msg: &MessageCreate = &msg_create;
                if msg.author.bot {
                    trace!("Ignoring bot message from {}", msg.author.name);
                    continue;
                }
                if tx.send(message_event(msg)).is_err() {
                    warn!("Shard {shard_id} => event receiver dropped; stopping");
                    break;
                }
            }
            Ok(other) => {
                debug!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// Gateway side of the Discord integration.
pub struct DiscordPlatform {
    token: String,
    connection_status: ConnectionStatus,
    http: Arc<HttpClient>,
    tx: UnboundedSender<DiscordMessageEvent>,
    shard_tasks: Vec<JoinHandle<()>>,
    shard_senders: Vec<MessageSender>,
}

impl DiscordPlatform {
    pub fn new(
        token: String,
        http: Arc<HttpClient>,
        tx: UnboundedSender<DiscordMessageEvent>,
    ) -> Self {
        Self {
            token,
            connection_status: ConnectionStatus::Disconnected,
            http,
            tx,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
        }
    }
}

#[async_trait]
impl PlatformIntegration for DiscordPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }
        if self.token.is_empty() {
            return Err(Error::Config("Discord token is empty".into()));
        }

        // Message content is privileged; without it modmail embeds arrive empty.
        let config = Config::new(
            self.token.clone(),
            Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT,
        );

        let shards = gateway::create_recommended(&self.http, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let tx_for_shard = self.tx.clone();
            let handle = tokio::spawn(async move {
                shard_runner(shard, tx_for_shard).await;
            });
            self.shard_tasks.push(handle);
        }

        info!("(DiscordPlatform) Connected with {} shard(s)", self.shard_tasks.len());
        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in &mut self.shard_tasks {
            let _ = task.await;
        }

        self.shard_senders.clear();
        self.shard_tasks.clear();
        info!("(DiscordPlatform) Disconnected");
        Ok(())
    }
}
