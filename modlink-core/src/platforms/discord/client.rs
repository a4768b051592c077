// File: src/platforms/discord/client.rs

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use twilight_http::error::ErrorType;
use twilight_http::Client as HttpClient;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker};

use modlink_common::models::discord::{DiscordAccount, RawMessage};
use modlink_common::traits::{HistorySource, MemberApi};
use modlink_common::Error;

use crate::platforms::discord::convert::{account, parse_id, raw_message};

/// REST side of the Discord integration.
#[derive(Clone)]
pub struct DiscordHttp {
    http: Arc<HttpClient>,
}

impl DiscordHttp {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

/// 404s become `NotFound` so callers can tell "no such member" from outages.
fn http_error(action: &str, e: twilight_http::Error) -> Error {
    match e.kind() {
        ErrorType::Response { status, .. } if status.get() == 404 => {
            Error::NotFound(format!("{action}: {e}"))
        }
        _ => Error::Platform(format!("{action}: {e}")),
    }
}

#[async_trait]
impl HistorySource for DiscordHttp {
    async fn fetch_page(
        &self,
        channel_id: &str,
        before: Option<&str>,
        limit: u16,
    ) -> Result<Vec<RawMessage>, Error> {
        let channel = parse_id::<ChannelMarker>("channel", channel_id)?;

        let response = match before {
            Some(before) => {
                let before = parse_id::<MessageMarker>("message", before)?;
                self.http
                    .channel_messages(channel)
                    .before(before)
                    .limit(limit)
                    .await
            }
            None => self.http.channel_messages(channel).limit(limit).await,
        }
        .map_err(|e| http_error("Error fetching channel history", e))?;

        let messages = response
            .models()
            .await
            .map_err(|e| Error::Platform(format!("Error parsing channel history: {e}")))?;
        debug!("Fetched {} messages from {}", messages.len(), channel_id);

        Ok(messages.iter().map(raw_message).collect())
    }
}

#[async_trait]
impl MemberApi for DiscordHttp {
    async fn member(&self, guild_id: &str, user_id: &str) -> Result<DiscordAccount, Error> {
        let guild = parse_id::<GuildMarker>("guild", guild_id)?;
        let user = parse_id::<UserMarker>("user", user_id)?;

        let member = self
            .http
            .guild_member(guild, user)
            .await
            .map_err(|e| http_error("Error fetching guild member", e))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error parsing guild member: {e}")))?;

        Ok(account(&member))
    }

    async fn grant_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<(), Error> {
        let guild = parse_id::<GuildMarker>("guild", guild_id)?;
        let user = parse_id::<UserMarker>("user", user_id)?;
        let role = parse_id::<RoleMarker>("role", role_id)?;

        self.http
            .add_guild_member_role(guild, user, role)
            .await
            .map_err(|e| http_error("Error adding role", e))?;
        Ok(())
    }

    async fn set_nickname(&self, guild_id: &str, user_id: &str, nickname: &str) -> Result<(), Error> {
        let guild = parse_id::<GuildMarker>("guild", guild_id)?;
        let user = parse_id::<UserMarker>("user", user_id)?;

        self.http
            .update_guild_member(guild, user)
            .nick(Some(nickname))
            .await
            .map_err(|e| http_error("Error setting nickname", e))?;
        Ok(())
    }

    async fn send_reply(&self, channel_id: &str, reply_to: &str, text: &str) -> Result<(), Error> {
        let channel = parse_id::<ChannelMarker>("channel", channel_id)?;
        let reply_to = parse_id::<MessageMarker>("message", reply_to)?;

        self.http
            .create_message(channel)
            .content(text)
            .reply(reply_to)
            .await
            .map_err(|e| http_error("Error sending Discord message", e))?;
        Ok(())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), Error> {
        let channel = parse_id::<ChannelMarker>("channel", channel_id)?;
        let message = parse_id::<MessageMarker>("message", message_id)?;

        self.http
            .delete_message(channel, message)
            .await
            .map_err(|e| http_error("Error deleting message", e))?;
        Ok(())
    }

    async fn set_slowmode(&self, channel_id: &str, seconds: u16) -> Result<(), Error> {
        let channel = parse_id::<ChannelMarker>("channel", channel_id)?;

        self.http
            .update_channel(channel)
            .rate_limit_per_user(seconds)
            .await
            .map_err(|e| http_error("Error setting slowmode", e))?;
        info!("Slowmode in {} set to {}s", channel_id, seconds);
        Ok(())
    }
}
