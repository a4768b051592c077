// File: modlink-common/src/traits/platform_traits.rs

use async_trait::async_trait;

use crate::error::Error;
use crate::models::discord::{DiscordAccount, RawMessage};

/// Backward-paginated access to a channel's history.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Returns up to `limit` messages older than `before` (or the newest
    /// messages if `before` is `None`), newest first.
    async fn fetch_page(
        &self,
        channel_id: &str,
        before: Option<&str>,
        limit: u16,
    ) -> Result<Vec<RawMessage>, Error>;
}

/// Guild member reads and writes used by the verification flow.
#[async_trait]
pub trait MemberApi: Send + Sync {
    async fn member(&self, guild_id: &str, user_id: &str) -> Result<DiscordAccount, Error>;

    async fn grant_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<(), Error>;

    async fn set_nickname(&self, guild_id: &str, user_id: &str, nickname: &str) -> Result<(), Error>;

    async fn send_reply(&self, channel_id: &str, reply_to: &str, text: &str) -> Result<(), Error>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), Error>;

    async fn set_slowmode(&self, channel_id: &str, seconds: u16) -> Result<(), Error>;
}
