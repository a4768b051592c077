// File: modlink-core/src/test_utils/helpers.rs

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use modlink_common::models::discord::{DiscordAccount, MessageAuthor, RawMessage};
use modlink_common::traits::{HistorySource, MemberApi};
use modlink_common::Error;
use mockall::mock;

mock! {
    pub Members {}
    #[async_trait]
    impl MemberApi for Members {
        async fn member(&self, guild_id: &str, user_id: &str) -> Result<DiscordAccount, Error>;
        async fn grant_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<(), Error>;
        async fn set_nickname(&self, guild_id: &str, user_id: &str, nickname: &str) -> Result<(), Error>;
        async fn send_reply(&self, channel_id: &str, reply_to: &str, text: &str) -> Result<(), Error>;
        async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), Error>;
        async fn set_slowmode(&self, channel_id: &str, seconds: u16) -> Result<(), Error>;
    }
}

/// Builds a plain-text history message `minutes_ago` minutes old.
pub fn modmail_message(id: u64, minutes_ago: i64, content: &str) -> RawMessage {
    modmail_message_at(id, Utc::now() - Duration::minutes(minutes_ago), content)
}

pub fn modmail_message_at(id: u64, timestamp: DateTime<Utc>, content: &str) -> RawMessage {
    RawMessage {
        id: id.to_string(),
        channel_id: "100".into(),
        author: MessageAuthor {
            id: "900".into(),
            name: "Modmail".into(),
            bot: true,
        },
        content: content.into(),
        embeds: Vec::new(),
        timestamp,
    }
}

/// The standard forwarded-record text for `external` claiming `local`.
pub fn record_text(external: &str, local: &str, status: &str) -> String {
    format!(
        "Author: {external}\nBody: Register Discord with Discord ID: {local}\nStatus: {status}"
    )
}

pub fn account(user_id: &str, username: &str) -> DiscordAccount {
    DiscordAccount {
        user_id: user_id.into(),
        username: username.into(),
        global_name: None,
        nick: None,
        roles: Vec::new(),
    }
}

/// In-memory channel history. Messages are stored newest-first and served
/// the way Discord's `before` pagination does.
#[derive(Default)]
pub struct FakeHistory {
    messages: Vec<RawMessage>,
    /// Number of pages served before every further fetch fails.
    fail_after: Option<usize>,
    calls: Mutex<Vec<(Option<String>, u16)>>,
}

impl FakeHistory {
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            fail_after: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_after(mut self, pages: usize) -> Self {
        self.fail_after = Some(pages);
        self
    }

    /// `(before, limit)` for every fetch so far.
    pub fn calls(&self) -> Vec<(Option<String>, u16)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HistorySource for FakeHistory {
    async fn fetch_page(
        &self,
        _channel_id: &str,
        before: Option<&str>,
        limit: u16,
    ) -> Result<Vec<RawMessage>, Error> {
        let served = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| Error::Platform("fake history lock poisoned".into()))?;
            calls.push((before.map(str::to_string), limit));
            calls.len() - 1
        };
        if let Some(max) = self.fail_after {
            if served >= max {
                return Err(Error::Platform("history unavailable".into()));
            }
        }

        let start = match before {
            Some(id) => self
                .messages
                .iter()
                .position(|m| m.id == id)
                .map(|i| i + 1)
                .unwrap_or(self.messages.len()),
            None => 0,
        };
        Ok(self
            .messages
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
