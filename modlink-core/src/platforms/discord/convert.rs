// File: src/platforms/discord/convert.rs
//
// Twilight models -> platform-neutral models, and string IDs -> snowflakes.

use chrono::{DateTime, Utc};
use twilight_model::channel::Message;
use twilight_model::guild::Member;
use twilight_model::id::Id;

use modlink_common::models::discord::{DiscordAccount, EmbedBlock, EmbedField, MessageAuthor, RawMessage};
use modlink_common::Error;

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

pub fn parse_id<T>(what: &str, raw: &str) -> Result<Id<T>, Error> {
    raw.parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::Platform(format!("Invalid {what} ID: {raw}")))
}

/// Creation time encoded in a snowflake.
pub fn snowflake_time(id: u64) -> DateTime<Utc> {
    let ms = (id >> 22) as i64 + DISCORD_EPOCH_MS;
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

pub fn raw_message(msg: &Message) -> RawMessage {
    let timestamp = DateTime::from_timestamp_micros(msg.timestamp.as_micros())
        .unwrap_or_else(|| snowflake_time(msg.id.get()));

    let embeds = msg
        .embeds
        .iter()
        .map(|e| EmbedBlock {
            title: e.title.clone(),
            description: e.description.clone(),
            fields: e
                .fields
                .iter()
                .map(|f| EmbedField {
                    name: f.name.clone(),
                    value: f.value.clone(),
                })
                .collect(),
        })
        .collect();

    RawMessage {
        id: msg.id.to_string(),
        channel_id: msg.channel_id.to_string(),
        author: MessageAuthor {
            id: msg.author.id.to_string(),
            name: msg.author.name.clone(),
            bot: msg.author.bot,
        },
        content: msg.content.clone(),
        embeds,
        timestamp,
    }
}

pub fn account(member: &Member) -> DiscordAccount {
    DiscordAccount {
        user_id: member.user.id.to_string(),
        username: member.user.name.clone(),
        global_name: member.user.global_name.clone(),
        nick: member.nick.clone(),
        roles: member.roles.iter().map(|r| r.to_string()).collect(),
    }
}
