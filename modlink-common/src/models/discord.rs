use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message as fetched from channel history. IDs are kept as strings and
/// parsed back into snowflakes by the platform layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: String,
    pub channel_id: String,
    pub author: MessageAuthor,
    pub content: String,
    pub embeds: Vec<EmbedBlock>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub id: String,
    pub name: String,
    pub bot: bool,
}

/// Structured display block attached to a message (a Discord embed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

/// A guild member as seen by the verification flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordAccount {
    pub user_id: String,
    pub username: String,
    pub global_name: Option<String>,
    pub nick: Option<String>,
    pub roles: Vec<String>,
}

impl DiscordAccount {
    /// Name shown in the guild: nickname, else global display name, else username.
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .or(self.global_name.as_deref())
            .unwrap_or(&self.username)
    }

    /// Every name this account could have written in a modmail, username first.
    /// Duplicates (ignoring case) are dropped.
    pub fn candidate_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let all = [
            Some(self.username.as_str()),
            self.global_name.as_deref(),
            self.nick.as_deref(),
        ];
        for name in all.into_iter().flatten() {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.to_string());
            }
        }
        names
    }

    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r == role_id)
    }
}
