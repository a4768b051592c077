// File: modlink-core/src/config.rs

use chrono::{DateTime, TimeDelta, Utc};

use modlink_common::Error;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;
pub const DEFAULT_MAX_SCANNED: usize = 500;
pub const DEFAULT_PREFIX: &str = "!";
pub const MAX_LOOKBACK_DAYS: i64 = 3650;

/// Everything the verification flow needs to know about the guild it serves.
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub guild_id: String,
    /// Channel the modmail relay forwards submissions into.
    pub modmail_channel_id: String,
    /// If set, commands are only accepted in this channel.
    pub verify_channel_id: Option<String>,
    pub verified_role_id: String,
    pub lookback_days: i64,
    pub max_scanned: usize,
    pub command_prefix: String,
    /// Delete the invoking command message once it has been answered.
    pub delete_commands: bool,
    /// Slowmode applied to the verify channel at startup.
    pub slowmode_secs: Option<u16>,
}

impl BotConfig {
    pub fn new(guild_id: &str, modmail_channel_id: &str, verified_role_id: &str) -> Self {
        Self {
            guild_id: guild_id.to_string(),
            modmail_channel_id: modmail_channel_id.to_string(),
            verify_channel_id: None,
            verified_role_id: verified_role_id.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            max_scanned: DEFAULT_MAX_SCANNED,
            command_prefix: DEFAULT_PREFIX.to_string(),
            delete_commands: false,
            slowmode_secs: None,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        check_snowflake("guild id", &self.guild_id)?;
        check_snowflake("modmail channel id", &self.modmail_channel_id)?;
        check_snowflake("verified role id", &self.verified_role_id)?;
        if let Some(channel) = &self.verify_channel_id {
            check_snowflake("verify channel id", channel)?;
        }
        if self.lookback_days <= 0 {
            return Err(Error::Config("lookback days must be positive".into()));
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(Error::Config(format!(
                "lookback of {} days exceeds {MAX_LOOKBACK_DAYS}",
                self.lookback_days
            )));
        }
        if self.max_scanned == 0 {
            return Err(Error::Config("max scanned must be positive".into()));
        }
        if self.command_prefix.trim().is_empty() {
            return Err(Error::Config("command prefix must not be empty".into()));
        }
        // Discord caps slowmode at six hours.
        if let Some(secs) = self.slowmode_secs {
            if secs > 21_600 {
                return Err(Error::Config(format!("slowmode of {secs}s exceeds 21600s")));
            }
        }
        Ok(())
    }

    /// Oldest timestamp a scan accepts. Saturates at the earliest
    /// representable time instead of overflowing.
    pub fn lookback_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::try_days(self.lookback_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether commands posted in `channel_id` should be handled.
    pub fn accepts_channel(&self, channel_id: &str) -> bool {
        match &self.verify_channel_id {
            Some(verify) => verify == channel_id,
            None => true,
        }
    }
}

fn check_snowflake(what: &str, value: &str) -> Result<(), Error> {
    match value.parse::<u64>() {
        Ok(id) if id > 0 => Ok(()),
        _ => Err(Error::Config(format!("Invalid {what}: '{value}'"))),
    }
}
