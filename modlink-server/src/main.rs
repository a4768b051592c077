use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use modlink_core::config::{BotConfig, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_SCANNED, DEFAULT_PREFIX};

mod context;
mod server;

use server::run_server;

#[derive(Parser, Debug, Clone)]
#[command(name = "modlink")]
#[command(author, version, about = "modlink - verifies Discord members against Reddit modmail")]
pub struct Args {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: String,

    /// Guild (server) the bot verifies members in
    #[arg(long, env = "MODLINK_GUILD_ID")]
    guild_id: String,

    /// Channel the modmail relay forwards submissions into
    #[arg(long, env = "MODLINK_MODMAIL_CHANNEL_ID")]
    modmail_channel_id: String,

    /// Only accept commands in this channel
    #[arg(long, env = "MODLINK_VERIFY_CHANNEL_ID")]
    verify_channel_id: Option<String>,

    /// Role granted on successful verification
    #[arg(long, env = "MODLINK_VERIFIED_ROLE_ID")]
    verified_role_id: String,

    /// How far back (in days) to look for modmail
    #[arg(long, env = "MODLINK_LOOKBACK_DAYS", default_value_t = DEFAULT_LOOKBACK_DAYS)]
    lookback_days: i64,

    /// Maximum number of modmail messages inspected per attempt
    #[arg(long, env = "MODLINK_MAX_SCANNED", default_value_t = DEFAULT_MAX_SCANNED)]
    max_scanned: usize,

    /// Message command prefix
    #[arg(long, env = "MODLINK_PREFIX", default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Delete command messages after answering them
    #[arg(long, env = "MODLINK_DELETE_COMMANDS")]
    delete_commands: bool,

    /// Slowmode (seconds) to apply to the verify channel at startup
    #[arg(long, env = "MODLINK_SLOWMODE_SECS")]
    slowmode_secs: Option<u16>,

    /// JSON file overriding the modmail parser's labels and patterns
    #[arg(long, env = "MODLINK_RULES")]
    rules: Option<PathBuf>,
}

impl Args {
    pub fn bot_config(&self) -> BotConfig {
        let mut config = BotConfig::new(&self.guild_id, &self.modmail_channel_id, &self.verified_role_id);
        config.verify_channel_id = self.verify_channel_id.clone();
        config.lookback_days = self.lookback_days;
        config.max_scanned = self.max_scanned;
        config.command_prefix = self.prefix.clone();
        config.delete_commands = self.delete_commands;
        config.slowmode_secs = self.slowmode_secs;
        config
    }
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("modlink=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!(
        "modlink starting. guild={}, modmail_channel={}, verify_channel={:?}",
        args.guild_id, args.modmail_channel_id, args.verify_channel_id
    );

    if let Err(e) = run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}
