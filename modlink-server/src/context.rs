//! modlink-server/src/context.rs
//!
//! Builds the long-lived pieces the bot runs with.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use twilight_http::Client as HttpClient;

use modlink_core::config::BotConfig;
use modlink_core::modmail::{FieldParser, ParserRules};
use modlink_core::platforms::discord::DiscordHttp;
use modlink_core::services::VerificationService;
use modlink_core::Error;

use crate::Args;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ServerContext {
    pub token: String,
    pub config: Arc<BotConfig>,
    pub http: Arc<HttpClient>,
    pub discord: Arc<DiscordHttp>,
    pub verification: Arc<VerificationService>,
}

impl ServerContext {
    pub fn new(args: &Args) -> Result<Self, Error> {
        let config = args.bot_config();
        config.validate()?;

        let rules = match &args.rules {
            Some(path) => {
                info!("Loading modmail parser rules from {}", path.display());
                ParserRules::from_path(path)?
            }
            None => ParserRules::default(),
        };

        let http = Arc::new(
            HttpClient::builder()
                .token(args.token.clone())
                .timeout(HTTP_TIMEOUT)
                .build(),
        );
        let discord = Arc::new(DiscordHttp::new(http.clone()));
        let config = Arc::new(config);

        let verification = Arc::new(VerificationService::new(
            config.clone(),
            discord.clone(),
            discord.clone(),
            FieldParser::new(rules),
        ));

        Ok(Self {
            token: args.token.clone(),
            config,
            http,
            discord,
            verification,
        })
    }
}
