// File: modlink-core/src/services/verification_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use modlink_common::models::discord::DiscordAccount;
use modlink_common::models::verification::{LookupOutcome, VerificationQuery, VerifyOutcome};
use modlink_common::traits::{HistorySource, MemberApi};

use crate::config::BotConfig;
use crate::modmail::parser::FieldParser;
use crate::modmail::rules::clean_identity;
use crate::modmail::scanner::scan;
use crate::services::matcher::find_match;
use crate::services::outcome::apply;

pub const PROFILE_URL_BASE: &str = "https://www.reddit.com/user/";

/// Entry points the command layer calls: `verify` and `lookup`.
pub struct VerificationService {
    config: Arc<BotConfig>,
    history: Arc<dyn HistorySource>,
    members: Arc<dyn MemberApi>,
    parser: FieldParser,
}

impl VerificationService {
    pub fn new(
        config: Arc<BotConfig>,
        history: Arc<dyn HistorySource>,
        members: Arc<dyn MemberApi>,
        parser: FieldParser,
    ) -> Self {
        Self {
            config,
            history,
            members,
            parser,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn members(&self) -> &dyn MemberApi {
        self.members.as_ref()
    }

    /// `None` when the input holds no usable identity.
    pub fn build_query(
        &self,
        external_identity_input: &str,
        account: &DiscordAccount,
        now: DateTime<Utc>,
    ) -> Option<VerificationQuery> {
        let external = clean_identity(external_identity_input)?;
        Some(VerificationQuery {
            external_identity_input: external,
            candidate_local_names: account.candidate_names(),
            lookback_cutoff: self.config.lookback_cutoff(now),
            max_scanned: self.config.max_scanned,
        })
    }

    /// Resolves the invoking member, then verifies. Resolution failures abort
    /// before any history is read.
    pub async fn verify_user(&self, external_identity_input: &str, user_id: &str) -> VerifyOutcome {
        match self.members.member(&self.config.guild_id, user_id).await {
            Ok(account) => self.verify(external_identity_input, &account).await,
            Err(e) => {
                warn!("Could not resolve member {} in {}: {}", user_id, self.config.guild_id, e);
                VerifyOutcome::Unavailable {
                    reason: "I couldn't look up your server membership.".into(),
                }
            }
        }
    }

    /// Looks for a modmail pairing `external_identity_input` with one of the
    /// account's names and applies the result. Never fails; every error is
    /// folded into the returned outcome.
    pub async fn verify(&self, external_identity_input: &str, account: &DiscordAccount) -> VerifyOutcome {
        let Some(query) = self.build_query(external_identity_input, account, Utc::now()) else {
            return VerifyOutcome::MissingIdentity;
        };
        info!(
            "Verifying {} as {} (candidates: {:?})",
            account.user_id, query.external_identity_input, query.candidate_local_names
        );

        let records = scan(
            self.history.as_ref(),
            &self.parser,
            self.config.modmail_channel_id.clone(),
            query.lookback_cutoff,
            query.max_scanned,
        );
        let search = match find_match(records, &query).await {
            Ok(search) => search,
            Err(e) => {
                warn!("Modmail scan of {} failed: {}", self.config.modmail_channel_id, e);
                return VerifyOutcome::Unavailable {
                    reason: "I couldn't read the modmail channel.".into(),
                };
            }
        };

        let outcome = apply(
            self.members.as_ref(),
            &self.config.guild_id,
            &self.config.verified_role_id,
            account,
            &query,
            search,
        )
        .await;
        info!("Verification outcome for {}: {:?}", account.user_id, outcome);
        outcome
    }

    pub async fn lookup_user(&self, user_id: &str) -> Result<LookupOutcome, modlink_common::Error> {
        let account = self.members.member(&self.config.guild_id, user_id).await?;
        Ok(lookup(&account))
    }
}

/// External identity from a `"external | local"` display name.
pub fn linked_identity(display_name: &str) -> Option<String> {
    let (external, _) = display_name.split_once('|')?;
    clean_identity(external)
}

pub fn lookup(account: &DiscordAccount) -> LookupOutcome {
    let display_name = account.display_name();
    match linked_identity(display_name) {
        Some(external_identity) => LookupOutcome::Linked {
            profile_url: format!("{PROFILE_URL_BASE}{external_identity}"),
            external_identity,
        },
        None => LookupOutcome::NotLinked {
            display_name: display_name.to_string(),
        },
    }
}
