// File: modlink-core/src/services/outcome.rs

use tracing::{info, warn};

use modlink_common::models::discord::DiscordAccount;
use modlink_common::models::verification::{
    MatchSearch, RenameStatus, VerificationQuery, VerifyOutcome,
};
use modlink_common::traits::MemberApi;

/// Discord rejects nicknames longer than this many characters.
pub const MAX_NICKNAME_LEN: usize = 32;

/// Separator between the external and local name in a verified nickname.
pub const NICKNAME_SEPARATOR: &str = " | ";

pub fn canonical_nickname(external: &str, local: &str) -> String {
    format!("{external}{NICKNAME_SEPARATOR}{local}")
}

/// Grants the verified role and renames the member when `search` found a
/// match. A failed grant fails the attempt; a failed rename does not.
pub async fn apply(
    members: &dyn MemberApi,
    guild_id: &str,
    role_id: &str,
    account: &DiscordAccount,
    query: &VerificationQuery,
    search: MatchSearch,
) -> VerifyOutcome {
    let Some(matched) = search.matched else {
        if let Some(banned) = search.banned {
            info!(
                "Verification of {} as {} blocked by status '{}'",
                account.user_id, banned.record.external_identity, banned.record.status
            );
            return VerifyOutcome::Banned {
                external_identity: banned.record.external_identity,
                status: banned.record.status,
            };
        }
        info!(
            "No modmail for {} from {} ({} records examined)",
            query.external_identity_input, account.user_id, search.examined
        );
        return VerifyOutcome::NoMatch {
            external_identity: query.external_identity_input.clone(),
            candidate_names: query.candidate_local_names.clone(),
            lookback_cutoff: query.lookback_cutoff,
            max_scanned: query.max_scanned,
        };
    };

    let external_identity = matched.record.external_identity;
    let local_name = matched.matched_local_name;

    let role_already_held = account.has_role(role_id);
    if !role_already_held {
        if let Err(e) = members.grant_role(guild_id, &account.user_id, role_id).await {
            warn!("Failed to grant role {} to {}: {}", role_id, account.user_id, e);
            return VerifyOutcome::RoleGrantFailed {
                external_identity,
                reason: e.to_string(),
            };
        }
        info!("Granted role {} to {}", role_id, account.user_id);
    }

    let nickname = canonical_nickname(&external_identity, &local_name);
    let rename = if nickname.chars().count() > MAX_NICKNAME_LEN {
        warn!("Nickname '{}' exceeds {} characters; not renaming", nickname, MAX_NICKNAME_LEN);
        RenameStatus::Failed(format!(
            "the name '{nickname}' is longer than {MAX_NICKNAME_LEN} characters"
        ))
    } else if account.nick.as_deref() == Some(nickname.as_str()) {
        RenameStatus::Applied
    } else {
        match members.set_nickname(guild_id, &account.user_id, &nickname).await {
            Ok(()) => RenameStatus::Applied,
            Err(e) => {
                warn!("Failed to rename {} to '{}': {}", account.user_id, nickname, e);
                RenameStatus::Failed(e.to_string())
            }
        }
    };

    VerifyOutcome::Verified {
        external_identity,
        local_name,
        nickname,
        role_already_held,
        rename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;
    use modlink_common::models::verification::{MatchResult, ParsedRecord, ScannedRecord};
    use modlink_common::Error;

    use crate::test_utils::helpers::{account, modmail_message, MockMembers};

    fn query() -> VerificationQuery {
        VerificationQuery {
            external_identity_input: "Hermit_Toad".into(),
            candidate_local_names: vec!["pikachucatcher88".into()],
            lookback_cutoff: Utc::now() - Duration::days(7),
            max_scanned: 500,
        }
    }

    fn record(external: &str, status: &str) -> ParsedRecord {
        ParsedRecord {
            external_identity: external.into(),
            local_identity_claim: "pikachucatcher88".into(),
            status: status.into(),
        }
    }

    fn matched(external: &str) -> MatchSearch {
        MatchSearch {
            matched: Some(MatchResult {
                record: record(external, "Active"),
                source_message: modmail_message(1, 1, ""),
                matched_local_name: "pikachucatcher88".into(),
            }),
            banned: None,
            examined: 1,
        }
    }

    #[tokio::test]
    async fn grants_role_and_renames() {
        let mut members = MockMembers::new();
        members
            .expect_grant_role()
            .with(eq("1"), eq("42"), eq("7"))
            .times(1)
            .returning(|_, _, _| Ok(()));
        members
            .expect_set_nickname()
            .with(eq("1"), eq("42"), eq("Hermit_Toad | pikachucatcher88"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let acct = account("42", "pikachucatcher88");
        let outcome = apply(&members, "1", "7", &acct, &query(), matched("Hermit_Toad")).await;
        assert_eq!(
            outcome,
            VerifyOutcome::Verified {
                external_identity: "Hermit_Toad".into(),
                local_name: "pikachucatcher88".into(),
                nickname: "Hermit_Toad | pikachucatcher88".into(),
                role_already_held: false,
                rename: RenameStatus::Applied,
            }
        );
    }

    #[tokio::test]
    async fn held_role_is_not_granted_again() {
        let mut members = MockMembers::new();
        members.expect_grant_role().never();
        members.expect_set_nickname().times(1).returning(|_, _, _| Ok(()));

        let mut acct = account("42", "pikachucatcher88");
        acct.roles.push("7".into());
        let outcome = apply(&members, "1", "7", &acct, &query(), matched("Hermit_Toad")).await;
        assert!(matches!(
            outcome,
            VerifyOutcome::Verified { role_already_held: true, rename: RenameStatus::Applied, .. }
        ));
    }

    #[tokio::test]
    async fn rename_failure_is_partial_success() {
        let mut members = MockMembers::new();
        members.expect_grant_role().times(1).returning(|_, _, _| Ok(()));
        members
            .expect_set_nickname()
            .times(1)
            .returning(|_, _, _| Err(Error::Platform("Missing Permissions".into())));

        let acct = account("42", "pikachucatcher88");
        let outcome = apply(&members, "1", "7", &acct, &query(), matched("Hermit_Toad")).await;
        match outcome {
            VerifyOutcome::Verified { rename: RenameStatus::Failed(reason), .. } => {
                assert!(reason.contains("Missing Permissions"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn overlong_nickname_is_not_requested() {
        let mut members = MockMembers::new();
        members.expect_grant_role().times(1).returning(|_, _, _| Ok(()));
        members.expect_set_nickname().never();

        let acct = account("42", "pikachucatcher88");
        let outcome = apply(
            &members,
            "1",
            "7",
            &acct,
            &query(),
            matched("An_Extremely_Long_Reddit_Name"),
        )
        .await;
        assert!(matches!(
            outcome,
            VerifyOutcome::Verified { rename: RenameStatus::Failed(_), .. }
        ));
    }

    #[tokio::test]
    async fn role_failure_fails_attempt_without_rename() {
        let mut members = MockMembers::new();
        members
            .expect_grant_role()
            .times(1)
            .returning(|_, _, _| Err(Error::Platform("Unknown Role".into())));
        members.expect_set_nickname().never();

        let acct = account("42", "pikachucatcher88");
        let outcome = apply(&members, "1", "7", &acct, &query(), matched("Hermit_Toad")).await;
        assert!(matches!(outcome, VerifyOutcome::RoleGrantFailed { .. }));
    }

    #[tokio::test]
    async fn banned_and_missing_records_do_not_mutate() {
        let members = MockMembers::new();
        let acct = account("42", "pikachucatcher88");

        let banned = MatchSearch {
            matched: None,
            banned: Some(ScannedRecord {
                record: record("Hermit_Toad", "Banned"),
                message: modmail_message(1, 1, ""),
            }),
            examined: 1,
        };
        let outcome = apply(&members, "1", "7", &acct, &query(), banned).await;
        assert_eq!(
            outcome,
            VerifyOutcome::Banned {
                external_identity: "Hermit_Toad".into(),
                status: "Banned".into(),
            }
        );

        let q = query();
        let outcome = apply(&members, "1", "7", &acct, &q, MatchSearch::default()).await;
        assert_eq!(
            outcome,
            VerifyOutcome::NoMatch {
                external_identity: "Hermit_Toad".into(),
                candidate_names: vec!["pikachucatcher88".into()],
                lookback_cutoff: q.lookback_cutoff,
                max_scanned: 500,
            }
        );
    }
}
