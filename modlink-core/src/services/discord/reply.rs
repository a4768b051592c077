// File: modlink-core/src/services/discord/reply.rs

use modlink_common::models::verification::{LookupOutcome, RenameStatus, VerifyOutcome};

use crate::modmail::echo::{FAILURE_PREFIX, INFO_PREFIX, LOOKUP_PREFIX, NOTICE_PREFIX, VERIFIED_PREFIX};

/// Phrase users are told to put in their modmail body.
pub fn expected_phrase(local_name: &str) -> String {
    format!("Register Discord with Discord ID: {local_name}")
}

pub fn render_verify(outcome: &VerifyOutcome, prefix: &str) -> String {
    match outcome {
        VerifyOutcome::Verified {
            external_identity,
            nickname,
            rename,
            role_already_held,
            ..
        } => {
            let mut text = if *role_already_held {
                format!("{VERIFIED_PREFIX} You're already verified as u/{external_identity}.")
            } else {
                format!("{VERIFIED_PREFIX} Verified as u/{external_identity}. Welcome!")
            };
            if let RenameStatus::Failed(reason) = rename {
                text.push_str(&format!(
                    "\n{NOTICE_PREFIX} I couldn't change your nickname to `{nickname}` ({reason}). \
                     A moderator can set it for you."
                ));
            }
            text
        }
        VerifyOutcome::NoMatch {
            external_identity,
            candidate_names,
            lookback_cutoff,
            ..
        } => {
            let name = candidate_names
                .first()
                .map(String::as_str)
                .unwrap_or("your-discord-username");
            format!(
                "{FAILURE_PREFIX} I couldn't find a modmail from u/{external_identity} naming your \
                 Discord account since {}.\nSend a modmail from u/{external_identity} whose body \
                 says `{}`, wait a minute for it to arrive, then run `{prefix}verify {external_identity}` again.",
                lookback_cutoff.format("%Y-%m-%d"),
                expected_phrase(name),
            )
        }
        VerifyOutcome::Banned { external_identity, .. } => format!(
            "{FAILURE_PREFIX} A modmail from u/{external_identity} was found, but that account is \
             banned from the subreddit, so I can't verify it. Contact the moderators if you think \
             this is a mistake."
        ),
        VerifyOutcome::RoleGrantFailed { reason, .. } => format!(
            "{FAILURE_PREFIX} Your modmail checks out, but I couldn't give you the verified role \
             ({reason}). Please ping a moderator."
        ),
        VerifyOutcome::Unavailable { reason } => {
            format!("{NOTICE_PREFIX} {reason} Please try again later.")
        }
        VerifyOutcome::MissingIdentity => format!(
            "{FAILURE_PREFIX} Tell me which Reddit account to check: `{prefix}verify <reddit username>`."
        ),
    }
}

pub fn render_lookup(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Linked {
            external_identity,
            profile_url,
        } => format!("{LOOKUP_PREFIX} u/{external_identity}: <{profile_url}>"),
        LookupOutcome::NotLinked { display_name } => {
            format!("{NOTICE_PREFIX} {display_name} has not linked a Reddit account.")
        }
    }
}

pub fn render_help(prefix: &str) -> String {
    format!(
        "{INFO_PREFIX} **Reddit verification**\n\
         1. Send a modmail to the subreddit from your Reddit account with the body `{}`.\n\
         2. Run `{prefix}verify <reddit username>` here.\n\
         Use `{prefix}reddit [@member]` to see whose Reddit profile an account is linked to.",
        expected_phrase("<your Discord username>")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::modmail::echo::ECHO_PREFIXES;

    #[test]
    fn no_match_explains_phrase_and_resend() {
        let outcome = VerifyOutcome::NoMatch {
            external_identity: "Hermit_Toad".into(),
            candidate_names: vec!["someoneElse".into()],
            lookback_cutoff: Utc.with_ymd_and_hms(2026, 10, 10, 0, 0, 0).unwrap(),
            max_scanned: 500,
        };
        let text = render_verify(&outcome, "!");
        assert!(text.starts_with(FAILURE_PREFIX));
        assert!(text.contains("since 2026-10-10"));
        assert!(text.contains("Register Discord with Discord ID: someoneElse"));
        assert!(text.contains("`!verify Hermit_Toad`"));
    }

    #[test]
    fn rename_failure_is_a_caveat() {
        let outcome = VerifyOutcome::Verified {
            external_identity: "Hermit_Toad".into(),
            local_name: "pika".into(),
            nickname: "Hermit_Toad | pika".into(),
            role_already_held: false,
            rename: RenameStatus::Failed("Missing Permissions".into()),
        };
        let text = render_verify(&outcome, "!");
        assert!(text.starts_with(VERIFIED_PREFIX));
        assert!(text.contains("Missing Permissions"));
    }

    #[test]
    fn banned_differs_from_no_match() {
        let text = render_verify(
            &VerifyOutcome::Banned {
                external_identity: "Hermit_Toad".into(),
                status: "Banned".into(),
            },
            "!",
        );
        assert!(text.contains("banned"));
    }

    #[test]
    fn every_reply_starts_with_an_echo_prefix() {
        let replies = [
            render_verify(&VerifyOutcome::MissingIdentity, "!"),
            render_verify(&VerifyOutcome::Unavailable { reason: "x".into() }, "!"),
            render_lookup(&LookupOutcome::NotLinked { display_name: "x".into() }),
            render_help("!"),
        ];
        for reply in replies {
            assert!(ECHO_PREFIXES.iter().any(|p| reply.starts_with(p)), "{reply}");
        }
    }
}
