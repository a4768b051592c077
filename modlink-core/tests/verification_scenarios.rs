// File: modlink-core/tests/verification_scenarios.rs

use std::sync::Arc;

use mockall::predicate::eq;

use modlink_common::models::verification::{LookupOutcome, ParsedRecord, RenameStatus, VerifyOutcome};
use modlink_core::modmail::FieldParser;
use modlink_core::services::discord::commands::BotCommand;
use modlink_core::modmail::echo::VERIFIED_PREFIX;
use modlink_core::services::discord::{CommandHandler, DiscordMessageEvent};
use modlink_core::services::verification_service::lookup;
use modlink_core::services::VerificationService;
use modlink_core::test_utils::helpers::{
    account, modmail_message, record_text, FakeHistory, MockMembers,
};
use modlink_core::BotConfig;

const SCENARIO_TEXT: &str =
    "Author: Hermit_Toad\nBody: Register Discord with Discord ID: pikachucatcher88\nStatus: Active";

fn service(history: FakeHistory, members: MockMembers) -> VerificationService {
    VerificationService::new(
        Arc::new(BotConfig::new("1", "100", "7")),
        Arc::new(history),
        Arc::new(members),
        FieldParser::default(),
    )
}

#[test]
fn scenario_record_parses() {
    let record = FieldParser::default().parse(SCENARIO_TEXT);
    assert_eq!(
        record,
        Some(ParsedRecord {
            external_identity: "Hermit_Toad".into(),
            local_identity_claim: "pikachucatcher88".into(),
            status: "Active".into(),
        })
    );
}

#[tokio::test]
async fn matching_account_is_verified_and_renamed() {
    let history = FakeHistory::new(vec![modmail_message(1, 5, SCENARIO_TEXT)]);
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

    let svc = service(history, members);
    let outcome = svc.verify("Hermit_Toad", &account("42", "pikachucatcher88")).await;
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
async fn other_account_gets_no_match() {
    let history = FakeHistory::new(vec![modmail_message(1, 5, SCENARIO_TEXT)]);
    let svc = service(history, MockMembers::new());
    let outcome = svc.verify("Hermit_Toad", &account("43", "someoneElse")).await;
    assert!(matches!(outcome, VerifyOutcome::NoMatch { .. }));
}

#[tokio::test]
async fn banned_record_is_reported_without_mutation() {
    let history = FakeHistory::new(vec![modmail_message(
        1,
        5,
        &record_text("Hermit_Toad", "pikachucatcher88", "Banned"),
    )]);
    let svc = service(history, MockMembers::new());
    let outcome = svc.verify("hermit_toad", &account("42", "pikachucatcher88")).await;
    assert_eq!(
        outcome,
        VerifyOutcome::Banned {
            external_identity: "Hermit_Toad".into(),
            status: "Banned".into(),
        }
    );
}

#[tokio::test]
async fn record_outside_lookback_is_ignored() {
    // 8 days old with a 7 day lookback.
    let history = FakeHistory::new(vec![modmail_message(1, 8 * 24 * 60, SCENARIO_TEXT)]);
    let svc = service(history, MockMembers::new());
    let outcome = svc.verify("Hermit_Toad", &account("42", "pikachucatcher88")).await;
    assert!(matches!(outcome, VerifyOutcome::NoMatch { .. }));
}

#[tokio::test]
async fn newest_record_wins() {
    let history = FakeHistory::new(vec![
        modmail_message(3, 1, &record_text("Hermit_Toad", "pikachucatcher88", "Active")),
        modmail_message(2, 2, "unrelated chatter"),
        modmail_message(1, 3, &record_text("Hermit_Toad", "pikachucatcher88", "Banned")),
    ]);
    let mut members = MockMembers::new();
    members.expect_grant_role().times(1).returning(|_, _, _| Ok(()));
    members.expect_set_nickname().times(1).returning(|_, _, _| Ok(()));

    let svc = service(history, members);
    let outcome = svc.verify("Hermit_Toad", &account("42", "pikachucatcher88")).await;
    assert!(outcome.is_verified());
}

#[test]
fn lookup_on_verified_nickname() {
    let mut acct = account("42", "pikachucatcher88");
    acct.nick = Some("Hermit_Toad | pikachucatcher88".into());
    assert_eq!(
        lookup(&acct),
        LookupOutcome::Linked {
            external_identity: "Hermit_Toad".into(),
            profile_url: "https://www.reddit.com/user/Hermit_Toad".into(),
        }
    );
}

fn command(content: &str) -> DiscordMessageEvent {
    DiscordMessageEvent {
        message_id: "555".into(),
        channel_id: "200".into(),
        guild_id: Some("1".into()),
        author_id: "42".into(),
        author_bot: false,
        content: content.into(),
    }
}

#[tokio::test]
async fn verify_command_replies_with_outcome() {
    let history = FakeHistory::new(vec![modmail_message(1, 5, SCENARIO_TEXT)]);
    let mut members = MockMembers::new();
    members
        .expect_member()
        .with(eq("1"), eq("42"))
        .times(1)
        .returning(|_, _| Ok(account("42", "pikachucatcher88")));
    members.expect_grant_role().times(1).returning(|_, _, _| Ok(()));
    members.expect_set_nickname().times(1).returning(|_, _, _| Ok(()));
    members
        .expect_send_reply()
        .withf(|channel, reply_to, text| {
            channel == "200" && reply_to == "555" && text.starts_with(VERIFIED_PREFIX)
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let handler = CommandHandler::new(Arc::new(service(history, members)));
    let ran = handler.handle_message(&command("!verify u/Hermit_Toad")).await;
    assert_eq!(ran, Some(BotCommand::Verify("u/Hermit_Toad".into())));
}

#[tokio::test]
async fn reply_failure_is_swallowed_and_command_is_cleaned_up() {
    let mut members = MockMembers::new();
    members
        .expect_member()
        .returning(|_, _| {
            let mut acct = account("42", "pikachucatcher88");
            acct.nick = Some("Hermit_Toad | pikachucatcher88".into());
            Ok(acct)
        });
    members
        .expect_send_reply()
        .times(1)
        .returning(|_, _, _| Err(modlink_common::Error::Platform("Missing Access".into())));
    members
        .expect_delete_message()
        .with(eq("200"), eq("555"))
        .times(1)
        .returning(|_, _| Ok(()));

    let mut config = BotConfig::new("1", "100", "7");
    config.delete_commands = true;
    let svc = VerificationService::new(
        Arc::new(config),
        Arc::new(FakeHistory::default()),
        Arc::new(members),
        FieldParser::default(),
    );
    let handler = CommandHandler::new(Arc::new(svc));
    let ran = handler.handle_message(&command("!reddit")).await;
    assert_eq!(ran, Some(BotCommand::Lookup(None)));
}

#[tokio::test]
async fn messages_outside_scope_are_ignored() {
    let mut config = BotConfig::new("1", "100", "7");
    config.verify_channel_id = Some("300".into());
    let svc = VerificationService::new(
        Arc::new(config),
        Arc::new(FakeHistory::default()),
        Arc::new(MockMembers::new()),
        FieldParser::default(),
    );
    let handler = CommandHandler::new(Arc::new(svc));

    // Wrong channel.
    assert_eq!(handler.handle_message(&command("!verify Hermit_Toad")).await, None);

    // Bot author.
    let mut from_bot = command("!help");
    from_bot.channel_id = "300".into();
    from_bot.author_bot = true;
    assert_eq!(handler.handle_message(&from_bot).await, None);

    // Other guild.
    let mut elsewhere = command("!help");
    elsewhere.channel_id = "300".into();
    elsewhere.guild_id = Some("2".into());
    assert_eq!(handler.handle_message(&elsewhere).await, None);

    // Not a command.
    let mut chatter = command("hello there");
    chatter.channel_id = "300".into();
    assert_eq!(handler.handle_message(&chatter).await, None);
}
