// File: modlink-common/src/models/mod.rs
pub mod discord;
pub mod verification;

pub use discord::{DiscordAccount, EmbedBlock, EmbedField, MessageAuthor, RawMessage};
pub use verification::{
    LookupOutcome, MatchResult, MatchSearch, ParsedRecord, RenameStatus, ScannedRecord,
    VerificationQuery, VerifyOutcome,
};
