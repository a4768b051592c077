// File: modlink-common/src/models/verification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::discord::RawMessage;

/// Fields pulled out of one forwarded modmail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub external_identity: String,
    pub local_identity_claim: String,
    pub status: String,
}

/// A parsed record together with the message it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedRecord {
    pub record: ParsedRecord,
    pub message: RawMessage,
}

/// One verification attempt's search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationQuery {
    pub external_identity_input: String,
    pub candidate_local_names: Vec<String>,
    pub lookback_cutoff: DateTime<Utc>,
    pub max_scanned: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub record: ParsedRecord,
    pub source_message: RawMessage,
    /// The candidate name that matched, in the account's own casing.
    pub matched_local_name: String,
}

/// What the matcher saw while walking the scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSearch {
    pub matched: Option<MatchResult>,
    /// Newest record whose identities matched but whose status is banned.
    pub banned: Option<ScannedRecord>,
    /// Parsed records examined before the search stopped.
    pub examined: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameStatus {
    Applied,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VerifyOutcome {
    Verified {
        external_identity: String,
        local_name: String,
        nickname: String,
        role_already_held: bool,
        rename: RenameStatus,
    },
    NoMatch {
        external_identity: String,
        candidate_names: Vec<String>,
        lookback_cutoff: DateTime<Utc>,
        max_scanned: usize,
    },
    Banned {
        external_identity: String,
        status: String,
    },
    RoleGrantFailed {
        external_identity: String,
        reason: String,
    },
    Unavailable {
        reason: String,
    },
    /// The command was issued without a usable external identity.
    MissingIdentity,
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyOutcome::Verified { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupOutcome {
    Linked {
        external_identity: String,
        profile_url: String,
    },
    NotLinked {
        display_name: String,
    },
}
