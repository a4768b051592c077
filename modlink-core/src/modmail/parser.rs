// File: modlink-core/src/modmail/parser.rs

use tracing::trace;

use modlink_common::models::discord::RawMessage;
use modlink_common::models::verification::ParsedRecord;

use crate::modmail::extract::extract;
use crate::modmail::normalize::normalize;
use crate::modmail::rules::{clean_identity, ParserRules};

/// Status used when a record carries no status line.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Turns forwarded modmail text into a [`ParsedRecord`]. Incomplete text
/// yields `None`.
#[derive(Debug, Clone, Default)]
pub struct FieldParser {
    rules: ParserRules,
}

impl FieldParser {
    pub fn new(rules: ParserRules) -> Self {
        Self { rules }
    }

    /// Extracts, normalizes and parses one history message.
    pub fn parse_message(&self, message: &RawMessage) -> Option<ParsedRecord> {
        self.parse(&normalize(&extract(message)))
    }

    /// Parses already-normalized text.
    pub fn parse(&self, text: &str) -> Option<ParsedRecord> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let first = *lines.first()?;

        if self.rules.is_echo(first) {
            trace!("Skipping bot echo: {first}");
            return None;
        }

        let external_identity = self
            .rules
            .labeled_identity(&lines)
            .or_else(|| self.positional_identity(first))?;
        let local_identity_claim = self.rules.local_claim(&lines)?;
        let status = self
            .rules
            .status(&lines)
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string());

        Some(ParsedRecord {
            external_identity,
            local_identity_claim,
            status,
        })
    }

    // Single-line submissions carry the identity as the whole first line.
    fn positional_identity(&self, first: &str) -> Option<String> {
        if self.rules.is_labeled(first) {
            return None;
        }
        clean_identity(first)
    }
}
