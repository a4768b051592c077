// File: modlink-core/src/modmail/rules.rs

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use modlink_common::Error;
use crate::modmail::echo::ECHO_PREFIXES;

/// A named pattern whose first capture group is the extracted value.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub name: String,
    pub pattern: Regex,
}

impl ExtractionRule {
    /// Compiles `pattern` case-insensitively.
    pub fn new(name: &str, pattern: &str) -> Result<Self, Error> {
        let pattern = Regex::new(&format!("(?i){}", pattern))?;
        if pattern.captures_len() < 2 {
            return Err(Error::Config(format!(
                "Extraction rule '{name}' needs a capture group"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    pub fn capture<'t>(&self, haystack: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(haystack)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedPattern {
    name: String,
    pattern: String,
}

/// On-disk form of the rules. Missing lists keep their defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RulesConfig {
    #[serde(default)]
    identity_labels: Option<Vec<String>>,
    #[serde(default)]
    body_labels: Option<Vec<String>>,
    #[serde(default)]
    status_labels: Option<Vec<String>>,
    #[serde(default)]
    claim_patterns: Option<Vec<NamedPattern>>,
    #[serde(default)]
    echo_prefixes: Option<Vec<String>>,
}

/// Label prefixes and claim patterns the field parser applies, in priority order.
#[derive(Debug, Clone)]
pub struct ParserRules {
    pub identity_labels: Vec<String>,
    pub body_labels: Vec<String>,
    pub status_labels: Vec<String>,
    pub claim_rules: Vec<ExtractionRule>,
    pub echo_prefixes: Vec<String>,
}

const DEFAULT_CLAIM_PATTERNS: &[(&str, &str)] = &[
    ("discord_id", r"discord\s+id\s*[:\-=]?\s*@?(\S+)"),
    (
        "discord_username",
        r"discord\s+(?:user\s*name|name|handle|tag)\s*(?:is)?\s*[:\-=]?\s*@?(\S+)",
    ),
    ("my_discord_is", r"my\s+discord\s+(?:account\s+)?is\s*:?\s*@?(\S+)"),
    ("discord_colon", r"discord\s*:\s*@?(\S+)"),
    ("register_as", r"register\s+(?:discord\s+)?(?:as|for)\s+@?(\S+)"),
];

impl ParserRules {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        let rules = Self::from_json(&raw)?;
        info!(
            "Loaded parser rules from {} ({} claim patterns)",
            path.display(),
            rules.claim_rules.len()
        );
        Ok(rules)
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let cfg: RulesConfig = serde_json::from_str(raw)?;
        let mut rules = Self::default();

        if let Some(labels) = cfg.identity_labels {
            rules.identity_labels = non_empty("identity_labels", labels)?;
        }
        if let Some(labels) = cfg.body_labels {
            rules.body_labels = non_empty("body_labels", labels)?;
        }
        if let Some(labels) = cfg.status_labels {
            rules.status_labels = non_empty("status_labels", labels)?;
        }
        if let Some(patterns) = cfg.claim_patterns {
            if patterns.is_empty() {
                return Err(Error::Config("claim_patterns must not be empty".into()));
            }
            rules.claim_rules = patterns
                .iter()
                .map(|p| ExtractionRule::new(&p.name, &p.pattern))
                .collect::<Result<Vec<_>, _>>()?;
        }
        if let Some(prefixes) = cfg.echo_prefixes {
            rules.echo_prefixes = prefixes;
        }
        Ok(rules)
    }

    /// Whether `line` starts with one of the bot's own reply prefixes.
    pub fn is_echo(&self, line: &str) -> bool {
        self.echo_prefixes
            .iter()
            .any(|p| strip_prefix_ci(line, p).is_some())
    }

    /// Value of the first line carrying an identity label. Labels are tried in
    /// order, so an earlier label wins even if its line comes later.
    pub fn labeled_identity(&self, lines: &[&str]) -> Option<String> {
        for label in &self.identity_labels {
            for line in lines {
                if let Some(rest) = strip_prefix_ci(line, label) {
                    if let Some(identity) = clean_identity(rest) {
                        return Some(identity);
                    }
                }
            }
        }
        None
    }

    /// The claimed local identity from the first body line a claim rule matches.
    pub fn local_claim(&self, lines: &[&str]) -> Option<String> {
        let body = lines
            .iter()
            .find_map(|line| self.body_labels.iter().find_map(|l| strip_prefix_ci(line, l)))?;
        self.claim_rules
            .iter()
            .find_map(|rule| rule.capture(body))
            .and_then(clean_token)
    }

    pub fn status(&self, lines: &[&str]) -> Option<String> {
        let line = lines
            .iter()
            .find(|line| self.status_labels.iter().any(|l| strip_prefix_ci(line, l).is_some()))?;
        let (_, rest) = line.split_once(':')?;
        let rest = rest.trim();
        if rest.is_empty() { None } else { Some(rest.to_string()) }
    }

    /// Whether `line` starts with any field label this parser knows.
    pub fn is_labeled(&self, line: &str) -> bool {
        self.identity_labels
            .iter()
            .chain(&self.body_labels)
            .chain(&self.status_labels)
            .any(|l| strip_prefix_ci(line, l).is_some())
    }
}

impl Default for ParserRules {
    fn default() -> Self {
        let claim_rules = DEFAULT_CLAIM_PATTERNS
            .iter()
            .filter_map(|(name, pattern)| ExtractionRule::new(name, pattern).ok())
            .collect();
        Self {
            identity_labels: vec!["Participant:".into(), "Author:".into()],
            body_labels: vec!["Body:".into()],
            status_labels: vec!["Status:".into()],
            claim_rules,
            echo_prefixes: ECHO_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

fn non_empty(what: &str, labels: Vec<String>) -> Result<Vec<String>, Error> {
    let labels: Vec<String> = labels
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if labels.is_empty() {
        return Err(Error::Config(format!("{what} must not be empty")));
    }
    Ok(labels)
}

/// Case-insensitive `strip_prefix`, returning the remainder trimmed.
pub(crate) fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(line[prefix.len()..].trim())
    } else {
        None
    }
}

/// Removes markup residue and a Reddit `u/` or `/u/` prefix from an identity.
pub fn clean_identity(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c| c == '*' || c == '`').trim();
    let unprefixed = strip_prefix_ci(trimmed, "/u/")
        .or_else(|| strip_prefix_ci(trimmed, "u/"))
        .unwrap_or(trimmed);
    if unprefixed.is_empty() {
        None
    } else {
        Some(unprefixed.to_string())
    }
}

fn clean_token(raw: &str) -> Option<String> {
    let token = raw
        .trim_start_matches('@')
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | '!' | '?' | ')' | '"' | '\''));
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
