// File: modlink-core/src/services/discord/commands.rs

/// A prefixed message command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `verify <reddit name>`; the argument may be empty.
    Verify(String),
    /// `reddit [@member]`; `None` means the author.
    Lookup(Option<String>),
    Help,
}

/// Parses `text` as a command if it starts with `prefix`. Unknown command
/// names yield `None` so other bots sharing the prefix are left alone.
pub fn parse_command(prefix: &str, text: &str) -> Option<BotCommand> {
    let rest = text.trim().strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let name = parts.next()?.to_lowercase();
    let args: Vec<&str> = parts.collect();

    match name.as_str() {
        "verify" => Some(BotCommand::Verify(args.first().copied().unwrap_or("").to_string())),
        "reddit" | "whois" => Some(BotCommand::Lookup(args.first().and_then(|a| parse_mention(a)))),
        "help" => Some(BotCommand::Help),
        _ => None,
    }
}

/// User ID from `<@123>`, `<@!123>` or a bare snowflake.
pub fn parse_mention(token: &str) -> Option<String> {
    let inner = token
        .strip_prefix("<@")
        .and_then(|t| t.strip_suffix('>'))
        .map(|t| t.trim_start_matches('!'))
        .unwrap_or(token);
    if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
        Some(inner.to_string())
    } else {
        None
    }
}
