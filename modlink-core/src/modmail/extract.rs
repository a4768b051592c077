// File: modlink-core/src/modmail/extract.rs

use modlink_common::models::discord::RawMessage;

/// Flattens a message into newline-joined text: the plain body first, then for
/// each embed its description followed by `Name: Value` for every field.
pub fn extract(message: &RawMessage) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !message.content.trim().is_empty() {
        lines.push(message.content.clone());
    }

    for embed in &message.embeds {
        if let Some(desc) = embed.description.as_deref() {
            if !desc.trim().is_empty() {
                lines.push(desc.to_string());
            }
        }
        for field in &embed.fields {
            lines.push(format!("{}: {}", field.name, field.value));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use modlink_common::models::discord::{EmbedBlock, EmbedField, MessageAuthor};

    fn message(content: &str, embeds: Vec<EmbedBlock>) -> RawMessage {
        RawMessage {
            id: "1".into(),
            channel_id: "10".into(),
            author: MessageAuthor { id: "2".into(), name: "modmail".into(), bot: true },
            content: content.into(),
            embeds,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn body_then_embed_description_then_fields() {
        let embed = EmbedBlock {
            title: Some("New modmail".into()),
            description: Some("Forwarded from r/example".into()),
            fields: vec![
                EmbedField { name: "Author".into(), value: "Hermit_Toad".into() },
                EmbedField { name: "Status".into(), value: "Active".into() },
            ],
        };
        let text = extract(&message("hello", vec![embed]));
        assert_eq!(
            text,
            "hello\nForwarded from r/example\nAuthor: Hermit_Toad\nStatus: Active"
        );
    }

    #[test]
    fn empty_pieces_are_omitted() {
        let embed = EmbedBlock {
            title: None,
            description: None,
            fields: vec![EmbedField { name: "Body".into(), value: "hi".into() }],
        };
        assert_eq!(extract(&message("   ", vec![embed])), "Body: hi");
        assert_eq!(extract(&message("", vec![])), "");
    }

    #[test]
    fn embeds_keep_their_order() {
        let first = EmbedBlock { description: Some("one".into()), ..Default::default() };
        let second = EmbedBlock { description: Some("two".into()), ..Default::default() };
        assert_eq!(extract(&message("", vec![first, second])), "one\ntwo");
    }
}
