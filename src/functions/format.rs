use poise::serenity_prelude::utils::MessageBuilder;
use std::fmt::Display;

/// Builds a lightweight "emoji | message" string used across embeds/responses.
pub fn pretty_message(emoji: impl Display, message: impl Display) -> String {
    format!("{} | {}", emoji, message)
}

/// Renders a duration in whole seconds, or `--` when there is none yet.
pub fn format_seconds(seconds: Option<u64>) -> String {
    match seconds {
        Some(1) => "**1** segundo".to_string(),
        Some(value) => format!("**{value}** segundos"),
        None => "--".to_string(),
    }
}

/// Helpers to put user-provided text into Discord messages safely.
pub mod discord {
    use super::MessageBuilder;

    /// Returns the text with markdown and mentions neutralized.
    pub fn escape(text: impl AsRef<str>) -> String {
        let mut builder = MessageBuilder::new();
        builder.push_safe(text.as_ref());
        builder.build()
    }
}
