//! One-line preview of a button's contents for its collapsed header.

use crate::channels::ChannelNameResolver;
use crate::domain::Button;

const MAX_PREVIEWED: usize = 3;
const MAX_PREVIEW_CHARS: usize = 20;

pub const EMPTY_BUTTON_SUMMARY: &str = "(no contents)";
pub const EMPTY_TEXT_SUMMARY: &str = "(empty)";

pub fn summary(button: &Button, channels: &ChannelNameResolver) -> String {
    if button.contents.is_empty() {
        return EMPTY_BUTTON_SUMMARY.to_string();
    }

    button
        .contents
        .iter()
        .take(MAX_PREVIEWED)
        .map(|content| {
            let channel = channels.display_name(&content.channel_id);
            let text = content.text.trim();
            let text = if text.is_empty() {
                EMPTY_TEXT_SUMMARY.to_string()
            } else if text.chars().count() > MAX_PREVIEW_CHARS {
                let head: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
                format!("{head}...")
            } else {
                text.to_string()
            };
            format!("{channel} : {text}")
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_summary_formats_and_truncates() {
        let mut button = Button::new("b", 0, Uuid::new_v4(), "g");
        button.contents[0].channel_id = "c1".into();
        button.contents[0].text = "  this message is definitely longer than twenty  ".into();
        let mut second = button.contents[0].clone();
        second.id = Uuid::new_v4();
        second.channel_id = "c2".into();
        second.text = "   ".into();
        button.contents.push(second);

        let mut channels = ChannelNameResolver::new("unknown");
        channels.insert("c1", "general");

        assert_eq!(
            summary(&button, &channels),
            "general : this message is defi... | unknown : (empty)"
        );
    }

    #[test]
    fn test_summary_limits_to_three_and_handles_empty() {
        let mut button = Button::new("b", 0, Uuid::new_v4(), "g");
        let channels = ChannelNameResolver::new("?");
        for i in 0..4 {
            let mut c = button.contents[0].clone();
            c.text = format!("m{i}");
            button.contents.push(c);
        }
        assert_eq!(summary(&button, &channels).matches(" | ").count(), 2);

        button.contents.clear();
        assert_eq!(summary(&button, &channels), EMPTY_BUTTON_SUMMARY);
    }
}
