//! Input rules for names and message text.
//!
//! Invalid characters are stripped rather than rejected; the caller decides
//! whether to show a validation hint based on [`SanitizedName::changed`].

/// Maximum characters in a group or button name
pub const MAX_NAME_CHARS: usize = 10;

/// Maximum characters in a content message (Discord message limit)
pub const MAX_TEXT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedName {
    pub value: String,
    /// True when characters were stripped or the input was truncated
    pub changed: bool,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        // Hangul compatibility consonants ㄱ..ㅎ and vowels ㅏ..ㅣ
        || ('\u{3131}'..='\u{314E}').contains(&c)
        || ('\u{314F}'..='\u{3163}').contains(&c)
        // Precomposed syllables 가..힣
        || ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Strip disallowed characters and cap the name at [`MAX_NAME_CHARS`]
pub fn sanitize_name(input: &str) -> SanitizedName {
    let value: String = input
        .chars()
        .filter(|c| is_name_char(*c))
        .take(MAX_NAME_CHARS)
        .collect();
    let changed = value != input;
    SanitizedName { value, changed }
}

/// Cap message text at [`MAX_TEXT_CHARS`] characters
pub fn cap_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_mixed_input() {
        let result = sanitize_name("a b#c각");
        assert_eq!(result.value, "abc각");
        assert!(result.changed);
    }

    #[test]
    fn test_sanitize_keeps_valid_input() {
        let result = sanitize_name("버튼_1ㄱㅏ");
        assert_eq!(result.value, "버튼_1ㄱㅏ");
        assert!(!result.changed);
    }

    #[test]
    fn test_sanitize_caps_length() {
        let result = sanitize_name("가나다라마바사아자차카");
        assert_eq!(result.value.chars().count(), MAX_NAME_CHARS);
        assert_eq!(result.value, "가나다라마바사아자차");
        assert!(result.changed);
    }

    #[test]
    fn test_sanitize_rejects_other_scripts() {
        assert_eq!(sanitize_name("日本é-x").value, "x");
    }

    #[test]
    fn test_cap_text() {
        let long = "한".repeat(MAX_TEXT_CHARS + 5);
        let capped = cap_text(&long);
        assert_eq!(capped.chars().count(), MAX_TEXT_CHARS);
        assert_eq!(cap_text("short"), "short");
    }
}
