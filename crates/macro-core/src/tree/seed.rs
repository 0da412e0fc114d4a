//! Example tree shown when a guild has no saved macros yet.

use crate::domain::{Button, Content, Group};

pub const SEED_GROUP_NAME: &str = "예제그룹";
pub const SEED_BUTTON_NAME: &str = "버튼예시";
pub const SEED_TEXT: &str = "여기에 채널에 보낼 메시지를 입력하세요";

/// One group holding one button holding one content, all at index 0
pub fn seed_groups(guild_id: &str) -> Vec<Group> {
    let mut group = Group::new(SEED_GROUP_NAME, 0);
    let mut button = Button::new(SEED_BUTTON_NAME, 0, group.id, guild_id);
    button.contents = vec![Content {
        text: SEED_TEXT.to_string(),
        ..Content::new(0, button.id)
    }];
    group.buttons.push(button);
    vec![group]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shape() {
        let groups = seed_groups("g");
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.index, 0);
        assert_eq!(group.buttons.len(), 1);

        let button = &group.buttons[0];
        assert_eq!(button.index, 0);
        assert_eq!(button.group_id, group.id);
        assert_eq!(button.contents.len(), 1);

        let content = &button.contents[0];
        assert_eq!(content.index, 0);
        assert_eq!(content.button_id, button.id);
        assert_eq!(content.text, SEED_TEXT);
        assert!(content.channel_id.is_empty());
    }
}
