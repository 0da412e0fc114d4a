//! Rebuild the nested tree from the three flat record lists the remote store returns.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::domain::{Button, ButtonRecord, Content, ContentRecord, Group, GroupRecord};

/// Attach children by parent id and order each level by stored index.
/// Records whose parent is missing are dropped.
pub fn assemble(
    groups: Vec<GroupRecord>,
    buttons: Vec<ButtonRecord>,
    contents: Vec<ContentRecord>,
) -> Vec<Group> {
    let mut contents_by_button: HashMap<Uuid, Vec<Content>> = HashMap::new();
    for record in contents {
        contents_by_button
            .entry(record.button_id)
            .or_default()
            .push(Content::from_record(record));
    }

    let mut buttons_by_group: HashMap<Uuid, Vec<Button>> = HashMap::new();
    for record in buttons {
        let mut button = Button::from_record(record);
        let mut children = contents_by_button.remove(&button.id).unwrap_or_default();
        children.sort_by_key(|c| (c.index, c.id));
        button.contents = children;
        buttons_by_group.entry(button.group_id).or_default().push(button);
    }

    let mut result: Vec<Group> = groups
        .into_iter()
        .map(|record| {
            let mut group = Group::from_record(record);
            let mut children = buttons_by_group.remove(&group.id).unwrap_or_default();
            children.sort_by_key(|b| (b.index, b.id));
            group.buttons = children;
            group
        })
        .collect();
    result.sort_by_key(|g| (g.index, g.id));

    let orphan_buttons: usize = buttons_by_group.values().map(Vec::len).sum();
    let orphan_contents: usize = contents_by_button.values().map(Vec::len).sum();
    if orphan_buttons > 0 || orphan_contents > 0 {
        warn!(orphan_buttons, orphan_contents, "Dropping records whose parent is missing");
    }

    result
}
