//! Ordered Tree Model
//!
//! Canonical Group → Button → Content structure held by one editor session.
//! Array position is the working order; `index` fields are rewritten by
//! [`MacroTree::normalize`] before anything is persisted.

mod assemble;
mod seed;
mod summary;

pub use assemble::assemble;
pub use seed::{seed_groups, SEED_BUTTON_NAME, SEED_GROUP_NAME, SEED_TEXT};
pub use summary::{summary, EMPTY_BUTTON_SUMMARY, EMPTY_TEXT_SUMMARY};

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::{cap_text, Button, Content, EntityKind, Group};

/// A removed entity that still exists in the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tombstone {
    pub kind: EntityKind,
    pub id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacroTree {
    guild_id: String,
    groups: Vec<Group>,
    /// Ids known to exist remotely (loaded, or written by a save)
    persisted: HashSet<Uuid>,
    tombstones: Vec<Tombstone>,
}

impl MacroTree {
    /// Fresh, unsaved tree
    pub fn new(guild_id: impl Into<String>, groups: Vec<Group>) -> Self {
        let mut tree = Self {
            guild_id: guild_id.into(),
            groups,
            persisted: HashSet::new(),
            tombstones: Vec::new(),
        };
        tree.normalize();
        tree
    }

    /// Tree loaded from the remote store; every id is known to exist there
    pub fn from_loaded(guild_id: impl Into<String>, groups: Vec<Group>) -> Self {
        let mut tree = Self::new(guild_id, groups);
        let ids: Vec<Uuid> = tree.all_ids().collect();
        tree.persisted.extend(ids);
        tree
    }

    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn tombstones(&self) -> &[Tombstone] {
        &self.tombstones
    }

    pub fn is_persisted(&self, id: Uuid) -> bool {
        self.persisted.contains(&id)
    }

    fn all_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.groups.iter().flat_map(|g| {
            std::iter::once(g.id).chain(
                g.buttons
                    .iter()
                    .flat_map(|b| std::iter::once(b.id).chain(b.contents.iter().map(|c| c.id))),
            )
        })
    }

    // ========================
    // Lookups
    // ========================

    pub fn group_position(&self, group_id: Uuid) -> Option<usize> {
        self.groups.iter().position(|g| g.id == group_id)
    }

    pub fn find_group(&self, group_id: Uuid) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// (group position, button position) of a button
    pub fn button_location(&self, button_id: Uuid) -> Option<(usize, usize)> {
        self.groups.iter().enumerate().find_map(|(gi, g)| {
            g.buttons
                .iter()
                .position(|b| b.id == button_id)
                .map(|bi| (gi, bi))
        })
    }

    pub fn find_button(&self, button_id: Uuid) -> Option<&Button> {
        self.groups
            .iter()
            .flat_map(|g| g.buttons.iter())
            .find(|b| b.id == button_id)
    }

    pub fn find_content(&self, content_id: Uuid) -> Option<&Content> {
        self.contents().find(|c| c.id == content_id)
    }

    /// Every content, in tree order
    pub fn contents(&self) -> impl Iterator<Item = &Content> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.buttons.iter())
            .flat_map(|b| b.contents.iter())
    }

    fn group_mut(&mut self, group_id: Uuid) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    fn button_mut(&mut self, button_id: Uuid) -> Option<&mut Button> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.buttons.iter_mut())
            .find(|b| b.id == button_id)
    }

    fn content_mut(&mut self, content_id: Uuid) -> Option<&mut Content> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.buttons.iter_mut())
            .flat_map(|b| b.contents.iter_mut())
            .find(|c| c.id == content_id)
    }

    pub(crate) fn groups_mut(&mut self) -> &mut Vec<Group> {
        &mut self.groups
    }

    // ========================
    // Mutations
    // ========================

    /// Append an empty group, returning its id
    pub fn add_group(&mut self) -> Uuid {
        let index = self.groups.len();
        let group = Group::new(format!("그룹{}", index + 1), index);
        let id = group.id;
        self.groups.push(group);
        id
    }

    pub fn rename_group(&mut self, group_id: Uuid, name: impl Into<String>) -> bool {
        match self.group_mut(group_id) {
            Some(group) => {
                group.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove a group and everything under it. Sibling indices are left as-is.
    pub fn remove_group(&mut self, group_id: Uuid) -> bool {
        let Some(pos) = self.group_position(group_id) else {
            return false;
        };
        let group = self.groups.remove(pos);
        self.bury(EntityKind::Group, group.id);
        for button in &group.buttons {
            self.bury_button(button);
        }
        true
    }

    /// Append a new button with one empty content to a group
    pub fn add_button(&mut self, group_id: Uuid) -> Option<Uuid> {
        let guild_id = self.guild_id.clone();
        let group = self.group_mut(group_id)?;
        let index = group.buttons.len();
        let button = Button::new(format!("버튼{}", index + 1), index, group_id, &guild_id);
        let id = button.id;
        group.buttons.push(button);
        Some(id)
    }

    pub fn rename_button(&mut self, button_id: Uuid, name: impl Into<String>) -> bool {
        match self.button_mut(button_id) {
            Some(button) => {
                button.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_button(&mut self, button_id: Uuid) -> bool {
        let Some((gi, bi)) = self.button_location(button_id) else {
            return false;
        };
        let button = self.groups[gi].buttons.remove(bi);
        self.bury_button(&button);
        true
    }

    /// Append an empty content to a button
    pub fn add_content(&mut self, button_id: Uuid) -> Option<Uuid> {
        let button = self.button_mut(button_id)?;
        let content = Content::new(button.contents.len(), button_id);
        let id = content.id;
        button.contents.push(content);
        Some(id)
    }

    /// Replace a content's text, capped at the message limit
    pub fn set_content_text(&mut self, content_id: Uuid, text: &str) -> bool {
        match self.content_mut(content_id) {
            Some(content) => {
                content.text = cap_text(text).to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_content_channel(&mut self, content_id: Uuid, channel_id: impl Into<String>) -> bool {
        match self.content_mut(content_id) {
            Some(content) => {
                content.channel_id = channel_id.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_content(&mut self, content_id: Uuid) -> bool {
        let removed = self
            .groups
            .iter_mut()
            .flat_map(|g| g.buttons.iter_mut())
            .find_map(|button| {
                let pos = button.contents.iter().position(|c| c.id == content_id)?;
                Some(button.contents.remove(pos))
            });
        match removed {
            Some(content) => {
                self.bury(EntityKind::Content, content.id);
                true
            }
            None => false,
        }
    }

    fn bury_button(&mut self, button: &Button) {
        self.bury(EntityKind::Button, button.id);
        for content in &button.contents {
            self.bury(EntityKind::Content, content.id);
        }
    }

    fn bury(&mut self, kind: EntityKind, id: Uuid) {
        if self.persisted.contains(&id) {
            self.tombstones.push(Tombstone { kind, id });
        }
    }

    // ========================
    // Persistence bookkeeping
    // ========================

    /// Rewrite every `index` from array position and every parent
    /// back-reference from the actual parent.
    pub fn normalize(&mut self) {
        for (gi, group) in self.groups.iter_mut().enumerate() {
            group.index = gi;
            for (bi, button) in group.buttons.iter_mut().enumerate() {
                button.index = bi;
                button.group_id = group.id;
                for (ci, content) in button.contents.iter_mut().enumerate() {
                    content.index = ci;
                    content.button_id = button.id;
                }
            }
        }
    }

    /// Record ids that now exist remotely
    pub fn mark_persisted(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.persisted.extend(ids);
    }

    /// Record writes committed by a save. Anything removed from the tree
    /// while that save was in flight is tombstoned instead.
    pub fn absorb_writes(&mut self, written: &[(EntityKind, Uuid)]) {
        for &(kind, id) in written {
            self.persisted.insert(id);
            let still_present = self.all_ids().any(|present| present == id);
            if !still_present && !self.tombstones.iter().any(|t| t.id == id) {
                self.tombstones.push(Tombstone { kind, id });
            }
        }
    }

    /// Forget tombstones whose remote delete succeeded
    pub fn clear_tombstones(&mut self, deleted: &[Uuid]) {
        self.tombstones.retain(|t| !deleted.contains(&t.id));
        for id in deleted {
            self.persisted.remove(id);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Build a tree of `shape.len()` groups, group `i` holding `shape[i]`
    /// buttons with one content each.
    pub(crate) fn tree_with(shape: &[usize]) -> MacroTree {
        let mut tree = MacroTree::new("guild-1", Vec::new());
        for &buttons in shape {
            let gid = tree.add_group();
            for _ in 0..buttons {
                tree.add_button(gid).unwrap();
            }
        }
        tree
    }

    pub(crate) fn indices_contiguous(tree: &MacroTree) -> bool {
        tree.groups().iter().enumerate().all(|(gi, g)| {
            g.index == gi
                && g.buttons.iter().enumerate().all(|(bi, b)| {
                    b.index == bi
                        && b.group_id == g.id
                        && b.contents
                            .iter()
                            .enumerate()
                            .all(|(ci, c)| c.index == ci && c.button_id == b.id)
                })
        })
    }

    #[test]
    fn test_add_button_appends_with_default_content() {
        let mut tree = tree_with(&[2]);
        let gid = tree.groups()[0].id;
        let bid = tree.add_button(gid).unwrap();

        let button = tree.find_button(bid).unwrap();
        assert_eq!(button.index, 2);
        assert_eq!(button.group_id, gid);
        assert_eq!(button.guild_id, "guild-1");
        assert_eq!(button.contents.len(), 1);
    }

    #[test]
    fn test_add_content_uses_count_as_index() {
        let mut tree = tree_with(&[1]);
        let bid = tree.groups()[0].buttons[0].id;
        let cid = tree.add_content(bid).unwrap();
        assert_eq!(tree.find_content(cid).unwrap().index, 1);
    }

    #[test]
    fn test_remove_does_not_renumber() {
        let mut tree = tree_with(&[3]);
        let middle = tree.groups()[0].buttons[1].id;
        assert!(tree.remove_button(middle));

        let indices: Vec<usize> = tree.groups()[0].buttons.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 2]);

        tree.normalize();
        let indices: Vec<usize> = tree.groups()[0].buttons.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_ids_unique_across_levels() {
        let tree = tree_with(&[2, 3]);
        let ids: Vec<Uuid> = tree.all_ids().collect();
        let unique: HashSet<Uuid> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut tree = tree_with(&[1]);
        let ghost = Uuid::new_v4();
        assert!(!tree.rename_group(ghost, "x"));
        assert!(tree.add_button(ghost).is_none());
        assert!(!tree.remove_content(ghost));
        assert!(!tree.set_content_text(ghost, "x"));
    }

    #[test]
    fn test_content_text_is_capped() {
        let mut tree = tree_with(&[1]);
        let cid = tree.groups()[0].buttons[0].contents[0].id;
        let long = "x".repeat(2500);
        assert!(tree.set_content_text(cid, &long));
        assert_eq!(tree.find_content(cid).unwrap().text.len(), 2000);
    }

    #[test]
    fn test_tombstones_only_for_persisted() {
        let mut tree = MacroTree::from_loaded("guild-1", seed_groups("guild-1"));
        let fresh_group = tree.add_group();
        tree.remove_group(fresh_group);
        assert!(tree.tombstones().is_empty());

        let seeded = tree.groups()[0].id;
        tree.remove_group(seeded);
        let kinds: Vec<EntityKind> = tree.tombstones().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Group, EntityKind::Button, EntityKind::Content]);
    }

    #[test]
    fn test_normalize_repairs_back_references() {
        let mut tree = tree_with(&[1, 1]);
        let (first, second) = (tree.groups()[0].id, tree.groups()[1].id);
        let moved = tree.groups_mut()[0].buttons.remove(0);
        tree.groups_mut()[1].buttons.insert(0, moved);
        assert_eq!(tree.groups()[1].buttons[0].group_id, first);

        tree.normalize();
        assert_eq!(tree.groups()[1].buttons[0].group_id, second);
        assert!(indices_contiguous(&tree));
    }
}
