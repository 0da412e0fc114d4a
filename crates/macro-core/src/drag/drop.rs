//! Reorder/Move Engine
//!
//! A completed drag is resolved once into a [`DropAction`] and then applied with a
//! splice on the tree's arrays. `index` fields are not touched here; they are
//! rewritten by the next normalization pass.

use tracing::debug;
use uuid::Uuid;

use super::{DraggableItem, ItemKind, ItemPosition};
use crate::tree::MacroTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Move a group within the group list
    ReorderGroups { from: usize, to: usize },
    /// Move a button within its own group
    ReorderButtons { group_id: Uuid, from: usize, to: usize },
    /// Move a button into another group
    MoveButton {
        from_group: Uuid,
        to_group: Uuid,
        from: usize,
        to: usize,
    },
}

impl DropAction {
    /// Decide what a drag session means against the current tree.
    ///
    /// Source positions come from the tree, not from the index captured at
    /// drag start. Returns `None` for targets that no longer exist and for
    /// drops that would leave the tree unchanged.
    pub fn resolve(dragged: &DraggableItem, indicator: &ItemPosition, tree: &MacroTree) -> Option<Self> {
        if dragged.kind != indicator.kind {
            return None;
        }

        match dragged.kind {
            ItemKind::Group => {
                let from = tree.group_position(dragged.id)?;
                let last = tree.groups().len().saturating_sub(1);
                let to = indicator.new_index.min(last);
                (from != to).then_some(DropAction::ReorderGroups { from, to })
            }
            ItemKind::Button => {
                let (group_pos, from) = tree.button_location(dragged.id)?;
                let source = &tree.groups()[group_pos];
                let target_id = indicator.new_parent_id.unwrap_or(source.id);

                if target_id == source.id {
                    // The proposal counts the dragged button itself, so slots
                    // after it shift down by one once it is removed.
                    let to = if indicator.new_index > from {
                        indicator.new_index - 1
                    } else {
                        indicator.new_index
                    };
                    let to = to.min(source.buttons.len().saturating_sub(1));
                    (from != to).then_some(DropAction::ReorderButtons { group_id: source.id, from, to })
                } else {
                    let target = tree.find_group(target_id)?;
                    Some(DropAction::MoveButton {
                        from_group: source.id,
                        to_group: target_id,
                        from,
                        to: indicator.new_index.min(target.buttons.len()),
                    })
                }
            }
        }
    }

    /// Apply to the tree. Returns false if the referenced containers vanished.
    pub fn apply(&self, tree: &mut MacroTree) -> bool {
        debug!(drop = ?self, "Applying drop");
        match *self {
            DropAction::ReorderGroups { from, to } => {
                let groups = tree.groups_mut();
                if from >= groups.len() {
                    return false;
                }
                let group = groups.remove(from);
                let to = to.min(groups.len());
                groups.insert(to, group);
                true
            }
            DropAction::ReorderButtons { group_id, from, to } => {
                let Some(group) = tree.groups_mut().iter_mut().find(|g| g.id == group_id) else {
                    return false;
                };
                if from >= group.buttons.len() {
                    return false;
                }
                let button = group.buttons.remove(from);
                let to = to.min(group.buttons.len());
                group.buttons.insert(to, button);
                true
            }
            DropAction::MoveButton { from_group, to_group, from, to } => {
                let groups = tree.groups_mut();
                let Some(source) = groups.iter().position(|g| g.id == from_group) else {
                    return false;
                };
                let Some(target) = groups.iter().position(|g| g.id == to_group) else {
                    return false;
                };
                if from >= groups[source].buttons.len() {
                    return false;
                }
                let mut button = groups[source].buttons.remove(from);
                button.group_id = to_group;
                let buttons = &mut groups[target].buttons;
                let to = to.min(buttons.len());
                buttons.insert(to, button);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{DragSession, PointerSample};
    use crate::tree::tests::tree_with;
    use pretty_assertions::assert_eq;

    fn group_ids(tree: &MacroTree) -> Vec<Uuid> {
        tree.groups().iter().map(|g| g.id).collect()
    }

    fn button_ids(tree: &MacroTree, group: usize) -> Vec<Uuid> {
        tree.groups()[group].buttons.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_group_reorder_displaces_hovered() {
        let mut tree = tree_with(&[0, 0, 0]);
        let before = group_ids(&tree);

        let mut session = DragSession::new();
        session.begin_drag(DraggableItem::group(before[0], 0));
        session.propose_drop(&DraggableItem::group(before[2], 2), None);
        let drop = session.complete_drag(&mut tree);

        assert_eq!(drop, Some(DropAction::ReorderGroups { from: 0, to: 2 }));
        assert_eq!(group_ids(&tree), vec![before[1], before[2], before[0]]);
        assert!(!session.is_active());
    }

    #[test]
    fn test_button_reorder_inserts_after_hovered() {
        let mut tree = tree_with(&[3]);
        let gid = tree.groups()[0].id;
        let ids = button_ids(&tree, 0);

        let mut session = DragSession::new();
        session.begin_drag(DraggableItem::button(ids[0], 0, gid));
        // Lower half of the middle button: land between B and C
        session.propose_drop(
            &DraggableItem::button(ids[1], 1, gid),
            Some(PointerSample::new(35.0, 20.0, 20.0)),
        );
        session.complete_drag(&mut tree);

        assert_eq!(button_ids(&tree, 0), vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_button_reorder_upwards() {
        let mut tree = tree_with(&[3]);
        let gid = tree.groups()[0].id;
        let ids = button_ids(&tree, 0);

        let mut session = DragSession::new();
        session.begin_drag(DraggableItem::button(ids[2], 2, gid));
        session.propose_drop(
            &DraggableItem::button(ids[0], 0, gid),
            Some(PointerSample::new(1.0, 0.0, 20.0)),
        );
        session.complete_drag(&mut tree);

        assert_eq!(button_ids(&tree, 0), vec![ids[2], ids[0], ids[1]]);
    }

    #[test]
    fn test_move_preserves_button_contents() {
        let mut tree = tree_with(&[2, 1]);
        let (ga, gb) = (tree.groups()[0].id, tree.groups()[1].id);
        let moving = tree.groups()[0].buttons[1].clone();
        let cid = moving.contents[0].id;
        tree.set_content_text(cid, "hello");
        tree.set_content_channel(cid, "123");
        let moving = tree.find_button(moving.id).unwrap().clone();
        let untouched_a = tree.groups()[0].buttons[0].clone();
        let untouched_b = tree.groups()[1].buttons[0].clone();

        let mut session = DragSession::new();
        session.begin_drag(DraggableItem::button(moving.id, 1, ga));
        session.propose_drop(
            &DraggableItem::button(untouched_b.id, 0, gb),
            Some(PointerSample::new(100.0, 0.0, 10.0)),
        );
        let drop = session.complete_drag(&mut tree);
        assert_eq!(
            drop,
            Some(DropAction::MoveButton { from_group: ga, to_group: gb, from: 1, to: 1 })
        );

        assert_eq!(tree.groups()[0].buttons, vec![untouched_a]);
        assert_eq!(tree.groups()[1].buttons[0], untouched_b);
        let moved = &tree.groups()[1].buttons[1];
        assert_eq!(moved.group_id, gb);
        assert_eq!(moved.contents, moving.contents);
        assert_eq!(moved.name, moving.name);
        assert_eq!(moved.index, moving.index);
    }

    #[test]
    fn test_move_into_empty_group_via_container() {
        let mut tree = tree_with(&[1, 0]);
        let (ga, gb) = (tree.groups()[0].id, tree.groups()[1].id);
        let bid = tree.groups()[0].buttons[0].id;

        let mut session = DragSession::new();
        session.begin_drag(DraggableItem::button(bid, 0, ga));
        session.propose_drop(&DraggableItem::group(gb, 1), None);
        session.complete_drag(&mut tree);

        assert!(tree.groups()[0].buttons.is_empty());
        assert_eq!(button_ids(&tree, 1), vec![bid]);
    }

    #[test]
    fn test_drop_without_target_is_noop() {
        let mut tree = tree_with(&[2, 2]);
        let snapshot = tree.clone();

        let mut session = DragSession::new();
        session.begin_drag(DraggableItem::group(tree.groups()[0].id, 0));
        assert_eq!(session.complete_drag(&mut tree), None);
        assert_eq!(tree, snapshot);
        assert!(!session.is_active());
    }

    #[test]
    fn test_stale_drag_index_is_not_trusted() {
        let mut tree = tree_with(&[0, 0, 0]);
        let ids = group_ids(&tree);

        // Captured index claims position 2, but the group actually sits at 0
        let stale = DraggableItem::group(ids[0], 2);
        let indicator = ItemPosition { id: ids[1], kind: ItemKind::Group, new_index: 1, new_parent_id: None };
        let drop = DropAction::resolve(&stale, &indicator, &tree).unwrap();
        assert_eq!(drop, DropAction::ReorderGroups { from: 0, to: 1 });
        drop.apply(&mut tree);
        assert_eq!(group_ids(&tree), vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_vanished_target_group_is_noop() {
        let mut tree = tree_with(&[1]);
        let gid = tree.groups()[0].id;
        let bid = tree.groups()[0].buttons[0].id;
        let indicator = ItemPosition {
            id: bid,
            kind: ItemKind::Button,
            new_index: 0,
            new_parent_id: Some(Uuid::new_v4()),
        };
        assert_eq!(DropAction::resolve(&DraggableItem::button(bid, 0, gid), &indicator, &tree), None);
    }
}
