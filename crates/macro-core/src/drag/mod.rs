//! Drag Session Tracker
//!
//! Records the item under drag and turns pointer hovers into a drop
//! proposal. Never touches the tree; [`DragSession::complete_drag`] hands the
//! final pair to the drop engine and clears itself unconditionally.

mod drop;

pub use drop::DropAction;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::tree::MacroTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Group,
    Button,
}

/// The item under drag, captured at drag start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggableItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Rendered position among siblings
    pub index: usize,
    /// Owning group, for buttons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl DraggableItem {
    pub fn group(id: Uuid, index: usize) -> Self {
        Self { id, kind: ItemKind::Group, index, parent_id: None }
    }

    pub fn button(id: Uuid, index: usize, group_id: Uuid) -> Self {
        Self { id, kind: ItemKind::Button, index, parent_id: Some(group_id) }
    }

    /// JSON carried by the platform drag event
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_payload(payload: &str) -> Option<Self> {
        serde_json::from_str(payload).ok()
    }
}

/// Where the dragged item would land if released now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPosition {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub new_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_parent_id: Option<Uuid>,
}

/// Pointer Y and the vertical extent of the hovered element, in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub y: f64,
    pub top: f64,
    pub height: f64,
}

impl PointerSample {
    pub fn new(y: f64, top: f64, height: f64) -> Self {
        Self { y, top, height }
    }

    /// Strictly above the vertical midpoint
    pub fn is_upper_half(&self) -> bool {
        self.y < self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    dragged: Option<DraggableItem>,
    indicator: Option<ItemPosition>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragged(&self) -> Option<&DraggableItem> {
        self.dragged.as_ref()
    }

    pub fn indicator(&self) -> Option<&ItemPosition> {
        self.indicator.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    /// Record the dragged item. Returns the JSON payload to attach to the
    /// platform drag event.
    pub fn begin_drag(&mut self, item: DraggableItem) -> String {
        debug!(id = %item.id, kind = ?item.kind, index = item.index, "Drag started");
        self.dragged = Some(item);
        self.indicator = None;
        item.to_payload()
    }

    /// Update the drop proposal for a hover over `candidate`.
    ///
    /// `pointer` is only consulted for button-over-button hovers. Returns
    /// whether the proposal changed.
    pub fn propose_drop(&mut self, candidate: &DraggableItem, pointer: Option<PointerSample>) -> bool {
        let Some(dragged) = self.dragged else {
            return false;
        };
        if dragged.id == candidate.id {
            return false;
        }

        let proposal = match (dragged.kind, candidate.kind) {
            (ItemKind::Group, ItemKind::Group) => ItemPosition {
                id: candidate.id,
                kind: ItemKind::Group,
                new_index: candidate.index,
                new_parent_id: None,
            },
            // Empty-area hover over a group container: front of that group
            (ItemKind::Button, ItemKind::Group) => ItemPosition {
                id: dragged.id,
                kind: ItemKind::Button,
                new_index: 0,
                new_parent_id: Some(candidate.id),
            },
            (ItemKind::Button, ItemKind::Button) => {
                let Some(pointer) = pointer else {
                    return false;
                };
                let new_index = if pointer.is_upper_half() {
                    candidate.index
                } else {
                    candidate.index + 1
                };
                ItemPosition {
                    id: dragged.id,
                    kind: ItemKind::Button,
                    new_index,
                    new_parent_id: candidate.parent_id,
                }
            }
            (ItemKind::Group, ItemKind::Button) => return false,
        };

        if self.indicator == Some(proposal) {
            return false;
        }
        self.indicator = Some(proposal);
        true
    }

    /// Clear the session, returning the dragged item and final proposal if both exist
    pub fn take(&mut self) -> Option<(DraggableItem, ItemPosition)> {
        let dragged = self.dragged.take();
        let indicator = self.indicator.take();
        dragged.zip(indicator)
    }

    /// Finish the drag: clear the session and apply the resolved drop to `tree`.
    /// Returns the applied drop, or `None` when there was no valid target.
    pub fn complete_drag(&mut self, tree: &mut MacroTree) -> Option<DropAction> {
        let (dragged, indicator) = self.take()?;
        let drop = DropAction::resolve(&dragged, &indicator, tree)?;
        drop.apply(tree);
        Some(drop)
    }

    pub fn cancel(&mut self) {
        self.dragged = None;
        self.indicator = None;
    }

    // ========================
    // Highlight queries
    // ========================

    pub fn is_dragging(&self, id: Uuid) -> bool {
        self.dragged.is_some_and(|d| d.id == id)
    }

    /// A dragged group would land at this group's slot
    pub fn is_group_drop_target(&self, group_id: Uuid, index: usize) -> bool {
        match (self.dragged, self.indicator) {
            (Some(d), Some(i)) => {
                d.kind == ItemKind::Group
                    && i.kind == ItemKind::Group
                    && d.id != group_id
                    && i.new_index == index
            }
            _ => false,
        }
    }

    /// A button from another group would land in this group
    pub fn highlights_group(&self, group_id: Uuid) -> bool {
        match (self.dragged, self.indicator) {
            (Some(d), Some(i)) => {
                d.kind == ItemKind::Button
                    && i.new_parent_id == Some(group_id)
                    && d.parent_id != Some(group_id)
            }
            _ => false,
        }
    }

    /// The drop gap is directly above or below this button
    pub fn is_button_drop_target(&self, button_id: Uuid, group_id: Uuid, index: usize) -> bool {
        match (self.dragged, self.indicator) {
            (Some(d), Some(i)) => {
                d.kind == ItemKind::Button
                    && d.id != button_id
                    && i.new_parent_id == Some(group_id)
                    && (i.new_index == index || i.new_index == index + 1)
            }
            _ => false,
        }
    }
}
