//! Editor State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use macro_core::drag::DropAction;
use macro_core::{Channel, DraggableItem, EditorSession, ItemPosition, MacroTree};
use reactive_stores::Store;

/// How long a toast stays on screen
const TOAST_MS: u32 = 3_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// Editor state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct EditorState {
    /// `None` until the initial load finishes
    pub session: Option<EditorSession>,
    /// Channel picker choices, "no channel" first
    pub channel_options: Vec<Channel>,
    pub toasts: Vec<Toast>,
    pub next_toast_id: u32,
}

/// Type alias for the store
pub type EditorStore = Store<EditorState>;

/// Get the editor store from context
pub fn use_editor_store() -> EditorStore {
    expect_context::<EditorStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Mutate the tree, if loaded
pub fn store_edit_tree<R>(store: &EditorStore, f: impl FnOnce(&mut MacroTree) -> R) -> Option<R> {
    store.session().write().as_mut().map(|session| f(&mut session.tree))
}

/// Read the tree (tracked), if loaded
pub fn store_read_tree<R>(store: &EditorStore, f: impl FnOnce(&MacroTree) -> R) -> Option<R> {
    store.session().read().as_ref().map(|session| f(&session.tree))
}

pub fn store_is_saving(store: &EditorStore) -> bool {
    store.session().read().as_ref().is_some_and(|s| s.is_saving())
}

/// Show a toast and schedule its removal
pub fn store_push_toast(store: &EditorStore, kind: ToastKind, message: impl Into<String>) {
    let id = {
        let next_field = store.next_toast_id();
        let mut next = next_field.write();
        *next += 1;
        *next
    };
    store.toasts().write().push(Toast { id, kind, message: message.into() });

    let store = *store;
    Timeout::new(TOAST_MS, move || store_dismiss_toast(&store, id)).forget();
}

pub fn store_dismiss_toast(store: &EditorStore, id: u32) {
    store.toasts().write().retain(|t| t.id != id);
}

/// Apply a finished drag to the tree and announce what happened
pub fn store_apply_drop(store: &EditorStore, dragged: DraggableItem, indicator: ItemPosition) {
    let applied = store_edit_tree(store, |tree| {
        let drop = DropAction::resolve(&dragged, &indicator, tree)?;
        drop.apply(tree).then_some(drop)
    })
    .flatten();

    let message = match applied {
        Some(DropAction::ReorderGroups { .. }) => "그룹 재정렬",
        Some(DropAction::ReorderButtons { .. }) => "버튼 재정렬",
        Some(DropAction::MoveButton { .. }) => "버튼 이동됨",
        None => return,
    };
    store_push_toast(store, ToastKind::Success, message);
}
