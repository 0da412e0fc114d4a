//! Editor Context
//!
//! Shared handles provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;
use macro_core::{EditorConfig, RestStore};

/// Editor-wide handles provided via context
#[derive(Clone, Copy)]
pub struct EditorContext {
    /// Remote store client; not thread-safe in the browser, so stored locally
    api: StoredValue<Rc<RestStore>, LocalStorage>,
    config: StoredValue<EditorConfig>,
    /// Whether the current user may change anything - read
    pub can_edit: ReadSignal<bool>,
    /// Whether the current user may change anything - write
    set_can_edit: WriteSignal<bool>,
}

impl EditorContext {
    pub fn new(api: RestStore, config: EditorConfig) -> Self {
        let (can_edit, set_can_edit) = signal(false);
        Self {
            api: StoredValue::new_local(Rc::new(api)),
            config: StoredValue::new(config),
            can_edit,
            set_can_edit,
        }
    }

    pub fn api(&self) -> Rc<RestStore> {
        self.api.get_value()
    }

    pub fn config(&self) -> EditorConfig {
        self.config.get_value()
    }

    pub fn set_can_edit(&self, can_edit: bool) {
        self.set_can_edit.set(can_edit);
    }
}

/// Get the editor context
pub fn use_editor_context() -> EditorContext {
    expect_context::<EditorContext>()
}
