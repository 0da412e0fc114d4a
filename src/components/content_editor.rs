//! Content Editor Component
//!
//! One (channel, message) pair of a button.

use leptos::prelude::*;
use macro_core::MAX_TEXT_CHARS;
use uuid::Uuid;

use crate::components::ChannelSelect;
use crate::context::use_editor_context;
use crate::store::{store_edit_tree, use_editor_store, EditorStateStoreFields};

#[component]
pub fn ContentEditor(
    content_id: Uuid,
    /// The last content of a button stays
    #[prop(into)]
    can_remove: Signal<bool>,
) -> impl IntoView {
    let store = use_editor_store();
    let ctx = use_editor_context();
    let read_only = Signal::derive(move || !ctx.can_edit.get());

    let text = move || {
        store
            .session()
            .read()
            .as_ref()
            .and_then(|s| s.tree.find_content(content_id).map(|c| c.text.clone()))
            .unwrap_or_default()
    };
    let char_count = move || text().chars().count();

    view! {
        <div class="content-editor">
            <div class="content-editor-row">
                <ChannelSelect content_id=content_id disabled=read_only />
                <Show when=move || can_remove.get() && ctx.can_edit.get()>
                    <button
                        class="icon-btn remove-content-btn"
                        title="내용 삭제"
                        on:click=move |_| {
                            store_edit_tree(&store, |tree| tree.remove_content(content_id));
                        }
                    >
                        "×"
                    </button>
                </Show>
            </div>
            <textarea
                class="content-text"
                placeholder="채널에 보낼 메시지를 입력하세요"
                maxlength=MAX_TEXT_CHARS.to_string()
                readonly=move || read_only.get()
                prop:value=text
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    store_edit_tree(&store, |tree| tree.set_content_text(content_id, &value));
                }
            />
            <span class="char-count">{move || format!("{}/{}", char_count(), MAX_TEXT_CHARS)}</span>
        </div>
    }
}
