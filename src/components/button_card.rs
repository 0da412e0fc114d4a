//! Button Card Component
//!
//! A draggable button inside a group: name, contents preview when
//! collapsed, and the content editors when expanded.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_dragend, make_on_dragover, make_on_dragstart, make_on_drop, use_drag_controller};
use macro_core::{summary, DraggableItem};
use uuid::Uuid;

use crate::components::{ContentEditor, DeleteConfirmButton, NameEditor};
use crate::context::use_editor_context;
use crate::store::{store_apply_drop, store_edit_tree, store_push_toast, use_editor_store, EditorStateStoreFields, ToastKind};

#[component]
pub fn ButtonCard(group_id: Uuid, button_id: Uuid, index: usize) -> impl IntoView {
    let store = use_editor_store();
    let ctx = use_editor_context();
    let drag = use_drag_controller();
    let (expanded, set_expanded) = signal(false);

    let name = Signal::derive(move || {
        store
            .session()
            .read()
            .as_ref()
            .and_then(|s| s.tree.find_button(button_id).map(|b| b.name.clone()))
            .unwrap_or_default()
    });
    let preview = move || {
        store
            .session()
            .read()
            .as_ref()
            .and_then(|s| s.tree.find_button(button_id).map(|b| summary(b, &s.channels)))
            .unwrap_or_default()
    };
    let content_ids = move || {
        store
            .session()
            .read()
            .as_ref()
            .and_then(|s| {
                s.tree
                    .find_button(button_id)
                    .map(|b| b.contents.iter().map(|c| c.id).collect::<Vec<_>>())
            })
            .unwrap_or_default()
    };
    let can_remove = Signal::derive(move || content_ids().len() > 1);

    // DnD handlers
    let item = DraggableItem::button(button_id, index, group_id);
    let on_dragstart = make_on_dragstart(drag, item);
    let on_dragover = make_on_dragover(drag, item);
    let on_dragend = make_on_dragend(drag, move |dragged, indicator| store_apply_drop(&store, dragged, indicator));
    let on_drop = make_on_drop();

    let card_class = move || {
        let mut c = String::from("button-card");
        drag.with(|session| {
            if session.is_dragging(button_id) {
                c.push_str(" dragging");
            }
            if session.is_button_drop_target(button_id, group_id, index) {
                let before = session.indicator().is_some_and(|i| i.new_index == index);
                c.push_str(if before { " drop-before" } else { " drop-after" });
            }
        });
        c
    };

    let on_rename = Callback::new(move |new_name: String| {
        store_edit_tree(&store, |tree| tree.rename_button(button_id, new_name));
    });
    let on_remove = Callback::new(move |_: ()| {
        if store_edit_tree(&store, |tree| tree.remove_button(button_id)) == Some(true) {
            store_push_toast(&store, ToastKind::Success, "버튼 제거");
        }
    });

    view! {
        <div
            class=card_class
            draggable=move || if ctx.can_edit.get() { "true" } else { "false" }
            on:dragstart=on_dragstart
            on:dragover=on_dragover
            on:dragend=on_dragend
            on:drop=on_drop
        >
            <div class="button-header" on:click=move |_| set_expanded.update(|v| *v = !*v)>
                <span class="grip" on:click=|ev| ev.stop_propagation()>"⠿"</span>
                <NameEditor
                    name=name
                    editable=ctx.can_edit
                    title_class="button-title"
                    on_commit=on_rename
                />
                <Show when=move || ctx.can_edit.get()>
                    <DeleteConfirmButton button_class="delete-btn" target="버튼" on_confirm=on_remove />
                </Show>
                <span class="chevron">{move || if expanded.get() { "▲" } else { "▼" }}</span>
            </div>

            <Show
                when=move || expanded.get()
                fallback=move || view! { <p class="button-summary">{preview}</p> }
            >
                <div class="button-body">
                    <For
                        each=content_ids
                        key=|id| *id
                        children=move |content_id| view! { <ContentEditor content_id=content_id can_remove=can_remove /> }
                    />
                    <Show when=move || ctx.can_edit.get()>
                        <button
                            class="add-content-btn"
                            on:click=move |_| {
                                store_edit_tree(&store, |tree| tree.add_content(button_id));
                            }
                        >
                            "+ 내용추가"
                        </button>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
