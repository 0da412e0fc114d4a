//! Group Card Component
//!
//! A draggable group holding an ordered list of buttons.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_dragend, make_on_dragover, make_on_dragstart, make_on_drop, use_drag_controller};
use macro_core::DraggableItem;
use uuid::Uuid;

use crate::components::{ButtonCard, DeleteConfirmButton, NameEditor};
use crate::context::use_editor_context;
use crate::store::{store_apply_drop, store_edit_tree, store_push_toast, store_read_tree, use_editor_store, ToastKind};

#[component]
pub fn GroupCard(group_id: Uuid, index: usize) -> impl IntoView {
    let store = use_editor_store();
    let ctx = use_editor_context();
    let drag = use_drag_controller();
    let (collapsed, set_collapsed) = signal(false);

    let name = Signal::derive(move || {
        store_read_tree(&store, |tree| tree.find_group(group_id).map(|g| g.name.clone()))
            .flatten()
            .unwrap_or_default()
    });
    // (id, position) so a moved button re-renders with its new position
    let button_rows = move || {
        store_read_tree(&store, |tree| {
            tree.find_group(group_id).map(|g| {
                g.buttons
                    .iter()
                    .enumerate()
                    .map(|(i, b)| (b.id, i))
                    .collect::<Vec<_>>()
            })
        })
        .flatten()
        .unwrap_or_default()
    };

    // DnD handlers
    let item = DraggableItem::group(group_id, index);
    let on_dragstart = make_on_dragstart(drag, item);
    let on_dragover = make_on_dragover(drag, item);
    let on_dragend = make_on_dragend(drag, move |dragged, indicator| store_apply_drop(&store, dragged, indicator));
    let on_drop = make_on_drop();

    let card_class = move || {
        let mut c = String::from("group-card");
        drag.with(|session| {
            if session.is_dragging(group_id) {
                c.push_str(" dragging");
            }
            if session.is_group_drop_target(group_id, index) {
                c.push_str(" group-drop-target");
            }
            if session.highlights_group(group_id) {
                c.push_str(" button-drop-target");
            }
        });
        c
    };

    let on_rename = Callback::new(move |new_name: String| {
        store_edit_tree(&store, |tree| tree.rename_group(group_id, new_name));
    });
    let on_remove = Callback::new(move |_: ()| {
        if store_edit_tree(&store, |tree| tree.remove_group(group_id)) == Some(true) {
            store_push_toast(&store, ToastKind::Success, "그룹 제거");
        }
    });
    let on_add_button = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        store_edit_tree(&store, |tree| tree.add_button(group_id));
    };

    view! {
        <div
            class=card_class
            draggable=move || if ctx.can_edit.get() { "true" } else { "false" }
            on:dragstart=on_dragstart
            on:dragover=on_dragover
            on:dragend=on_dragend
            on:drop=on_drop
        >
            <div
                class=move || if collapsed.get() { "group-header" } else { "group-header expanded" }
                on:click=move |_| set_collapsed.update(|v| *v = !*v)
            >
                <span class="grip" on:click=|ev| ev.stop_propagation()>"⠿"</span>
                <NameEditor
                    name=name
                    editable=ctx.can_edit
                    title_class="group-title"
                    on_commit=on_rename
                />
                <span class="badge">{move || format!("{} 개 버튼", button_rows().len())}</span>
                <Show when=move || ctx.can_edit.get()>
                    <DeleteConfirmButton button_class="delete-btn" target="그룹" on_confirm=on_remove />
                </Show>
                <span class="chevron">{move || if collapsed.get() { "▼" } else { "▲" }}</span>
            </div>

            <Show when=move || !collapsed.get()>
                <div class="group-body">
                    <Show
                        when=move || !button_rows().is_empty()
                        fallback=|| view! {
                            <p class="group-empty">"버튼이 없습니다. 버튼을 추가하거나 다른 그룹에서 끌어오세요."</p>
                        }
                    >
                        <For
                            each=button_rows
                            key=|row| *row
                            children=move |(button_id, index)| view! {
                                <ButtonCard group_id=group_id button_id=button_id index=index />
                            }
                        />
                    </Show>
                    <Show when=move || ctx.can_edit.get()>
                        <button class="add-button-btn" on:click=on_add_button>"+ 버튼추가"</button>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
