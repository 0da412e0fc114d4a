//! Channel Select Component
//!
//! Picks the channel a content is sent to.

use leptos::prelude::*;
use macro_core::Channel;
use uuid::Uuid;

use crate::store::{store_edit_tree, use_editor_store, EditorStateStoreFields};

#[component]
pub fn ChannelSelect(
    content_id: Uuid,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let store = use_editor_store();

    let selected = move || {
        store
            .session()
            .read()
            .as_ref()
            .and_then(|s| s.tree.find_content(content_id).map(|c| c.channel_id.clone()))
            .unwrap_or_default()
    };

    // Keep a stored channel selectable even when the listing lacks it
    let options = move || {
        let mut options = store.channel_options().get();
        let current = selected();
        if !current.is_empty() && !options.iter().any(|c| c.id == current) {
            let name = store
                .session()
                .read()
                .as_ref()
                .map(|s| s.channels.display_name(&current).to_string())
                .unwrap_or_default();
            options.push(Channel { id: current, name });
        }
        options
    };

    view! {
        <select
            class="channel-select"
            disabled=move || disabled.get()
            prop:value=selected
            on:change=move |ev| {
                let channel_id = event_target_value(&ev);
                store_edit_tree(&store, |tree| tree.set_content_channel(content_id, channel_id));
            }
        >
            {move || {
                let current = selected();
                options()
                    .into_iter()
                    .map(|channel| {
                        let is_selected = channel.id == current;
                        view! {
                            <option value=channel.id selected=is_selected>
                                {format!("# {}", channel.name)}
                            </option>
                        }
                    })
                    .collect_view()
            }}
        </select>
    }
}
