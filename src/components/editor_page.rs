//! Editor Page Component
//!
//! Header with the save action, the group list, and background channel
//! name resolution.

use leptos::prelude::*;
use leptos::task::spawn_local;
use macro_core::{ChannelDirectory, EditorSession, Reconciler, SaveError};

use crate::components::GroupCard;
use crate::context::{use_editor_context, EditorContext};
use crate::store::{
    store_edit_tree, store_is_saving, store_push_toast, store_read_tree, use_editor_store, EditorStateStoreFields,
    EditorStore, ToastKind,
};

const SAVE_OK: &str = "데이터가 성공적으로 저장되었습니다";
const SAVE_FAILED: &str = "데이터 저장 중 오류가 발생했습니다";

#[component]
pub fn EditorPage(guild_id: String) -> impl IntoView {
    let store = use_editor_store();
    let ctx = use_editor_context();

    resolve_channel_names(store, ctx, guild_id);

    let loaded = move || store.session().read().is_some();
    let saving = move || store_is_saving(&store);
    // (id, position) so a moved group re-renders with its new position
    let group_rows = move || {
        store_read_tree(&store, |tree| {
            tree.groups()
                .iter()
                .enumerate()
                .map(|(i, g)| (g.id, i))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
    };

    let on_add_group = move |_| {
        if store_edit_tree(&store, |tree| tree.add_group()).is_some() {
            store_push_toast(&store, ToastKind::Success, "새 그룹추가");
        }
    };

    view! {
        <div class="editor-page">
            <header class="editor-header">
                <h1>"메시지 매크로 에디터"</h1>
                <p class="editor-subtitle">
                    "메시지를 버튼하나로 쉽게 보낼수 있도록 해당 버튼과 보낼 내용을 이곳에서 편집하세요."
                </p>
                <p class="editor-subtitle">"그룹의 이름은 공백이나 특수문자없이 입력하세요."</p>
                <Show when=move || ctx.can_edit.get()>
                    <div class="editor-actions">
                        <button
                            class="save-btn"
                            disabled=move || saving() || !loaded()
                            on:click=move |_| save(store, ctx)
                        >
                            {move || if saving() { "저장 중..." } else { "저장하기" }}
                        </button>
                    </div>
                </Show>
            </header>

            <Show
                when=loaded
                fallback=|| view! { <p class="editor-message">"불러오는 중..."</p> }
            >
                <div class="group-list">
                    <For
                        each=group_rows
                        key=|row| *row
                        children=move |(group_id, index)| view! { <GroupCard group_id=group_id index=index /> }
                    />
                </div>
                <Show when=move || ctx.can_edit.get()>
                    <div class="add-group-row">
                        <button class="add-group-btn" on:click=on_add_group>"+ 그룹추가"</button>
                    </div>
                </Show>
            </Show>
        </div>
    }
}

/// Snapshot the tree, write it out in the background, then fold the
/// outcome back in
fn save(store: EditorStore, ctx: EditorContext) {
    let begun = store.session().write().as_mut().map(EditorSession::begin_save);
    let plan = match begun {
        Some(Ok(plan)) => plan,
        Some(Err(SaveError::AlreadySaving)) | None => return,
        Some(Err(e)) => {
            tracing::error!(error = %e, "save not started");
            store_push_toast(&store, ToastKind::Error, SAVE_FAILED);
            return;
        }
    };

    spawn_local(async move {
        let api = ctx.api();
        let result = Reconciler::new(api.as_ref()).execute(&plan).await;
        if let Some(session) = store.session().write().as_mut() {
            session.finish_save(&result);
        }

        match result {
            Ok(_) => store_push_toast(&store, ToastKind::Success, SAVE_OK),
            Err(e) => {
                let cause = std::error::Error::source(&e).map(|c| c.to_string()).unwrap_or_default();
                tracing::error!(error = %e, cause = %cause, "save failed");
                store_push_toast(&store, ToastKind::Error, SAVE_FAILED);
            }
        }
    });
}

/// Look up names for channel ids that appear in the tree, once per id.
/// Re-runs only when the set of referenced ids changes.
fn resolve_channel_names(store: EditorStore, ctx: EditorContext, guild_id: String) {
    let channel_ids = Memo::new(move |_| {
        store_read_tree(&store, |tree| {
            let mut ids: Vec<String> = tree
                .contents()
                .map(|c| c.channel_id.clone())
                .filter(|id| !id.is_empty())
                .collect();
            ids.sort();
            ids.dedup();
            ids
        })
        .unwrap_or_default()
    });

    Effect::new(move |_| {
        channel_ids.track();

        let nothing_missing = store
            .session()
            .read_untracked()
            .as_ref()
            .map_or(true, |s| s.channels.missing_ids(s.tree.contents()).is_empty());
        if nothing_missing {
            return;
        }

        let claimed = store
            .session()
            .write()
            .as_mut()
            .map(|s| s.channels.claim_missing(s.tree.contents()))
            .unwrap_or_default();

        let api = ctx.api();
        let guild_id = guild_id.clone();
        spawn_local(async move {
            for channel_id in claimed {
                let outcome = api.channel_name(&guild_id, &channel_id).await;
                if let Some(session) = store.session().write().as_mut() {
                    session.channels.complete(&channel_id, outcome);
                }
            }
        });
    });
}
