//! Message Macro Editor App
//!
//! Resolves the guild, wires the shared state and loads the editor.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::DragController;
use macro_core::{channel_options, EditorConfig, EditorSession, RestStore, SessionProvider};
use reactive_stores::Store;

use crate::bootstrap::guild_id_from_location;
use crate::components::{EditorPage, Toasts};
use crate::context::EditorContext;
use crate::store::{EditorState, EditorStateStoreFields};

#[component]
pub fn App(config: EditorConfig) -> impl IntoView {
    let Some(guild_id) = guild_id_from_location() else {
        tracing::warn!("no guild id in page url");
        return view! { <p class="editor-message">"서버를 선택한 뒤 다시 열어주세요."</p> }.into_any();
    };

    let api = match RestStore::new(&config) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "cannot create api client");
            return view! { <p class="editor-message">"에디터를 시작할 수 없습니다."</p> }.into_any();
        }
    };

    view! { <EditorRoot guild_id=guild_id api=api config=config /> }.into_any()
}

#[component]
fn EditorRoot(guild_id: String, api: RestStore, config: EditorConfig) -> impl IntoView {
    let store = Store::new(EditorState::default());
    let ctx = EditorContext::new(api, config);

    // Provide context to all children
    provide_context(store);
    provide_context(ctx);
    provide_context(DragController::new());

    // Load the tree, then the channel choices
    let load_guild = guild_id.clone();
    spawn_local(async move {
        let api = ctx.api();
        let config = ctx.config();
        let session = EditorSession::load(api.as_ref(), &load_guild, &config).await;
        *store.session().write() = Some(session);

        let options = channel_options(api.as_ref(), &load_guild, &config.no_channel_label).await;
        *store.channel_options().write() = options;
    });

    // Editing is only offered to admins
    spawn_local(async move {
        match ctx.api().current_user().await {
            Ok(Some(user)) => {
                tracing::info!(user = %user.id, role = ?user.role, "signed in");
                ctx.set_can_edit(user.role.can_edit());
            }
            Ok(None) => tracing::info!("not signed in, editor is read-only"),
            Err(e) => tracing::warn!(error = %e, "current user lookup failed, editor is read-only"),
        }
    });

    view! {
        <EditorPage guild_id=guild_id />
        <Toasts />
    }
}
