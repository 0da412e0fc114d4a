//! Toast notifications

use leptos::prelude::*;

use crate::store::{store_dismiss_toast, use_editor_store, EditorStateStoreFields, ToastKind};

#[component]
pub fn Toasts() -> impl IntoView {
    let store = use_editor_store();

    view! {
        <div class="toast-stack">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "toast success",
                        ToastKind::Error => "toast error",
                    };
                    view! {
                        <div class=class on:click=move |_| store_dismiss_toast(&store, id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
