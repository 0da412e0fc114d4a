//! Name Editor Component
//!
//! Inline rename for groups and buttons with the name input rules applied
//! as the user types. Raw text passes through while an IME composition is
//! open and is sanitized when it ends.

use leptos::prelude::*;
use macro_core::{sanitize_name, MAX_NAME_CHARS};

#[component]
pub fn NameEditor(
    /// Current committed name
    #[prop(into)]
    name: Signal<String>,
    /// Whether the pencil button is offered
    #[prop(into)]
    editable: Signal<bool>,
    /// Class of the heading shown while not editing
    #[prop(into)]
    title_class: String,
    #[prop(into)] on_commit: Callback<String>,
) -> impl IntoView {
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(String::new());
    let (error, set_error) = signal(false);
    let (composing, set_composing) = signal(false);

    let apply_input = move |raw: String| {
        if composing.get_untracked() {
            set_draft.set(raw);
            return;
        }
        let sanitized = sanitize_name(&raw);
        set_error.set(sanitized.changed);
        set_draft.set(sanitized.value);
    };

    let start = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_draft.set(name.get_untracked());
        set_error.set(false);
        set_editing.set(true);
    };

    let commit = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let value = sanitize_name(&draft.get_untracked()).value;
        if !value.is_empty() {
            on_commit.run(value);
        }
        set_editing.set(false);
    };

    let cancel = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_editing.set(false);
    };

    view! {
        <Show
            when=move || editing.get()
            fallback=move || {
                let title_class = title_class.clone();
                view! {
                    <span class=title_class>{move || name.get()}</span>
                    <Show when=move || editable.get()>
                        <button class="icon-btn edit-btn" title="이름 변경" on:click=start>"✎"</button>
                    </Show>
                }
            }
        >
            <div class="name-editor" on:click=|ev| ev.stop_propagation()>
                <div class="name-editor-row">
                    <input
                        type="text"
                        class=move || if error.get() { "name-input invalid" } else { "name-input" }
                        prop:value=move || draft.get()
                        on:input=move |ev| apply_input(event_target_value(&ev))
                        on:compositionstart=move |_| set_composing.set(true)
                        on:compositionend=move |ev| {
                            set_composing.set(false);
                            apply_input(event_target_value(&ev));
                        }
                    />
                    <button class="icon-btn confirm-btn" on:click=commit>"✓"</button>
                    <button class="icon-btn cancel-btn" on:click=cancel>"✗"</button>
                </div>
                <Show when=move || error.get()>
                    <p class="name-error">
                        {format!("공백, 특수문자는 사용할 수 없습니다. (최대 {MAX_NAME_CHARS}자)")}
                    </p>
                </Show>
            </div>
        </Show>
    }
}
