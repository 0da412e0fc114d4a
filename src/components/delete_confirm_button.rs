//! Delete Confirm Button Component
//!
//! Two-step removal for a group or button header.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Unanswered prompts fall back to the × button after this long
const PROMPT_TIMEOUT_MS: u32 = 4_000;

/// `target` names what gets removed ("그룹", "버튼") in the prompt and tooltip.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    target: &'static str,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (asking, set_asking) = signal(false);
    let expiry = StoredValue::new_local(None::<Timeout>);

    let close = move || {
        expiry.update_value(|t| drop(t.take()));
        set_asking.set(false);
    };
    let open = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_asking.set(true);
        let timer = Timeout::new(PROMPT_TIMEOUT_MS, move || set_asking.set(false));
        expiry.set_value(Some(timer));
    };
    on_cleanup(move || expiry.update_value(|t| drop(t.take())));

    view! {
        {move || {
            if asking.get() {
                view! {
                    <span class="delete-confirm" on:click=|ev| ev.stop_propagation()>
                        <span class="delete-confirm-text">{format!("{target} 삭제?")}</span>
                        <button
                            class="icon-btn confirm-btn"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                close();
                                on_confirm.run(());
                            }
                        >
                            "✓"
                        </button>
                        <button
                            class="icon-btn cancel-btn"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                close();
                            }
                        >
                            "✗"
                        </button>
                    </span>
                }
                    .into_any()
            } else {
                view! {
                    <button class=button_class.clone() title=format!("{target} 삭제") on:click=open>
                        "×"
                    </button>
                }
                    .into_any()
            }
        }}
    }
}
