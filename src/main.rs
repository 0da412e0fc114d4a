//! Message Macro Editor Frontend Entry Point

mod app;
mod bootstrap;
mod components;
mod context;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let page_config = bootstrap::read_page_config();
    let config = page_config.clone().ok().flatten().unwrap_or_default();
    bootstrap::init_logging(config.log_capacity);
    if let Err(e) = page_config {
        tracing::warn!(error = %e, "ignoring page config, using defaults");
    }

    mount_to_body(move || view! { <App config=config.clone() /> });
}
