//! Leptos DragDrop Utilities
//!
//! HTML5 drag-and-drop for Leptos on top of the core drag session.
//! The session only starts a short moment after `dragstart` so the browser
//! can snapshot the drag image before the dragged element restyles.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use macro_core::{DragSession, DraggableItem, ItemPosition, PointerSample};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlElement};

/// MIME type of the drag payload
pub const PAYLOAD_MIME: &str = "application/json";

/// Delay between `dragstart` and the session recording the item
const BEGIN_DELAY_MS: u32 = 50;

/// How long the off-screen drag image stays in the document
const GHOST_CLEANUP_MS: u32 = 100;

/// Shared drag state, passed down through context
#[derive(Clone, Copy)]
pub struct DragController {
    session: RwSignal<DragSession>,
    pending: StoredValue<Option<Timeout>, LocalStorage>,
}

impl DragController {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(DragSession::new()),
            pending: StoredValue::new_local(None),
        }
    }

    /// Tracked read of the session, for highlight classes
    pub fn with<R>(&self, f: impl FnOnce(&DragSession) -> R) -> R {
        self.session.with(f)
    }

    /// Schedule the session start, returning the payload to attach now
    pub fn begin_drag(&self, item: DraggableItem) -> String {
        let session = self.session;
        // replacing the handle drops (and so cancels) an earlier pending start
        self.pending.set_value(Some(Timeout::new(BEGIN_DELAY_MS, move || {
            session.update(|s| {
                s.begin_drag(item);
            });
        })));
        item.to_payload()
    }

    /// Returns whether the proposal changed; unchanged hovers do not notify
    pub fn propose_drop(&self, candidate: &DraggableItem, pointer: Option<PointerSample>) -> bool {
        let mut changed = false;
        self.session.maybe_update(|s| {
            changed = s.propose_drop(candidate, pointer);
            changed
        });
        changed
    }

    /// Clear the session, handing back the final pair if there is one
    pub fn end(&self) -> Option<(DraggableItem, ItemPosition)> {
        self.pending.set_value(None);
        self.session.try_update(|s| s.take()).flatten()
    }

    pub fn cancel(&self) {
        self.pending.set_value(None);
        self.session.update(|s| s.cancel());
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the drag controller from context
pub fn use_drag_controller() -> DragController {
    expect_context::<DragController>()
}

// ========================
// Event handler factories
// ========================

/// `dragstart`: attach payload and drag image, then start the session
pub fn make_on_dragstart(ctrl: DragController, item: DraggableItem) -> impl Fn(DragEvent) + Copy + 'static {
    move |ev: DragEvent| {
        // nested draggables (button inside group) must not start the outer drag
        ev.stop_propagation();
        attach_ghost_image(&ev);
        let payload = ctrl.begin_drag(item);
        if let Some(dt) = ev.data_transfer() {
            let _ = dt.set_data(PAYLOAD_MIME, &payload);
            dt.set_effect_allowed("move");
        }
    }
}

/// `dragover`: accept the drop and feed pointer geometry to the session
pub fn make_on_dragover(ctrl: DragController, candidate: DraggableItem) -> impl Fn(DragEvent) + Copy + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        ctrl.propose_drop(&candidate, pointer_sample(&ev));
    }
}

/// `dragend`: close the session and hand any final pair to `on_drop`
pub fn make_on_dragend<F>(ctrl: DragController, on_drop: F) -> impl Fn(DragEvent) + Copy + 'static
where
    F: Fn(DraggableItem, ItemPosition) + Copy + 'static,
{
    move |ev: DragEvent| {
        ev.stop_propagation();
        if let Some((dragged, indicator)) = ctrl.end() {
            on_drop(dragged, indicator);
        }
    }
}

/// `drop`: keep the browser from navigating to the payload
pub fn make_on_drop() -> impl Fn(DragEvent) + Copy + 'static {
    move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
    }
}

fn current_element(ev: &DragEvent) -> Option<HtmlElement> {
    ev.current_target()?.dyn_into::<HtmlElement>().ok()
}

fn pointer_sample(ev: &DragEvent) -> Option<PointerSample> {
    let rect = current_element(ev)?.get_bounding_client_rect();
    Some(PointerSample::new(f64::from(ev.client_y()), rect.top(), rect.height()))
}

/// Clone the dragged element off-screen and use it as the drag image
fn attach_ghost_image(ev: &DragEvent) {
    let Some(source) = current_element(ev) else { return };
    let Some(dt) = ev.data_transfer() else { return };
    let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let Some(ghost) = source
        .clone_node_with_deep(true)
        .ok()
        .and_then(|node| node.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    let width = source.get_bounding_client_rect().width();
    let style = ghost.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("top", "-1000px");
    let _ = style.set_property("opacity", "0.8");
    let _ = style.set_property("pointer-events", "none");
    let _ = style.set_property("width", &format!("{width}px"));
    let _ = style.set_property("transform", "translateX(-10000px)");

    if body.append_child(&ghost).is_err() {
        return;
    }
    dt.set_drag_image(&ghost, 20, 20);
    Timeout::new(GHOST_CLEANUP_MS, move || ghost.remove()).forget();
}
