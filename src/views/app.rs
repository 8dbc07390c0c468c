// ============================================================================
// APP VIEW - Root view dispatch
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::services::session::SessionPhase;
use crate::state::AppState;
use crate::views::add_worker_modal::render_add_worker_modal;
use crate::views::login::render_login;
use crate::views::worker_list::render_worker_list;
use crate::views::worker_modal::render_worker_modal;

/// Render the view for the current session phase, plus any open modal.
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let root = ElementBuilder::new("div")?.class("app").build();

    match state.auth.get_phase() {
        SessionPhase::Checking => {
            let checking = ElementBuilder::new("div")?
                .class("session-checking")
                .child(ElementBuilder::new("div")?.class("spinner").build())?
                .child(
                    ElementBuilder::new("p")?
                        .text("Checking session...")
                        .build(),
                )?
                .build();
            append_child(&root, &checking)?;
        }
        SessionPhase::Unauthenticated => {
            append_child(&root, &render_login(state)?)?;
        }
        SessionPhase::Authenticated => {
            append_child(&root, &render_worker_list(state)?)?;

            let selected = state.selected_worker.borrow().clone();
            if let Some(worker) = selected {
                append_child(&root, &render_worker_modal(&worker, state)?)?;
            }
            if *state.show_add_modal.borrow() {
                append_child(&root, &render_add_worker_modal(state)?)?;
            }
        }
    }

    Ok(root)
}
