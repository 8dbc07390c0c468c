// ============================================================================
// APP - Application shell
// ============================================================================

use chrono::Utc;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, get_element_by_id, set_inner_html};
use crate::models::auth::UserProfile;
use crate::services::session::{SessionPhase, SessionService, USER_DATA_KEY};
use crate::state::AppState;
use crate::utils::storage::{load_from_storage, LocalSessionStore};
use crate::views::render_app;

pub struct App {
    state: AppState,
    root: Element,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();

        // Resolve the stored token before the first real render; an expired
        // or malformed token clears the whole session.
        let session = SessionService::new(LocalSessionStore);
        let phase = session.evaluate(Utc::now().timestamp());
        match phase {
            SessionPhase::Authenticated => {
                log::info!("✅ [SESSION] Live token found, restoring session");
                if let Some(profile) = load_from_storage::<UserProfile>(USER_DATA_KEY) {
                    state.auth.set_display_name(Some(profile.full_name()));
                }
            }
            _ => {
                log::info!("🔒 [SESSION] No live token, showing login");
            }
        }
        state.auth.set_phase(phase);

        // Batch change notifications into a single re-render per tick.
        state.subscribe_to_changes(move || {
            Timeout::new(0, crate::rerender_app).forget();
        });

        Ok(Self { state, root })
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        set_inner_html(&self.root, "");
        let view = render_app(&self.state)?;
        append_child(&self.root, &view)?;
        Ok(())
    }
}
