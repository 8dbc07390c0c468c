// ============================================================================
// API STATUS BANNER
// ============================================================================
// Shown when the listing endpoint is unreachable and sample data is on
// screen. Degraded mode, not an error page: the list stays usable.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::state::AppState;
use crate::views::worker_list::load_workers;

pub fn render_status_banner(state: &AppState) -> Result<Element, JsValue> {
    let banner = ElementBuilder::new("div")?.class("api-status-banner").build();

    let message = state
        .api_error
        .borrow()
        .clone()
        .unwrap_or_else(|| "Failed to connect to the server".to_string());

    append_child(
        &banner,
        &ElementBuilder::new("span")?
            .class("banner-text")
            .text(&banner_text(&message))
            .build(),
    )?;

    let retry = ElementBuilder::new("button")?
        .class("btn btn-small")
        .text("Retry")
        .build();
    {
        let state = state.clone();
        on_click(&retry, move |_| {
            *state.loaded_once.borrow_mut() = false;
            load_workers(&state);
            state.notify_change();
        })?;
    }
    append_child(&banner, &retry)?;

    Ok(banner)
}

fn banner_text(message: &str) -> String {
    format!("⚠️ {} - showing sample data", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_text_joins_message_with_plain_separator() {
        let text = banner_text("Network error. Please check your connection.");
        assert_eq!(
            text,
            "⚠️ Network error. Please check your connection. - showing sample data"
        );
        assert!(!text.contains('\u{2014}'));
    }
}
