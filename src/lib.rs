// ============================================================================
// OLAPY ADMIN - WORKER MANAGEMENT PANEL (PURE RUST MVVM)
// ============================================================================
// - Views: functions that render DOM
// - Services: API client, session lifecycle, image compression
// - State: Rc<RefCell> state management with change subscribers
// - Models: structures shared with the backend
// ============================================================================

mod app;
mod dom;
mod models;
mod services;
mod state;
mod utils;
mod views;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;

// Global app instance, single-threaded WASM
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(Config::default());
    log::info!("🚀 Olapy Admin - Pure Rust + MVVM");

    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Full re-render of the app. Views schedule this through the state change
/// subscribers rather than calling it directly.
pub fn rerender_app() {
    APP.with(|app_cell| {
        if let Some(ref mut app) = *app_cell.borrow_mut() {
            if let Err(e) = app.render() {
                log::error!("❌ [RERENDER] Re-render failed: {:?}", e);
            }
        }
    });
}
