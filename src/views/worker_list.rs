// ============================================================================
// WORKER LIST VIEW
// ============================================================================
// Header, search + status filter, card grid. On any listing failure the view
// falls back to the built-in sample dataset behind a non-fatal banner.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};

use crate::dom::{
    append_child, get_element_by_id, on_change, on_click, on_input, set_inner_html,
    set_text_content, ElementBuilder,
};
use crate::models::worker::{filter_workers, WorkerFilter};
use crate::services::session::SessionService;
use crate::services::{mock, ApiClient, FetchError};
use crate::state::AppState;
use crate::utils::storage::LocalSessionStore;
use crate::views::status_banner::render_status_banner;
use crate::views::worker_card::render_worker_card;

/// Fetch the worker list, falling back to sample data on failure.
pub fn load_workers(state: &AppState) {
    if *state.loading.borrow() {
        return;
    }
    *state.loading.borrow_mut() = true;
    *state.api_error.borrow_mut() = None;
    *state.using_fallback.borrow_mut() = false;

    let state = state.clone();
    spawn_local(async move {
        let token = SessionService::new(LocalSessionStore).access_token();
        let api = ApiClient::new();

        match api.get_workers(token.as_deref()).await {
            Ok(workers) => {
                log::info!("✅ [WORKERS] Loaded {} workers from API", workers.len());
                *state.workers.borrow_mut() = workers;
            }
            Err(FetchError::Unauthorized) => {
                // Session already cleared and redirect issued by the client.
                *state.loading.borrow_mut() = false;
                return;
            }
            Err(e) => {
                log::error!("❌ [WORKERS] Failed to load from API: {}", e);
                log::info!("🔄 [WORKERS] Using fallback sample data");
                *state.api_error.borrow_mut() = Some(e.to_string());
                *state.workers.borrow_mut() = mock::sample_workers();
                *state.using_fallback.borrow_mut() = true;
            }
        }

        *state.loading.borrow_mut() = false;
        *state.loaded_once.borrow_mut() = true;
        state.notify_change();
    });
}

pub fn render_worker_list(state: &AppState) -> Result<Element, JsValue> {
    if !*state.loaded_once.borrow() && !*state.loading.borrow() {
        load_workers(state);
    }

    let screen = ElementBuilder::new("div")?.class("worker-list-screen").build();

    // Header
    let header = ElementBuilder::new("header")?.class("list-header").build();
    let title_box = ElementBuilder::new("div")?
        .class("list-title")
        .child(ElementBuilder::new("h1")?.text("Workers").build())?
        .child(
            ElementBuilder::new("p")?
                .id("worker-count")?
                .text(&count_text(state))
                .build(),
        )?
        .build();
    append_child(&header, &title_box)?;

    let actions = ElementBuilder::new("div")?.class("list-actions").build();

    let add_button = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .text("+ Add worker")
        .build();
    {
        let state = state.clone();
        on_click(&add_button, move |_| {
            *state.show_add_modal.borrow_mut() = true;
            state.notify_change();
        })?;
    }
    append_child(&actions, &add_button)?;

    let refresh_button = ElementBuilder::new("button")?
        .class("btn btn-secondary")
        .text("Refresh")
        .build();
    {
        let state = state.clone();
        on_click(&refresh_button, move |_| {
            *state.loaded_once.borrow_mut() = false;
            load_workers(&state);
            state.notify_change();
        })?;
    }
    append_child(&actions, &refresh_button)?;

    let logout_button = ElementBuilder::new("button")?
        .class("btn btn-ghost")
        .text("Log out")
        .build();
    {
        let state = state.clone();
        on_click(&logout_button, move |_| {
            SessionService::new(LocalSessionStore).logout();
            state.auth.logout();
            state.notify_change();
        })?;
    }
    append_child(&actions, &logout_button)?;
    append_child(&header, &actions)?;
    append_child(&screen, &header)?;

    // Degraded-mode banner
    if *state.using_fallback.borrow() {
        append_child(&screen, &render_status_banner(state)?)?;
    }

    // Search + filter
    let toolbar = ElementBuilder::new("div")?.class("list-toolbar").build();

    let search_input = ElementBuilder::new("input")?
        .class("search-input")
        .attr("type", "search")?
        .attr("placeholder", "Search by name, email, phone or profession...")?
        .attr("value", &state.search_term.borrow())?
        .build();
    {
        let state = state.clone();
        on_input(&search_input, move |event| {
            if let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            {
                *state.search_term.borrow_mut() = input.value();
                update_grid(&state);
            }
        })?;
    }
    append_child(&toolbar, &search_input)?;

    let filter_select = ElementBuilder::new("select")?.class("filter-select").build();
    for filter in WorkerFilter::ALL {
        let option = ElementBuilder::new("option")?
            .attr("value", filter.value())?
            .text(filter.label())
            .build();
        if filter == *state.status_filter.borrow() {
            let _ = option.set_attribute("selected", "selected");
        }
        append_child(&filter_select, &option)?;
    }
    {
        let state = state.clone();
        on_change(&filter_select, move |event| {
            if let Some(select) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
            {
                *state.status_filter.borrow_mut() = WorkerFilter::from_value(&select.value());
                update_grid(&state);
            }
        })?;
    }
    append_child(&toolbar, &filter_select)?;
    append_child(&screen, &toolbar)?;

    // Grid (or spinner while the first load is in flight)
    if *state.loading.borrow() {
        let spinner = ElementBuilder::new("div")?
            .class("loading-spinner")
            .child(ElementBuilder::new("div")?.class("spinner").build())?
            .child(ElementBuilder::new("p")?.text("Loading workers...").build())?
            .build();
        append_child(&screen, &spinner)?;
    } else {
        let grid = ElementBuilder::new("div")?
            .class("worker-grid")
            .id("worker-grid")?
            .build();
        fill_grid(&grid, state)?;
        append_child(&screen, &grid)?;
    }

    Ok(screen)
}

fn count_text(state: &AppState) -> String {
    let total = state.workers.borrow().len();
    format!("{} registered", total)
}

fn fill_grid(grid: &Element, state: &AppState) -> Result<(), JsValue> {
    let workers = state.workers.borrow();
    let term = state.search_term.borrow();
    let filter = *state.status_filter.borrow();
    let visible = filter_workers(&workers, &term, filter);

    if visible.is_empty() {
        let empty = ElementBuilder::new("div")?
            .class("empty-state")
            .text("No workers match your search")
            .build();
        append_child(grid, &empty)?;
        return Ok(());
    }

    for worker in visible {
        append_child(grid, &render_worker_card(worker, state)?)?;
    }
    Ok(())
}

/// Re-render only the card grid, keeping search-input focus intact.
fn update_grid(state: &AppState) {
    if let Some(grid) = get_element_by_id("worker-grid") {
        set_inner_html(&grid, "");
        if let Err(e) = fill_grid(&grid, state) {
            log::error!("❌ [WORKERS] Failed to update grid: {:?}", e);
        }
    }
    if let Some(count) = get_element_by_id("worker-count") {
        set_text_content(&count, &count_text(state));
    }
}
