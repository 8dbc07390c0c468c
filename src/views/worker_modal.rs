// ============================================================================
// WORKER DETAIL MODAL
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::models::worker::Worker;
use crate::state::AppState;

pub fn render_worker_modal(worker: &Worker, state: &AppState) -> Result<Element, JsValue> {
    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();
    let modal = ElementBuilder::new("div")?.class("modal worker-modal").build();

    // Header
    let header = ElementBuilder::new("div")?.class("modal-header").build();
    append_child(
        &header,
        &ElementBuilder::new("h2")?.text(&worker.full_name()).build(),
    )?;
    let close = ElementBuilder::new("button")?
        .class("modal-close")
        .text("×")
        .build();
    {
        let state = state.clone();
        on_click(&close, move |_| {
            *state.selected_worker.borrow_mut() = None;
            state.notify_change();
        })?;
    }
    append_child(&header, &close)?;
    append_child(&modal, &header)?;

    // Body
    let body = ElementBuilder::new("div")?.class("modal-body").build();

    if let Some(photo) = &worker.profile_photo {
        append_child(
            &body,
            &ElementBuilder::new("img")?
                .class("modal-photo")
                .attr("src", photo)?
                .attr("alt", &worker.full_name())?
                .build(),
        )?;
    }

    let mut rows: Vec<(&str, String)> = vec![
        ("Email", worker.email.clone()),
        ("Phone", worker.phone.clone()),
        ("Primary profession", worker.primary_profession.clone()),
        ("Status", worker.status.label().to_string()),
        ("Rating", format!("★ {:.1}", worker.rating)),
        ("Completed jobs", worker.completed_jobs.to_string()),
        ("ID card type", worker.id_card_type.clone()),
        ("Joined", worker.join_date.clone()),
    ];
    if let Some(secondary) = &worker.secondary_profession {
        rows.insert(3, ("Secondary profession", secondary.clone()));
    }
    if let Some(address) = &worker.residential_address {
        rows.push(("Residential address", address.clone()));
    }
    if let Some(digital) = &worker.digital_address {
        rows.push(("Digital address", digital.clone()));
    }

    for (label, value) in rows {
        let row = ElementBuilder::new("div")?
            .class("detail-row")
            .child(
                ElementBuilder::new("span")?
                    .class("detail-label")
                    .text(label)
                    .build(),
            )?
            .child(
                ElementBuilder::new("span")?
                    .class("detail-value")
                    .text(&value)
                    .build(),
            )?
            .build();
        append_child(&body, &row)?;
    }

    if !worker.bio.is_empty() {
        append_child(
            &body,
            &ElementBuilder::new("p")?.class("worker-bio").text(&worker.bio).build(),
        )?;
    }

    append_child(&modal, &body)?;
    append_child(&overlay, &modal)?;

    // Clicking the dimmed background closes the modal; clicks inside the
    // modal bubble up, so compare the event target against the overlay.
    {
        let state = state.clone();
        let overlay_el = overlay.clone();
        on_click(&overlay, move |event| {
            let on_backdrop = event
                .target()
                .map(|t| t.loose_eq(overlay_el.as_ref()))
                .unwrap_or(false);
            if on_backdrop {
                *state.selected_worker.borrow_mut() = None;
                state.notify_change();
            }
        })?;
    }

    Ok(overlay)
}
