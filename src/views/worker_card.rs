// ============================================================================
// WORKER CARD
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::models::worker::Worker;
use crate::state::AppState;

pub fn render_worker_card(worker: &Worker, state: &AppState) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("div")?.class("worker-card").build();

    // Avatar
    let avatar = match &worker.profile_photo {
        Some(url) => ElementBuilder::new("img")?
            .class("worker-avatar")
            .attr("src", url)?
            .attr("alt", &worker.full_name())?
            .build(),
        None => ElementBuilder::new("div")?
            .class("worker-avatar worker-avatar-placeholder")
            .text(&initials(worker))
            .build(),
    };
    append_child(&card, &avatar)?;

    if worker.is_online {
        append_child(
            &card,
            &ElementBuilder::new("span")?.class("online-dot").build(),
        )?;
    }

    let body = ElementBuilder::new("div")?
        .class("worker-card-body")
        .child(
            ElementBuilder::new("h3")?
                .class("worker-name")
                .text(&worker.full_name())
                .build(),
        )?
        .child(
            ElementBuilder::new("p")?
                .class("worker-profession")
                .text(&worker.primary_profession)
                .build(),
        )?
        .build();

    let meta = ElementBuilder::new("div")?
        .class("worker-meta")
        .child(
            ElementBuilder::new("span")?
                .class(&format!("status-badge {}", worker.status.css_class()))
                .text(worker.status.label())
                .build(),
        )?
        .child(
            ElementBuilder::new("span")?
                .class("worker-rating")
                .text(&format!("★ {:.1}", worker.rating))
                .build(),
        )?
        .child(
            ElementBuilder::new("span")?
                .class("worker-jobs")
                .text(&format!("{} jobs", worker.completed_jobs))
                .build(),
        )?
        .build();
    append_child(&body, &meta)?;

    if worker.verified_worker || worker.premium_service {
        let badges = ElementBuilder::new("div")?.class("worker-badges").build();
        if worker.verified_worker {
            append_child(
                &badges,
                &ElementBuilder::new("span")?.class("badge badge-verified").text("Verified").build(),
            )?;
        }
        if worker.premium_service {
            append_child(
                &badges,
                &ElementBuilder::new("span")?.class("badge badge-premium").text("Premium").build(),
            )?;
        }
        append_child(&body, &badges)?;
    }

    append_child(&card, &body)?;

    {
        let state = state.clone();
        let worker = worker.clone();
        on_click(&card, move |_| {
            *state.selected_worker.borrow_mut() = Some(worker.clone());
            state.notify_change();
        })?;
    }

    Ok(card)
}

fn initials(worker: &Worker) -> String {
    let first = worker.first_name.chars().next();
    let last = worker.last_name.chars().next();
    first.into_iter().chain(last).collect()
}
