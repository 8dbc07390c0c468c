// ============================================================================
// LOGIN VIEW
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{
    append_child, get_element_by_id, on_click, on_input, set_attribute, set_text_content,
    ElementBuilder,
};
use crate::services::session::{SessionPhase, SessionService};
use crate::services::{mock, ApiClient};
use crate::state::AppState;
use crate::utils::storage::LocalSessionStore;

/// Empty phone/password are required-field errors; otherwise a loose sanity
/// check: at least 10 of digits/spaces/dashes/parens, optional leading '+'.
pub fn phone_error(phone: &str) -> Option<&'static str> {
    if phone.is_empty() {
        return Some("Phone number is required");
    }
    let cleaned: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let body = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let valid = body.len() >= 10
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '(' | ')'));
    if valid {
        None
    } else {
        Some("Please enter a valid phone number")
    }
}

pub fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required")
    } else if password.len() < 6 {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

fn set_error_text(id: &str, message: Option<&str>) {
    if let Some(el) = get_element_by_id(id) {
        set_text_content(&el, message.unwrap_or(""));
    }
}

pub fn render_login(state: &AppState) -> Result<Element, JsValue> {
    log::info!("🎬 [LOGIN] render_login() called");

    // Form state lives in closures; errors are written into the DOM in
    // place, no global re-render while typing.
    let phone = Rc::new(RefCell::new(String::new()));
    let password = Rc::new(RefCell::new(String::new()));
    let submitting = Rc::new(RefCell::new(false));

    let screen = ElementBuilder::new("div")?.class("login-screen").build();
    let container = ElementBuilder::new("div")?.class("login-container").build();

    // Header
    let header = ElementBuilder::new("div")?
        .class("login-header")
        .child(ElementBuilder::new("h1")?.text("Worker Admin").build())?
        .child(
            ElementBuilder::new("p")?
                .text("Sign in to manage your workers")
                .build(),
        )?
        .build();
    append_child(&container, &header)?;

    // Phone field
    let phone_group = ElementBuilder::new("div")?.class("form-group").build();
    append_child(
        &phone_group,
        &ElementBuilder::new("label")?.text("Phone number").build(),
    )?;
    let phone_input = ElementBuilder::new("input")?
        .class("form-input")
        .id("login-phone")?
        .attr("type", "tel")?
        .attr("placeholder", "0245767665")?
        .build();
    append_child(&phone_group, &phone_input)?;
    let phone_error_el = ElementBuilder::new("div")?
        .class("field-error")
        .id("phone-error")?
        .build();
    append_child(&phone_group, &phone_error_el)?;
    append_child(&container, &phone_group)?;

    {
        let phone = phone.clone();
        on_input(&phone_input, move |event| {
            if let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            {
                *phone.borrow_mut() = input.value();
                set_error_text("phone-error", None);
            }
        })?;
    }

    // Password field
    let password_group = ElementBuilder::new("div")?.class("form-group").build();
    append_child(
        &password_group,
        &ElementBuilder::new("label")?.text("Password").build(),
    )?;
    let password_input = ElementBuilder::new("input")?
        .class("form-input")
        .id("login-password")?
        .attr("type", "password")?
        .attr("placeholder", "••••••••")?
        .build();
    append_child(&password_group, &password_input)?;
    let password_error_el = ElementBuilder::new("div")?
        .class("field-error")
        .id("password-error")?
        .build();
    append_child(&password_group, &password_error_el)?;
    append_child(&container, &password_group)?;

    {
        let password = password.clone();
        on_input(&password_input, move |event| {
            if let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            {
                *password.borrow_mut() = input.value();
                set_error_text("password-error", None);
            }
        })?;
    }

    // Form-level API error, distinct from the field errors above
    let api_error_el = ElementBuilder::new("div")?
        .class("form-error")
        .id("login-api-error")?
        .build();
    append_child(&container, &api_error_el)?;

    // Submit
    let submit = ElementBuilder::new("button")?
        .class("btn btn-primary login-submit")
        .id("login-submit")?
        .text("Sign in")
        .build();
    append_child(&container, &submit)?;

    {
        let state = state.clone();
        let phone = phone.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        on_click(&submit, move |_| {
            if *submitting.borrow() {
                return;
            }

            let phone_value = phone.borrow().clone();
            let password_value = password.borrow().clone();

            let phone_err = phone_error(&phone_value);
            let password_err = password_error(&password_value);
            set_error_text("phone-error", phone_err);
            set_error_text("password-error", password_err);
            set_error_text("login-api-error", None);
            if phone_err.is_some() || password_err.is_some() {
                return;
            }

            *submitting.borrow_mut() = true;
            set_submit_busy(true);

            let state = state.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                let api = ApiClient::new();
                let result = match api.login(&phone_value, &password_value).await {
                    Err(e) if e.is_network() => {
                        log::warn!("⚠️ [LOGIN] API unreachable, trying mock path");
                        mock::login(&phone_value, &password_value)
                    }
                    other => other,
                };

                match result {
                    Ok(response) => match response.access_tokens() {
                        Some(tokens) => {
                            let session = SessionService::new(LocalSessionStore);
                            session.issue(tokens, response.user.as_ref(), response.worker.as_ref());

                            state
                                .auth
                                .set_display_name(response.user.as_ref().map(|u| u.full_name()));
                            state.auth.set_phase(SessionPhase::Authenticated);
                            log::info!("✅ [LOGIN] Authenticated");
                            state.notify_change();
                        }
                        None => {
                            set_error_text("login-api-error", Some("Unexpected response from server"));
                        }
                    },
                    Err(e) => {
                        log::error!("❌ [LOGIN] {}", e);
                        set_error_text("login-api-error", Some(&e.to_string()));
                    }
                }

                *submitting.borrow_mut() = false;
                set_submit_busy(false);
            });
        })?;
    }

    // Demo credentials hint (mock path)
    let hint = ElementBuilder::new("div")?
        .class("login-hint")
        .child(
            ElementBuilder::new("p")?
                .text("Demo credentials (offline mode)")
                .build(),
        )?
        .child(
            ElementBuilder::new("p")?
                .text(&format!("Phone: {}", mock::MOCK_PHONE))
                .build(),
        )?
        .child(
            ElementBuilder::new("p")?
                .text(&format!("Password: {}", mock::MOCK_PASSWORD))
                .build(),
        )?
        .build();
    append_child(&container, &hint)?;

    append_child(&screen, &container)?;
    Ok(screen)
}

fn set_submit_busy(busy: bool) {
    if let Some(button) = get_element_by_id("login-submit") {
        set_text_content(&button, if busy { "Signing in..." } else { "Sign in" });
        if busy {
            let _ = set_attribute(&button, "disabled", "true");
        } else {
            let _ = button.remove_attribute("disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_validation_accepts_common_formats() {
        assert_eq!(phone_error("0245767665"), None);
        assert_eq!(phone_error("+233 24 576 7665"), None);
        assert_eq!(phone_error("(024) 576-7665"), None);
    }

    #[test]
    fn phone_validation_rejects_short_or_alpha() {
        assert_eq!(phone_error(""), Some("Phone number is required"));
        assert_eq!(phone_error("12345"), Some("Please enter a valid phone number"));
        assert_eq!(
            phone_error("not-a-number!"),
            Some("Please enter a valid phone number")
        );
    }

    #[test]
    fn password_validation_requires_six_chars() {
        assert_eq!(password_error(""), Some("Password is required"));
        assert_eq!(
            password_error("12345"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(password_error("thethethe"), None);
    }
}
