// ============================================================================
// ADD WORKER MODAL
// ============================================================================
// Form plus file attachments. Each selected file passes the type allow-list
// first; images then go through the compressor before they are attached to
// the multipart submission.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, File, FormData, HtmlInputElement, HtmlTextAreaElement};

use crate::dom::{
    append_child, get_element_by_id, on_change, on_click, on_input, set_text_content,
    ElementBuilder,
};
use crate::models::worker::{Worker, WorkerStatus};
use crate::services::compressor::{compress_image, CompressedUpload, DEFAULT_CEILING_KB};
use crate::services::session::SessionService;
use crate::services::ApiClient;
use crate::state::AppState;
use crate::utils::files::{format_file_size, is_allowed_image, validate_upload, UploadField};
use crate::utils::storage::LocalSessionStore;

/// Text fields of the add-worker form, kept separate from the attachments so
/// validation stays a pure function.
#[derive(Default, Clone, Debug)]
pub struct WorkerDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub residential_address: String,
    pub digital_address: String,
    pub bio: String,
    pub primary_profession: String,
    pub secondary_profession: String,
    pub id_card_type: String,
}

fn email_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

fn phone_valid(phone: &str) -> bool {
    let cleaned: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let body = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    body.len() >= 10
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '(' | ')'))
}

/// Field-scoped validation errors as (field key, message) pairs.
pub fn draft_errors(draft: &WorkerDraft) -> Vec<(&'static str, &'static str)> {
    let mut errors = Vec::new();
    if draft.first_name.trim().is_empty() {
        errors.push(("first_name", "First name is required"));
    }
    if draft.last_name.trim().is_empty() {
        errors.push(("last_name", "Last name is required"));
    }
    if draft.email.trim().is_empty() {
        errors.push(("email", "Email is required"));
    } else if !email_valid(draft.email.trim()) {
        errors.push(("email", "Please enter a valid email address"));
    }
    if draft.phone.trim().is_empty() {
        errors.push(("phone", "Phone is required"));
    } else if !phone_valid(draft.phone.trim()) {
        errors.push(("phone", "Please enter a valid phone number"));
    }
    if draft.primary_profession.trim().is_empty() {
        errors.push(("primary_profession", "Primary profession is required"));
    }
    if draft.bio.trim().is_empty() {
        errors.push(("bio", "Bio is required"));
    }
    errors
}

/// A validated attachment ready for the multipart payload. Images arrive
/// compressed; business-certificate documents (PDF/Word) pass through as-is.
enum Attachment {
    Compressed(CompressedUpload),
    Document(File),
}

impl Attachment {
    fn file(&self) -> &File {
        match self {
            Attachment::Compressed(upload) => &upload.file,
            Attachment::Document(file) => file,
        }
    }
}

type AttachmentSlot = Rc<RefCell<Option<Attachment>>>;

const ATTACHMENT_FIELDS: [UploadField; 4] = [
    UploadField::ProfilePhoto,
    UploadField::BusinessCertificate,
    UploadField::IdCardFront,
    UploadField::IdCardBack,
];

fn error_id(key: &str) -> String {
    format!("add-err-{}", key)
}

fn info_id(key: &str) -> String {
    format!("add-info-{}", key)
}

fn set_field_error(key: &str, message: Option<&str>) {
    if let Some(el) = get_element_by_id(&error_id(key)) {
        set_text_content(&el, message.unwrap_or(""));
    }
}

fn set_field_info(key: &str, message: &str) {
    if let Some(el) = get_element_by_id(&info_id(key)) {
        set_text_content(&el, message);
    }
}

fn generate_worker_id() -> String {
    let millis = js_sys::Date::now() as u64;
    let salt = (js_sys::Math::random() * 1e9) as u64;
    format!("w{}-{:09}", millis, salt)
}

pub fn render_add_worker_modal(state: &AppState) -> Result<Element, JsValue> {
    let draft = Rc::new(RefCell::new(WorkerDraft::default()));
    let attachments: Rc<Vec<(UploadField, AttachmentSlot)>> = Rc::new(
        ATTACHMENT_FIELDS
            .into_iter()
            .map(|f| (f, Rc::new(RefCell::new(None))))
            .collect(),
    );
    let submitting = Rc::new(RefCell::new(false));

    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();
    let modal = ElementBuilder::new("div")?.class("modal add-worker-modal").build();

    // Header
    let header = ElementBuilder::new("div")?.class("modal-header").build();
    append_child(
        &header,
        &ElementBuilder::new("h2")?.text("Add worker").build(),
    )?;
    let close = ElementBuilder::new("button")?.class("modal-close").text("×").build();
    {
        let state = state.clone();
        on_click(&close, move |_| {
            *state.show_add_modal.borrow_mut() = false;
            state.notify_change();
        })?;
    }
    append_child(&header, &close)?;
    append_child(&modal, &header)?;

    let body = ElementBuilder::new("div")?.class("modal-body").build();

    // Text fields
    let fields: [(&str, &'static str, &str, fn(&mut WorkerDraft) -> &mut String); 9] = [
        ("First name", "first_name", "text", |d| &mut d.first_name),
        ("Last name", "last_name", "text", |d| &mut d.last_name),
        ("Email", "email", "email", |d| &mut d.email),
        ("Phone", "phone", "tel", |d| &mut d.phone),
        ("Residential address", "residential_address", "text", |d| {
            &mut d.residential_address
        }),
        ("Digital address", "digital_address", "text", |d| &mut d.digital_address),
        ("Primary profession", "primary_profession", "text", |d| {
            &mut d.primary_profession
        }),
        ("Secondary profession", "secondary_profession", "text", |d| {
            &mut d.secondary_profession
        }),
        ("ID card type", "id_card_type", "text", |d| &mut d.id_card_type),
    ];

    for (label, key, input_type, accessor) in fields {
        append_child(&body, &text_field(label, key, input_type, &draft, accessor)?)?;
    }

    // Bio textarea
    let bio_group = ElementBuilder::new("div")?.class("form-group").build();
    append_child(&bio_group, &ElementBuilder::new("label")?.text("Bio").build())?;
    let bio_input = ElementBuilder::new("textarea")?
        .class("form-input")
        .attr("rows", "3")?
        .attr("placeholder", "Tell us about yourself and your experience...")?
        .build();
    {
        let draft = draft.clone();
        on_input(&bio_input, move |event| {
            if let Some(area) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
            {
                draft.borrow_mut().bio = area.value();
                set_field_error("bio", None);
            }
        })?;
    }
    append_child(&bio_group, &bio_input)?;
    append_child(
        &bio_group,
        &ElementBuilder::new("div")?.class("field-error").id(&error_id("bio"))?.build(),
    )?;
    append_child(&body, &bio_group)?;

    // File attachments
    for (field, slot) in attachments.iter() {
        append_child(&body, &file_field(*field, slot.clone())?)?;
    }

    // Form-level error
    append_child(
        &body,
        &ElementBuilder::new("div")?.class("form-error").id("add-form-error")?.build(),
    )?;

    append_child(&modal, &body)?;

    // Footer
    let footer = ElementBuilder::new("div")?.class("modal-footer").build();
    let submit = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .id("add-submit")?
        .text("Create worker")
        .build();
    {
        let state = state.clone();
        let draft = draft.clone();
        let attachments = attachments.clone();
        let submitting = submitting.clone();
        on_click(&submit, move |_| {
            if *submitting.borrow() {
                return;
            }

            let snapshot = draft.borrow().clone();
            let errors = draft_errors(&snapshot);
            for key in TEXT_FIELD_KEYS {
                set_field_error(key, None);
            }
            set_field_error("bio", None);
            for &(key, message) in &errors {
                set_field_error(key, Some(message));
            }
            if !errors.is_empty() {
                return;
            }

            *submitting.borrow_mut() = true;
            if let Some(button) = get_element_by_id("add-submit") {
                set_text_content(&button, "Creating...");
            }

            let state = state.clone();
            let attachments = attachments.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                let result = submit_worker(&state, &snapshot, &attachments).await;

                *submitting.borrow_mut() = false;
                if let Some(button) = get_element_by_id("add-submit") {
                    set_text_content(&button, "Create worker");
                }
                if let Err(message) = result {
                    if let Some(el) = get_element_by_id("add-form-error") {
                        set_text_content(&el, &message);
                    }
                }
            });
        })?;
    }
    append_child(&footer, &submit)?;
    append_child(&modal, &footer)?;

    append_child(&overlay, &modal)?;
    Ok(overlay)
}

const TEXT_FIELD_KEYS: [&str; 9] = [
    "first_name",
    "last_name",
    "email",
    "phone",
    "residential_address",
    "digital_address",
    "primary_profession",
    "secondary_profession",
    "id_card_type",
];

fn text_field(
    label: &str,
    key: &'static str,
    input_type: &str,
    draft: &Rc<RefCell<WorkerDraft>>,
    accessor: fn(&mut WorkerDraft) -> &mut String,
) -> Result<Element, JsValue> {
    let group = ElementBuilder::new("div")?.class("form-group").build();
    append_child(&group, &ElementBuilder::new("label")?.text(label).build())?;

    let input = ElementBuilder::new("input")?
        .class("form-input")
        .attr("type", input_type)?
        .attr("name", key)?
        .build();
    {
        let draft = draft.clone();
        on_input(&input, move |event| {
            if let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            {
                *accessor(&mut draft.borrow_mut()) = input.value();
                set_field_error(key, None);
            }
        })?;
    }
    append_child(&group, &input)?;

    append_child(
        &group,
        &ElementBuilder::new("div")?.class("field-error").id(&error_id(key))?.build(),
    )?;
    Ok(group)
}

fn file_field(field: UploadField, slot: AttachmentSlot) -> Result<Element, JsValue> {
    let key = field.form_key();
    let group = ElementBuilder::new("div")?.class("form-group file-group").build();
    append_child(&group, &ElementBuilder::new("label")?.text(field.label()).build())?;

    let accept = match field {
        UploadField::BusinessCertificate => {
            "image/jpeg,image/png,image/webp,application/pdf,.doc,.docx"
        }
        _ => "image/jpeg,image/png,image/webp",
    };
    let input = ElementBuilder::new("input")?
        .class("form-input")
        .attr("type", "file")?
        .attr("accept", accept)?
        .attr("name", key)?
        .build();

    {
        on_change(&input, move |event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };

            set_field_error(key, None);
            set_field_info(key, "");

            // Validation gate: reject before compression is attempted.
            if let Err(message) = validate_upload(field, &file.type_(), file.size()) {
                set_field_error(key, Some(&message));
                input.set_value("");
                *slot.borrow_mut() = None;
                return;
            }

            if is_allowed_image(&file.type_()) {
                let slot = slot.clone();
                spawn_local(async move {
                    match compress_image(&file, DEFAULT_CEILING_KB).await {
                        Ok(upload) => {
                            set_field_info(
                                key,
                                &format!(
                                    "{} -> {} (quality {:.1})",
                                    format_file_size(upload.original_kb),
                                    format_file_size(upload.compressed_kb),
                                    upload.quality
                                ),
                            );
                            *slot.borrow_mut() = Some(Attachment::Compressed(upload));
                        }
                        Err(e) => {
                            set_field_error(key, Some(&e.to_string()));
                            *slot.borrow_mut() = None;
                        }
                    }
                });
            } else {
                // PDF/Word certificate: attach unmodified.
                set_field_info(key, &format_file_size(file.size() / 1024.0));
                *slot.borrow_mut() = Some(Attachment::Document(file));
            }
        })?;
    }
    append_child(&group, &input)?;

    append_child(
        &group,
        &ElementBuilder::new("div")?.class("field-info").id(&info_id(key))?.build(),
    )?;
    append_child(
        &group,
        &ElementBuilder::new("div")?.class("field-error").id(&error_id(key))?.build(),
    )?;
    Ok(group)
}

/// Submit the draft. When the API is unreachable the worker is still added
/// locally so the list stays usable offline.
async fn submit_worker(
    state: &AppState,
    draft: &WorkerDraft,
    attachments: &[(UploadField, AttachmentSlot)],
) -> Result<(), String> {
    let local_worker = Worker {
        id: generate_worker_id(),
        profile_photo: None,
        first_name: draft.first_name.trim().to_string(),
        last_name: draft.last_name.trim().to_string(),
        email: draft.email.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        residential_address: non_empty(&draft.residential_address),
        digital_address: non_empty(&draft.digital_address),
        bio: draft.bio.trim().to_string(),
        primary_profession: draft.primary_profession.trim().to_string(),
        secondary_profession: non_empty(&draft.secondary_profession),
        business_certificate: None,
        id_card_type: draft.id_card_type.trim().to_string(),
        id_card_front: None,
        id_card_back: None,
        status: WorkerStatus::Active,
        rating: 0.0,
        completed_jobs: 0,
        is_online: false,
        is_available: true,
        verified_worker: false,
        premium_service: false,
        join_date: Utc::now().format("%Y-%m-%d").to_string(),
    };

    let form = FormData::new().map_err(|e| format!("{:?}", e))?;
    let text_parts = [
        ("first_name", &local_worker.first_name),
        ("last_name", &local_worker.last_name),
        ("email", &local_worker.email),
        ("phone", &local_worker.phone),
        ("bio", &local_worker.bio),
        ("primary_profession", &local_worker.primary_profession),
        ("id_card_type", &local_worker.id_card_type),
    ];
    for (name, value) in text_parts {
        form.append_with_str(name, value).map_err(|e| format!("{:?}", e))?;
    }
    if let Some(address) = &local_worker.residential_address {
        form.append_with_str("residential_address", address)
            .map_err(|e| format!("{:?}", e))?;
    }
    if let Some(digital) = &local_worker.digital_address {
        form.append_with_str("digital_address", digital)
            .map_err(|e| format!("{:?}", e))?;
    }
    if let Some(secondary) = &local_worker.secondary_profession {
        form.append_with_str("secondary_profession", secondary)
            .map_err(|e| format!("{:?}", e))?;
    }

    for (field, slot) in attachments {
        if let Some(attachment) = slot.borrow().as_ref() {
            let file = attachment.file();
            form.append_with_blob_and_filename(field.form_key(), file, &file.name())
                .map_err(|e| format!("{:?}", e))?;
        }
    }

    let token = SessionService::new(LocalSessionStore).access_token();
    let api = ApiClient::new();

    match api.create_worker(token.as_deref(), &form).await {
        Ok(created) => {
            log::info!("✅ [WORKERS] Worker created: {}", created.id);
            state.add_worker(created);
        }
        Err(e) if e.is_network() => {
            log::warn!("⚠️ [WORKERS] API unreachable, adding worker locally");
            state.add_worker(local_worker);
        }
        Err(e) => {
            log::error!("❌ [WORKERS] Failed to create worker: {}", e);
            return Err(e.to_string());
        }
    }

    *state.show_add_modal.borrow_mut() = false;
    state.notify_change();
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> WorkerDraft {
        WorkerDraft {
            first_name: "Ama".to_string(),
            last_name: "Mensah".to_string(),
            email: "ama.mensah@email.com".to_string(),
            phone: "0245767665".to_string(),
            residential_address: String::new(),
            digital_address: String::new(),
            bio: "Seamstress with 10 years of experience.".to_string(),
            primary_profession: "Seamstress".to_string(),
            secondary_profession: String::new(),
            id_card_type: "Ghana Card".to_string(),
        }
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(draft_errors(&valid_draft()).is_empty());
    }

    #[test]
    fn required_fields_are_reported_per_field() {
        let errors = draft_errors(&WorkerDraft::default());
        let keys: Vec<&str> = errors.iter().map(|(k, _)| *k).collect();
        for key in ["first_name", "last_name", "email", "phone", "primary_profession", "bio"] {
            assert!(keys.contains(&key), "missing required error for {}", key);
        }
        // Optional fields never produce errors.
        assert!(!keys.contains(&"residential_address"));
        assert!(!keys.contains(&"secondary_profession"));
    }

    #[test]
    fn email_format_is_checked() {
        let mut draft = valid_draft();
        draft.email = "not-an-email".to_string();
        assert!(draft_errors(&draft)
            .iter()
            .any(|(k, m)| *k == "email" && m.contains("valid email")));

        draft.email = "a@b.c".to_string();
        assert!(draft_errors(&draft).is_empty());
    }

    #[test]
    fn phone_format_is_checked() {
        let mut draft = valid_draft();
        draft.phone = "123".to_string();
        assert!(draft_errors(&draft).iter().any(|(k, _)| *k == "phone"));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut draft = valid_draft();
        draft.bio = "   ".to_string();
        assert!(draft_errors(&draft)
            .iter()
            .any(|(k, m)| *k == "bio" && m.contains("required")));
    }

    #[test]
    fn non_empty_trims_and_drops_blanks() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" GA-123 "), Some("GA-123".to_string()));
    }
}
