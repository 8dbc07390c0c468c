// File validation helpers. These run BEFORE the compressor: a file whose
// declared MIME type is not on the field's allow-list is rejected with a
// field-scoped message and never reaches the canvas pipeline.

/// Upload fields of the add-worker form that carry a file attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    ProfilePhoto,
    BusinessCertificate,
    IdCardFront,
    IdCardBack,
}

impl UploadField {
    /// Multipart form-data key for this field.
    pub fn form_key(&self) -> &'static str {
        match self {
            UploadField::ProfilePhoto => "profile_photo",
            UploadField::BusinessCertificate => "business_certificate",
            UploadField::IdCardFront => "id_card_front",
            UploadField::IdCardBack => "id_card_back",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UploadField::ProfilePhoto => "Profile photo",
            UploadField::BusinessCertificate => "Business certificate",
            UploadField::IdCardFront => "ID card (front)",
            UploadField::IdCardBack => "ID card (back)",
        }
    }
}

const IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

const DOCUMENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Hard cap on the raw file size accepted from the picker, before compression.
pub const MAX_UPLOAD_BYTES: f64 = 5.0 * 1024.0 * 1024.0;

pub fn is_allowed_image(mime: &str) -> bool {
    IMAGE_TYPES.contains(&mime)
}

/// Validate a candidate file against its field's allow-list and the raw size
/// cap. Returns a field-scoped error message on rejection.
pub fn validate_upload(field: UploadField, mime: &str, size_bytes: f64) -> Result<(), String> {
    let allowed = match field {
        UploadField::BusinessCertificate => {
            is_allowed_image(mime) || DOCUMENT_TYPES.contains(&mime)
        }
        _ => is_allowed_image(mime),
    };

    if !allowed {
        return Err(match field {
            UploadField::BusinessCertificate => {
                "Please select an image, PDF or Word document".to_string()
            }
            _ => "Please select a JPEG, PNG or WEBP image".to_string(),
        });
    }

    if size_bytes > MAX_UPLOAD_BYTES {
        return Err("File size must be less than 5MB".to_string());
    }

    Ok(())
}

/// Format a size in KB for display ("412.3 KB" / "1.2 MB").
pub fn format_file_size(size_kb: f64) -> String {
    if size_kb < 1024.0 {
        format!("{:.1} KB", size_kb)
    } else {
        format!("{:.1} MB", size_kb / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_fields_accept_the_image_allow_list() {
        for mime in ["image/jpeg", "image/jpg", "image/png", "image/webp"] {
            assert!(validate_upload(UploadField::ProfilePhoto, mime, 1024.0).is_ok());
            assert!(validate_upload(UploadField::IdCardFront, mime, 1024.0).is_ok());
        }
    }

    #[test]
    fn image_fields_reject_documents() {
        assert!(validate_upload(UploadField::ProfilePhoto, "application/pdf", 1024.0).is_err());
        assert!(validate_upload(UploadField::IdCardBack, "image/gif", 1024.0).is_err());
    }

    #[test]
    fn certificate_field_accepts_documents_and_images() {
        assert!(validate_upload(UploadField::BusinessCertificate, "application/pdf", 1024.0).is_ok());
        assert!(validate_upload(
            UploadField::BusinessCertificate,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            1024.0
        )
        .is_ok());
        assert!(validate_upload(UploadField::BusinessCertificate, "image/png", 1024.0).is_ok());
    }

    #[test]
    fn certificate_field_rejects_plain_text() {
        let err = validate_upload(UploadField::BusinessCertificate, "text/plain", 42.0)
            .expect_err("a .txt file must be rejected before compression");
        assert!(err.contains("image, PDF or Word"));
    }

    #[test]
    fn oversized_files_are_rejected() {
        assert!(validate_upload(UploadField::ProfilePhoto, "image/jpeg", MAX_UPLOAD_BYTES + 1.0).is_err());
        assert!(validate_upload(UploadField::ProfilePhoto, "image/jpeg", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn file_sizes_format_in_kb_and_mb() {
        assert_eq!(format_file_size(412.34), "412.3 KB");
        assert_eq!(format_file_size(2048.0), "2.0 MB");
    }
}
