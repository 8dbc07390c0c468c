// ============================================================================
// API CLIENT - HTTP communication only (stateless)
// ============================================================================
// No business logic here. Every call returns Result<T, FetchError>; callers
// pattern-match and choose fallback data explicitly instead of relying on
// swallowed exceptions.
// ============================================================================

use gloo_net::http::{Request, Response};
use serde::Deserialize;
use web_sys::FormData;

use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::worker::Worker;
use crate::services::session::SessionService;
use crate::utils::constants::{API_BASE_URL, LOGIN_ENDPOINT, WORKERS_ENDPOINT};
use crate::utils::storage::LocalSessionStore;

/// Error taxonomy of the HTTP boundary. Display strings double as the
/// user-facing messages for form/banner text.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid phone number or password")]
    Unauthorized,
    #[error("User not found")]
    NotFound,
    #[error("Server error. Please try again later.")]
    Server(u16),
    #[error("Network error. Please check your connection.")]
    Network(String),
    #[error("Unexpected response from server")]
    Decode(String),
    #[error("{0}")]
    Api(String),
}

impl FetchError {
    /// True when no response was received at all, i.e. the mock/fallback
    /// path applies.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }
}

/// Envelope shapes the worker listing has been observed to return.
#[derive(Deserialize)]
#[serde(untagged)]
enum WorkersEnvelope {
    Paginated { results: Vec<Worker> },
    Wrapped { data: Vec<Worker> },
    Bare(Vec<Worker>),
}

impl WorkersEnvelope {
    fn into_workers(self) -> Vec<Worker> {
        match self {
            WorkersEnvelope::Paginated { results } => results,
            WorkersEnvelope::Wrapped { data } => data,
            WorkersEnvelope::Bare(workers) => workers,
        }
    }
}

/// Body shape of backend error responses.
#[derive(Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// POST /accounts/login/ with a credential pair.
    pub async fn login(&self, phone: &str, password: &str) -> Result<LoginResponse, FetchError> {
        let url = format!("{}{}", self.base_url, LOGIN_ENDPOINT);
        let body = LoginRequest {
            phone: phone.to_string(),
            password: password.to_string(),
        };

        log::info!("🔐 [API] Login request for {}", phone);

        let response = Request::post(&url)
            .json(&body)
            .map_err(|e| FetchError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(classify_error(response).await);
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// GET /workers. Tolerates the paginated, wrapped and bare list shapes.
    pub async fn get_workers(&self, token: Option<&str>) -> Result<Vec<Worker>, FetchError> {
        let url = format!("{}{}", self.base_url, WORKERS_ENDPOINT);

        let mut request = Request::get(&url);
        if let Some(token) = token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if response.status() == 401 {
            handle_unauthorized();
            return Err(FetchError::Unauthorized);
        }
        if !response.ok() {
            return Err(classify_error(response).await);
        }

        let workers = response
            .json::<WorkersEnvelope>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?
            .into_workers();

        log::info!("✅ [API] Loaded {} workers", workers.len());
        Ok(workers)
    }

    /// POST /workers as multipart form-data (used when file attachments are
    /// included: photo, business certificate, ID card front/back).
    pub async fn create_worker(
        &self,
        token: Option<&str>,
        form: &FormData,
    ) -> Result<Worker, FetchError> {
        let url = format!("{}{}", self.base_url, WORKERS_ENDPOINT);

        let mut request = Request::post(&url);
        if let Some(token) = token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request
            .body(form.clone())
            .map_err(|e| FetchError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if response.status() == 401 {
            handle_unauthorized();
            return Err(FetchError::Unauthorized);
        }
        if !response.ok() {
            return Err(classify_error(response).await);
        }

        response
            .json::<Worker>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a non-OK response onto the error taxonomy, pulling the backend's
/// message out of the body when there is one.
async fn classify_error(response: Response) -> FetchError {
    let status = response.status();
    match status {
        401 => FetchError::Unauthorized,
        404 => FetchError::NotFound,
        s if s >= 500 => FetchError::Server(s),
        _ => {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .message
                .or(body.error)
                .unwrap_or_else(|| format!("Request failed ({})", status));
            FetchError::Api(message)
        }
    }
}

/// Server said the credential is no longer valid: clear the stored session
/// artifacts and send the user back to the login entry point. Safe to hit
/// from several failing requests at once.
fn handle_unauthorized() {
    SessionService::new(LocalSessionStore).on_unauthorized();
    redirect_to_login();
}

pub fn redirect_to_login() {
    if let Some(window) = web_sys::window() {
        if window.location().set_href("/").is_err() {
            log::error!("❌ [API] Failed to redirect to login");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_envelope_accepts_all_observed_shapes() {
        let worker = serde_json::json!({
            "id": "w1",
            "first_name": "John",
            "last_name": "Smith",
            "email": "john@email.com",
            "phone": "+233 24 123 4567",
            "primary_profession": "Electrician"
        });

        for body in [
            serde_json::json!({ "results": [worker.clone()] }),
            serde_json::json!({ "data": [worker.clone()] }),
            serde_json::json!([worker]),
        ] {
            let parsed: WorkersEnvelope =
                serde_json::from_value(body).expect("envelope should parse");
            assert_eq!(parsed.into_workers().len(), 1);
        }
    }

    #[test]
    fn missing_optional_worker_fields_take_defaults() {
        let parsed: Worker = serde_json::from_value(serde_json::json!({
            "id": "w1",
            "first_name": "John",
            "last_name": "Smith",
            "email": "john@email.com",
            "phone": "+233",
            "primary_profession": "Electrician"
        }))
        .unwrap();
        assert_eq!(parsed.rating, 0.0);
        assert!(!parsed.is_online);
        assert!(parsed.profile_photo.is_none());
    }

    #[test]
    fn network_errors_are_distinguished_for_fallback() {
        assert!(FetchError::Network("failed to fetch".to_string()).is_network());
        assert!(!FetchError::Unauthorized.is_network());
        assert!(!FetchError::Server(503).is_network());
    }

    #[test]
    fn error_messages_match_the_banner_text() {
        assert_eq!(
            FetchError::Unauthorized.to_string(),
            "Invalid phone number or password"
        );
        assert_eq!(
            FetchError::Server(503).to_string(),
            "Server error. Please try again later."
        );
        assert_eq!(
            FetchError::Network("x".to_string()).to_string(),
            "Network error. Please check your connection."
        );
    }

    #[test]
    fn base_url_override_is_used() {
        let client = ApiClient::with_base_url("http://localhost:8000/api/v1");
        assert_eq!(client.base_url, "http://localhost:8000/api/v1");
    }
}
