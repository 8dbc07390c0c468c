/// Base URL of the backing REST API.
/// Configured at compile time:
/// - Default: production backend
/// - Override: API_BASE_URL env var (via .env, see build.rs)
pub const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "https://api.olapy.app/api/v1",
};

/// Login endpoint, relative to [`API_BASE_URL`].
pub const LOGIN_ENDPOINT: &str = "/accounts/login/";

/// Worker listing/creation endpoint, relative to [`API_BASE_URL`].
pub const WORKERS_ENDPOINT: &str = "/workers";
