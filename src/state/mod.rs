pub mod app_state;
pub mod auth_state;

pub use app_state::AppState;
pub use auth_state::AuthState;
