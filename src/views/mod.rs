// ============================================================================
// VIEWS - Pure render functions, one file per screen or overlay
// ============================================================================

pub mod add_worker_modal;
pub mod app;
pub mod login;
pub mod status_banner;
pub mod worker_card;
pub mod worker_list;
pub mod worker_modal;

pub use app::render_app;
