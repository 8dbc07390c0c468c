// Services - API communication, session lifecycle, file compression

pub mod api_client;
pub mod compressor;
pub mod mock;
pub mod session;

pub use api_client::{ApiClient, FetchError};
pub use compressor::{compress_image, CompressError, CompressedUpload};
pub use session::{SessionPhase, SessionService, SessionStore};
