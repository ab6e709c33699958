pub mod app_state;
pub mod capability;
pub mod config;
pub mod error;
pub mod types;

pub use app_state::AppState;
pub use capability::RenderCapability;
pub use error::{ScoutError, ScoutResult};
