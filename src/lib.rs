pub mod core;
pub mod features;
pub mod http;
pub mod scraping;
pub mod sites;
pub mod tools;

// --- Primary core exports ---
pub use core::types;
pub use core::types::*;
pub use core::{AppState, RenderCapability, ScoutError, ScoutResult};

pub use features::antibot;
pub use tools::{fetch_reviews, Dispatcher};
