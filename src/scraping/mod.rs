pub mod browser_manager;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod static_fetch;

pub use extract::{extract, ReviewSet, SelectorSet};
pub use render::{Control, Interaction, PageSession, Renderer, StepOutcome};
pub use static_fetch::{HttpFetcher, StaticFetcher};
