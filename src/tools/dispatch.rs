//! Environment-aware strategy selection.
//!
//! ```text
//!   capability? ──no──────────────────────────────► STATIC_MODE
//!       │yes                                           ▲
//!       ▼                                              │
//!   RENDER_MODE ── rendered path yields 0 reviews ─────┘
//! ```
//!
//! There is no way back from STATIC_MODE within one call, and the static
//! backend is hit at most once.

use crate::core::types::{FetchMode, FetchRequest, FetchResult};
use crate::core::RenderCapability;
use crate::scraping::pipeline::{collect_rendered, collect_static};
use crate::scraping::render::Renderer;
use crate::scraping::static_fetch::StaticFetcher;
use crate::sites::SiteAdapter;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Dispatcher {
    capability: RenderCapability,
    renderer: Arc<dyn Renderer>,
    fetcher: Arc<dyn StaticFetcher>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("rendering", &self.capability.is_available())
            .finish()
    }
}

impl Dispatcher {
    pub fn new(
        capability: RenderCapability,
        renderer: Arc<dyn Renderer>,
        fetcher: Arc<dyn StaticFetcher>,
    ) -> Self {
        Self {
            capability,
            renderer,
            fetcher,
        }
    }

    pub fn capability(&self) -> RenderCapability {
        self.capability
    }

    /// Best-effort review list for one page. Never fails; an empty result
    /// means both permitted paths came back empty.
    pub async fn fetch_reviews(
        &self,
        adapter: &dyn SiteAdapter,
        request: &FetchRequest,
    ) -> FetchResult {
        let Some(limit) = request.limit() else {
            return FetchResult::not_requested();
        };

        if self.capability.is_available() {
            let reviews =
                collect_rendered(self.renderer.as_ref(), adapter, &request.url, limit).await;
            if !reviews.is_empty() {
                return FetchResult {
                    reviews,
                    mode: FetchMode::Render,
                };
            }
            info!(
                "{}: rendered path empty, falling back to static fetch",
                adapter.name()
            );
        } else {
            info!("{}: rendering unavailable, using static fetch", adapter.name());
        }

        FetchResult {
            reviews: collect_static(self.fetcher.as_ref(), adapter, &request.url, limit).await,
            mode: FetchMode::Static,
        }
    }
}
