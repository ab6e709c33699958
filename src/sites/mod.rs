pub mod amazon;
pub mod flipkart;

use crate::scraping::extract::SelectorSet;
use crate::scraping::render::Control;
use crate::{ScoutError, ScoutResult};
use std::sync::Arc;
use url::Url;

pub use amazon::AmazonAdapter;
pub use flipkart::FlipkartAdapter;

/// How a site reveals more reviews once the first render is under-filled.
/// Both variants end with a single scroll-to-bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// One "see all / show more" click.
    SingleMore { control: Control },
    /// Repeated "next page" clicks, at most `max_pages` of them.
    Paginated { next: Control, max_pages: u8 },
}

/// Per-site strategy: which nodes hold review text and how to get more of them.
pub trait SiteAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, url: &Url) -> bool;

    fn selectors(&self) -> &SelectorSet;

    fn escalation(&self) -> Escalation;
}

/// `true` when any host label sequence contains `needle` (e.g. `amazon.`),
/// so `www.amazon.in` and `amazon.co.uk` both match.
pub(crate) fn host_contains(url: &Url, needle: &str) -> bool {
    url.host_str()
        .map(|h| h.to_ascii_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Picks the adapter for a URL.
#[derive(Clone)]
pub struct SiteRegistry {
    adapters: Vec<Arc<dyn SiteAdapter>>,
}

impl SiteRegistry {
    pub fn new(adapters: Vec<Arc<dyn SiteAdapter>>) -> Self {
        Self { adapters }
    }

    /// Amazon and Flipkart. Fails only if a built-in selector is malformed.
    pub fn with_defaults() -> ScoutResult<Self> {
        Ok(Self::new(vec![
            Arc::new(AmazonAdapter::new()?),
            Arc::new(FlipkartAdapter::new()?),
        ]))
    }

    pub fn resolve(&self, raw_url: &str) -> ScoutResult<Arc<dyn SiteAdapter>> {
        let url = Url::parse(raw_url.trim())
            .map_err(|_| ScoutError::InvalidUrl(raw_url.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ScoutError::InvalidUrl(raw_url.to_string()));
        }

        self.adapters
            .iter()
            .find(|a| a.matches(&url))
            .cloned()
            .ok_or_else(|| ScoutError::UnsupportedSite(raw_url.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }
}
