use super::{host_contains, Escalation, SiteAdapter};
use crate::scraping::extract::SelectorSet;
use crate::scraping::render::Control;
use crate::ScoutResult;
use url::Url;

const REVIEW_SELECTORS: &[&str] = &[
    // review text block
    "div._6K-7Co",
    // expanded text
    "div.t-ZTKy div div",
];

const NEXT_PAGE: Control = Control::with_text("a._1LKTO3", "Next");
const MAX_PAGES: u8 = 3;

/// Site B: paginated review listing.
pub struct FlipkartAdapter {
    selectors: SelectorSet,
}

impl FlipkartAdapter {
    pub fn new() -> ScoutResult<Self> {
        Ok(Self {
            selectors: SelectorSet::new(REVIEW_SELECTORS)?,
        })
    }
}

impl SiteAdapter for FlipkartAdapter {
    fn name(&self) -> &'static str {
        "flipkart"
    }

    fn matches(&self, url: &Url) -> bool {
        host_contains(url, "flipkart.")
    }

    fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    fn escalation(&self) -> Escalation {
        Escalation::Paginated {
            next: NEXT_PAGE,
            max_pages: MAX_PAGES,
        }
    }
}
