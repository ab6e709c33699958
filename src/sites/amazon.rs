use super::{host_contains, Escalation, SiteAdapter};
use crate::scraping::extract::SelectorSet;
use crate::scraping::render::Control;
use crate::ScoutResult;
use url::Url;

const REVIEW_SELECTORS: &[&str] = &[
    "div[data-hook='review'] span[data-hook='review-body']",
    "span.review-text-content",
    "span.a-size-base.review-text",
];

/// Footer link on product pages that leads to the full review listing.
const SEE_ALL_REVIEWS: Control = Control::new("a[data-hook='see-all-reviews-link-foot']");

/// Site A: product page with a single "see all reviews" escalation.
pub struct AmazonAdapter {
    selectors: SelectorSet,
}

impl AmazonAdapter {
    pub fn new() -> ScoutResult<Self> {
        Ok(Self {
            selectors: SelectorSet::new(REVIEW_SELECTORS)?,
        })
    }
}

impl SiteAdapter for AmazonAdapter {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn matches(&self, url: &Url) -> bool {
        host_contains(url, "amazon.")
    }

    fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    fn escalation(&self) -> Escalation {
        Escalation::SingleMore {
            control: SEE_ALL_REVIEWS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::extract::extract;

    #[test]
    fn extracts_review_bodies_from_product_markup() {
        let html = r#"
        <div id="cm-cr-dp-review-list">
          <div data-hook="review">
            <span data-hook="review-title">Five stars</span>
            <span data-hook="review-body" class="a-size-base review-text review-text-content">
              <span>Battery lasts two full days, very happy.</span>
            </span>
          </div>
          <div data-hook="review">
            <span data-hook="review-body" class="a-size-base review-text">
              <span>Stopped charging after a week.</span>
            </span>
          </div>
          <span class="a-icon-alt">4.0</span>
        </div>"#;

        let adapter = AmazonAdapter::new().unwrap();
        assert_eq!(
            extract(html, adapter.selectors()),
            vec![
                "Battery lasts two full days, very happy.",
                "Stopped charging after a week."
            ]
        );
    }

    #[test]
    fn single_more_escalation() {
        let adapter = AmazonAdapter::new().unwrap();
        assert!(matches!(adapter.escalation(), Escalation::SingleMore { .. }));
        assert!(adapter.matches(&Url::parse("https://amazon.co.uk/dp/X").unwrap()));
    }
}
