//! Selector-driven review text extraction.
//!
//! Selectors are alternatives, not partitions: a node matched by two
//! selectors, or two nodes with identical text, yield one fragment.

use crate::core::types::MIN_REVIEW_CHARS;
use crate::{ScoutError, ScoutResult};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Ordered, pre-compiled selector list owned by one site adapter.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    compiled: Vec<Selector>,
}

impl SelectorSet {
    /// Compiles every selector up front so a typo fails at startup, not
    /// on the first request.
    pub fn new(selectors: &[&'static str]) -> ScoutResult<Self> {
        let compiled = selectors
            .iter()
            .map(|s| {
                Selector::parse(s).map_err(|e| ScoutError::InvalidSelector {
                    selector: s.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<ScoutResult<Vec<_>>>()?;

        Ok(Self { compiled })
    }

    fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.compiled.iter()
    }
}

/// Visible text of an element: descendant text nodes joined, whitespace runs
/// collapsed to single spaces, edges trimmed.
fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_review_sized(text: &str) -> bool {
    text.chars().count() >= MIN_REVIEW_CHARS
}

/// Extract candidate review fragments from `html`.
///
/// Never fails: html5ever builds a best-effort tree from any input,
/// including the empty string. Output is deduplicated by exact string
/// equality and keeps first-discovery order.
pub fn extract(html: &str, selectors: &SelectorSet) -> Vec<String> {
    let mut reviews = ReviewSet::new();
    if html.trim().is_empty() {
        return reviews.into_vec();
    }

    let document = Html::parse_document(html);
    for selector in selectors.iter() {
        for element in document.select(selector) {
            reviews.insert(element_text(element));
        }
    }
    reviews.into_vec()
}

/// Ordered, deduplicating accumulator for fragments discovered across
/// several snapshots of the same page.
#[derive(Debug, Default, Clone)]
pub struct ReviewSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl ReviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `text` if it is review-sized and unseen. Returns whether it was added.
    pub fn insert(&mut self, text: String) -> bool {
        if !is_review_sized(&text) || self.seen.contains(&text) {
            return false;
        }
        self.seen.insert(text.clone());
        self.ordered.push(text);
        true
    }

    /// Union-merge; returns how many new fragments were added.
    pub fn merge<I>(&mut self, fragments: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        fragments
            .into_iter()
            .filter(|f| self.insert(f.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }

    /// Insertion-order truncation, not a ranking.
    pub fn into_truncated(self, limit: usize) -> Vec<String> {
        let mut out = self.ordered;
        out.truncate(limit);
        out
    }
}
