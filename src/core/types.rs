use serde::{Deserialize, Serialize};

/// Reviews shorter than this (in chars, after trimming) are icons, star
/// labels or button captions, not reviews.
pub const MIN_REVIEW_CHARS: usize = 6;

fn default_max_reviews() -> i64 {
    50
}

/// One fetch: where to look and how many reviews the caller wants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    pub url: String,
    #[serde(default = "default_max_reviews")]
    pub max_reviews: i64,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, max_reviews: i64) -> Self {
        Self {
            url: url.into(),
            max_reviews,
        }
    }

    /// `None` when the request asks for nothing (`max_reviews <= 0`).
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.max_reviews).ok().filter(|n| *n > 0)
    }
}

/// The path that actually produced a [`FetchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    Render,
    Static,
    /// `max_reviews <= 0`: no backend was touched.
    NotRequested,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Render => "render",
            FetchMode::Static => "static",
            FetchMode::NotRequested => "not_requested",
        }
    }
}

/// Raw review strings in first-discovery order, never longer than the
/// requested maximum. Possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub reviews: Vec<String>,
    pub mode: FetchMode,
}

impl FetchResult {
    pub fn not_requested() -> Self {
        Self {
            reviews: Vec::new(),
            mode: FetchMode::NotRequested,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub mode: FetchMode,
    pub total: usize,
    pub reviews: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
