use thiserror::Error;

/// Errors that escape the scraper core.
///
/// Backend faults (timeouts, blocked pages, detached elements) never show up
/// here; they are contained inside the pipelines and surface as empty or
/// partial results. What remains are configuration and request-validation
/// problems.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("unsupported site '{0}'. Currently supports Amazon & Flipkart.")]
    UnsupportedSite(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ScoutResult<T> = std::result::Result<T, ScoutError>;
