//! Rendering backend seam.
//!
//! A [`Renderer`] opens one isolated page session per call; the session is
//! driven step by step by the site pipeline so escalation can stop as soon as
//! enough reviews are collected.

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// A clickable page control: a CSS selector, optionally narrowed to elements
/// whose text contains `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub selector: &'static str,
    pub text: Option<&'static str>,
}

impl Control {
    pub const fn new(selector: &'static str) -> Self {
        Self {
            selector,
            text: None,
        }
    }

    pub const fn with_text(selector: &'static str, text: &'static str) -> Self {
        Self {
            selector,
            text: Some(text),
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text {
            Some(t) => write!(f, "{} containing '{}'", self.selector, t),
            None => write!(f, "{}", self.selector),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Click the first element matching the control, then wait for the DOM.
    Click(Control),
    /// One jump to the bottom of the document to trigger lazy loading.
    ScrollToBottom,
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interaction::Click(c) => write!(f, "click {}", c),
            Interaction::ScrollToBottom => write!(f, "scroll to bottom"),
        }
    }
}

/// Result of one escalation step. `Absent` and `Failed` both mean "keep what
/// was already collected"; they differ only in what gets logged and whether
/// a paginated loop may continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Absent,
    Failed(String),
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied)
    }
}

/// A live page in its own browser instance.
#[async_trait]
pub trait PageSession: Send {
    /// Current rendered HTML.
    async fn snapshot(&mut self) -> Result<String>;

    /// Performs an interaction and waits for the page to settle.
    async fn perform(&mut self, interaction: Interaction) -> StepOutcome;

    /// Releases the browser. Must be called on every exit path; calling it
    /// twice is a no-op.
    async fn close(&mut self);
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Launches a browser and navigates to `url`, waiting for DOM content
    /// under the navigation deadline. The browser is already released when
    /// this returns an error.
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>>;
}
