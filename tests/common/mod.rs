#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use review_scout::core::config::ScoutConfig;
use review_scout::scraping::{Interaction, PageSession, Renderer, StaticFetcher, StepOutcome};
use review_scout::sites::SiteRegistry;
use review_scout::{AppState, Dispatcher, RenderCapability};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct Counters {
    pub opens: AtomicUsize,
    pub snapshots: AtomicUsize,
    pub clicks: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub closes: AtomicUsize,
    pub static_fetches: AtomicUsize,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn amazon_page(reviews: &[&str]) -> String {
    let body: String = reviews
        .iter()
        .map(|r| {
            format!(
                "<div data-hook=\"review\"><span data-hook=\"review-body\"><span>{}</span></span></div>",
                r
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", body)
}

pub fn flipkart_page(reviews: &[&str]) -> String {
    let body: String = reviews
        .iter()
        .map(|r| format!("<div class=\"_6K-7Co\">{}</div>", r))
        .collect();
    format!("<html><body>{}</body></html>", body)
}

/// Page states in order: index 0 after navigation, each applied interaction
/// advances one state (clamped to the last).
pub struct ScriptedRenderer {
    pub pages: Vec<String>,
    pub click_outcomes: Mutex<VecDeque<StepOutcome>>,
    pub fail_open: bool,
    pub fail_snapshot: bool,
    pub counters: Arc<Counters>,
}

impl ScriptedRenderer {
    pub fn new(pages: Vec<String>, counters: Arc<Counters>) -> Self {
        Self {
            pages,
            click_outcomes: Mutex::new(VecDeque::new()),
            fail_open: false,
            fail_snapshot: false,
            counters,
        }
    }

    /// Outcomes for successive clicks; once exhausted every click applies.
    pub fn with_click_outcomes(self, outcomes: Vec<StepOutcome>) -> Self {
        *self.click_outcomes.lock().unwrap() = outcomes.into();
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_snapshot(mut self) -> Self {
        self.fail_snapshot = true;
        self
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn open(&self, _url: &str) -> Result<Box<dyn PageSession>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(anyhow!("navigation timed out"));
        }
        let outcomes = self.click_outcomes.lock().unwrap().clone();
        Ok(Box::new(ScriptedSession {
            pages: self.pages.clone(),
            stage: 0,
            click_outcomes: outcomes,
            fail_snapshot: self.fail_snapshot,
            closed: false,
            counters: self.counters.clone(),
        }))
    }
}

struct ScriptedSession {
    pages: Vec<String>,
    stage: usize,
    click_outcomes: VecDeque<StepOutcome>,
    fail_snapshot: bool,
    closed: bool,
    counters: Arc<Counters>,
}

#[async_trait]
impl PageSession for ScriptedSession {
    async fn snapshot(&mut self) -> Result<String> {
        self.counters.snapshots.fetch_add(1, Ordering::SeqCst);
        if self.fail_snapshot {
            return Err(anyhow!("target closed"));
        }
        let idx = self.stage.min(self.pages.len().saturating_sub(1));
        Ok(self.pages.get(idx).cloned().unwrap_or_default())
    }

    async fn perform(&mut self, interaction: Interaction) -> StepOutcome {
        let outcome = match interaction {
            Interaction::Click(_) => {
                self.counters.clicks.fetch_add(1, Ordering::SeqCst);
                self.click_outcomes
                    .pop_front()
                    .unwrap_or(StepOutcome::Applied)
            }
            Interaction::ScrollToBottom => {
                self.counters.scrolls.fetch_add(1, Ordering::SeqCst);
                StepOutcome::Applied
            }
        };
        if outcome.is_applied() {
            self.stage += 1;
        }
        outcome
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

pub struct CannedFetcher {
    pub html: String,
    pub counters: Arc<Counters>,
}

#[async_trait]
impl StaticFetcher for CannedFetcher {
    async fn fetch(&self, _url: &str) -> String {
        self.counters.static_fetches.fetch_add(1, Ordering::SeqCst);
        self.html.clone()
    }
}

pub fn dispatcher(
    available: bool,
    renderer: ScriptedRenderer,
    static_html: String,
    counters: Arc<Counters>,
) -> Dispatcher {
    let capability = if available {
        RenderCapability::available()
    } else {
        RenderCapability::unavailable()
    };
    Dispatcher::new(
        capability,
        Arc::new(renderer),
        Arc::new(CannedFetcher {
            html: static_html,
            counters,
        }),
    )
}

pub fn app_state(dispatcher: Dispatcher) -> Arc<AppState> {
    Arc::new(AppState::new(
        SiteRegistry::with_defaults().unwrap(),
        dispatcher,
        ScoutConfig::default(),
    ))
}
