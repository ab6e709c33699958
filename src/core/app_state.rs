use super::config::ScoutConfig;
use super::{RenderCapability, ScoutError, ScoutResult};
use crate::scraping::browser_manager::ChromiumRenderer;
use crate::scraping::static_fetch::HttpFetcher;
use crate::sites::SiteRegistry;
use crate::tools::dispatch::Dispatcher;
use std::sync::Arc;

/// Everything a request handler needs. Cheap to clone; holds no per-request
/// state, so concurrent fetches never contend on it.
#[derive(Clone)]
pub struct AppState {
    pub sites: SiteRegistry,
    pub dispatcher: Dispatcher,
    pub config: Arc<ScoutConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sites", &self.sites.names())
            .field("rendering", &self.dispatcher.capability().is_available())
            .finish()
    }
}

impl AppState {
    pub fn new(sites: SiteRegistry, dispatcher: Dispatcher, config: ScoutConfig) -> Self {
        Self {
            sites,
            dispatcher,
            config: Arc::new(config),
        }
    }

    /// Production wiring: Chromium renderer, reqwest fetcher, built-in sites,
    /// capability detected once from the environment.
    pub fn from_config(config: ScoutConfig) -> ScoutResult<Self> {
        let capability = RenderCapability::detect(&config);
        let renderer = Arc::new(ChromiumRenderer::from_config(&config));
        let fetcher = Arc::new(
            HttpFetcher::from_config(&config).map_err(|e| ScoutError::Config(e.to_string()))?,
        );
        let dispatcher = Dispatcher::new(capability, renderer, fetcher);
        Ok(Self::new(SiteRegistry::with_defaults()?, dispatcher, config))
    }

    pub fn rendering_available(&self) -> bool {
        self.dispatcher.capability().is_available()
    }
}
