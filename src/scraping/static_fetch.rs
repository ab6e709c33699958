//! Plain HTTP GET path. No script execution, so "load more" and pagination
//! content is out of reach here; callers accept that degradation.

use crate::core::config::ScoutConfig;
use crate::features::antibot;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

#[async_trait]
pub trait StaticFetcher: Send + Sync {
    /// Raw HTML of `url`, or an empty string on any failure.
    async fn fetch(&self, url: &str) -> String;
}

pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    user_agent: Option<String>,
}

impl HttpFetcher {
    pub fn new(client: Client, timeout: Duration, user_agent: Option<String>) -> Self {
        Self {
            client,
            timeout,
            user_agent,
        }
    }

    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let timeout = config.resolve_static_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self::new(client, timeout, config.resolve_user_agent()))
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let user_agent = antibot::user_agent_or_random(self.user_agent.as_deref());
        let mut request = self
            .client
            .get(url)
            .header("User-Agent", user_agent)
            .timeout(self.timeout);
        for (name, value) in antibot::get_stealth_headers() {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch URL: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {}", status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))
    }
}

#[async_trait]
impl StaticFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> String {
        info!("📄 Static fetch: {}", url);
        match self.try_fetch(url).await {
            Ok(html) => {
                if let Some(reason) = antibot::detect_block_reason(&html) {
                    warn!("Static fetch of {} looks blocked ({})", url, reason);
                }
                html
            }
            Err(e) => {
                warn!("Static fetch failed for {}: {}", url, e);
                String::new()
            }
        }
    }
}
