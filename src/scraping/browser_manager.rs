//! Native browser management using `chromiumoxide`.
//!
//! This module is the single source of truth for:
//! * Finding a usable browser executable (Brave → Chrome → Chromium, cross-platform).
//! * Launching one isolated headless browser per fetch ([`ChromiumRenderer`]).
//! * Driving the page: DOM-content waits, control clicks, scroll-to-bottom.
//!
//! Browsers are never pooled. Every [`ChromiumSession`] owns its process and
//! releases it in `close()`, with `Drop` as a safety net for cancelled
//! futures and panics.

use super::render::{Control, Interaction, PageSession, Renderer, StepOutcome};
use crate::core::config::ScoutConfig;
use crate::features::antibot;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// ── Browser executable discovery ─────────────────────────────────────────────

const PATH_CANDIDATES: &[&str] = &[
    "brave-browser",
    "brave",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Find a usable Chromium-family browser executable.
///
/// Resolution order:
/// 1. `CHROME_EXECUTABLE` env var (explicit override)
/// 2. PATH lookup for the usual binary names.
/// 3. OS-specific well-known install paths.
pub fn find_chrome_executable() -> Option<String> {
    if let Some(p) = crate::core::config::chrome_executable_override() {
        return Some(p);
    }

    for exe in PATH_CANDIDATES {
        if let Ok(full) = which::which(exe) {
            return Some(full.to_string_lossy().to_string());
        }
    }

    #[cfg(target_os = "macos")]
    let candidates: &[&str] = &[
        "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];

    #[cfg(target_os = "linux")]
    let candidates: &[&str] = &[
        "/usr/bin/brave-browser",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/bin/google-chrome",
        "/usr/local/bin/chromium",
        "/snap/bin/chromium",
    ];

    #[cfg(target_os = "windows")]
    let candidates: &[&str] = &[
        r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe",
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let candidates: &[&str] = &[];

    candidates
        .iter()
        .find(|c| Path::new(c).exists())
        .map(|c| c.to_string())
}

/// Returns `true` when a usable browser binary is present on this machine.
pub fn native_browser_available() -> bool {
    find_chrome_executable().is_some()
}

// ── Headless browser config builder ──────────────────────────────────────────

/// Build a `BrowserConfig` for headless operation with stealth defaults.
///
/// `--no-sandbox` / `--disable-dev-shm-usage` keep Chromium alive in
/// containers; `--disable-blink-features=AutomationControlled` hides the
/// `navigator.webdriver` flag.
///
/// `request_timeout` bounds every CDP command, `goto` included. It must be
/// at least the navigation deadline or chromiumoxide's 30 s default wins.
pub fn build_headless_config(
    exe: &str,
    user_agent: &str,
    width: u32,
    height: u32,
    request_timeout: Duration,
) -> Result<BrowserConfig> {
    BrowserConfig::builder()
        .chrome_executable(exe)
        .request_timeout(request_timeout)
        .viewport(Viewport {
            width,
            height,
            device_scale_factor: Some(1.0),
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        })
        .window_size(width, height)
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-extensions")
        .arg("--disable-background-networking")
        .arg("--disable-sync")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--mute-audio")
        .arg("--disable-blink-features=AutomationControlled")
        .arg(format!("--user-agent={}", user_agent))
        .build()
        .map_err(|e| anyhow!("Failed to build browser config: {}", e))
}

// ── Page helpers ─────────────────────────────────────────────────────────────

/// Set on the current document just before a click; a document without it
/// is the one the click navigated to.
const CLICK_MARKER: &str = "__reviewScoutClicked";

/// DOM parsed on some page other than the `about:blank` the session starts on.
const TARGET_DOM_READY: &str =
    "location.href !== 'about:blank' && document.readyState !== 'loading'";

fn new_document_ready() -> String {
    format!(
        "!window.{} && document.readyState !== 'loading'",
        CLICK_MARKER
    )
}

/// Poll `condition` (a JS boolean expression) until it holds.
async fn wait_until(page: &Page, condition: &str, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    loop {
        let ready = page
            .evaluate(condition)
            .await
            .ok()
            .and_then(|v| v.into_value::<bool>().ok())
            .unwrap_or(false);

        if ready {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(anyhow!(
                "DOM content not loaded after {}ms",
                timeout.as_millis()
            ));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Wait until `document.readyState` leaves `loading`, i.e. the DOM has been
/// parsed. Does not wait for images, fonts or network idle.
pub async fn wait_for_dom_content(page: &Page, timeout: Duration) -> Result<()> {
    wait_until(page, "document.readyState !== 'loading'", timeout).await
}

/// Text matching mirrors `:has-text()`: case-insensitive, whitespace
/// collapsed and trimmed on both sides.
fn click_script(control: &Control) -> Result<String> {
    let selector = serde_json::to_string(control.selector)?;
    let text = serde_json::to_string(&control.text)?;
    Ok(format!(
        r#"(() => {{
    const norm = s => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
    const els = Array.from(document.querySelectorAll({selector}));
    const wanted = {text};
    const el = wanted === null ? els[0] : els.find(e => norm(e.textContent).includes(norm(wanted)));
    if (!el) return false;
    el.scrollIntoView({{ block: 'center' }});
    window.{marker} = true;
    el.click();
    return true;
}})()"#,
        marker = CLICK_MARKER
    ))
}

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight)); true";

// ── Renderer ─────────────────────────────────────────────────────────────────

/// Launches a fresh headless Chromium for every `open()`.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    navigation_timeout: Duration,
    settle: Duration,
    user_agent: Option<String>,
    viewport: (u32, u32),
}

impl ChromiumRenderer {
    pub fn new(
        navigation_timeout: Duration,
        settle: Duration,
        user_agent: Option<String>,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            navigation_timeout,
            settle,
            user_agent,
            viewport,
        }
    }

    pub fn from_config(config: &ScoutConfig) -> Self {
        Self::new(
            config.resolve_navigation_timeout(),
            config.resolve_settle(),
            config.resolve_user_agent(),
            config.resolve_viewport(),
        )
    }

    async fn navigate(&self, page: &Page, url: &str) -> Result<()> {
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            antibot::navigator_stealth_script(),
        ))
        .await
        .map_err(|e| anyhow!("Failed to inject stealth script: {}", e))?;

        // `goto` resolves on the load event; parsed DOM is enough, so
        // whichever finishes first ends navigation.
        let timeout = self.navigation_timeout;
        tokio::time::timeout(timeout, async {
            tokio::select! {
                r = page.goto(url) => r
                    .map(|_| ())
                    .map_err(|e| anyhow!("Failed to navigate: {}", e)),
                r = wait_until(page, TARGET_DOM_READY, timeout) => r,
            }
        })
        .await
        .map_err(|_| anyhow!("Navigation timeout after {}s: {}", timeout.as_secs(), url))??;

        tokio::time::sleep(self.settle).await;
        Ok(())
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>> {
        let exe = find_chrome_executable().ok_or_else(|| {
            anyhow!("No browser found. Install Brave, Chrome, or Chromium, or set CHROME_EXECUTABLE.")
        })?;
        let user_agent = antibot::user_agent_or_random(self.user_agent.as_deref());
        let (width, height) = self.viewport;

        info!("🌐 Headless render: {} (browser: {})", url, exe);
        let config =
            build_headless_config(&exe, &user_agent, width, height, self.navigation_timeout)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser ({}): {}", exe, e))?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        });

        // From here on the session owns the browser; any early return drops
        // it, and Drop releases the process.
        let mut session = ChromiumSession {
            browser: Some(browser),
            page: None,
            handler: Some(handle),
            navigation_timeout: self.navigation_timeout,
            settle: self.settle,
        };

        let page = match session.browser.as_ref() {
            Some(b) => b.new_page("about:blank").await,
            None => return Err(anyhow!("browser vanished before first page")),
        };
        let page = match page {
            Ok(p) => p,
            Err(e) => {
                session.close().await;
                return Err(anyhow!("Failed to create page: {}", e));
            }
        };

        if let Err(e) = self.navigate(&page, url).await {
            session.page = Some(page);
            session.close().await;
            return Err(e);
        }

        session.page = Some(page);
        Ok(Box::new(session))
    }
}

/// One browser process plus the page it was opened for.
pub struct ChromiumSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: Option<JoinHandle<()>>,
    navigation_timeout: Duration,
    settle: Duration,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page> {
        self.page.as_ref().ok_or_else(|| anyhow!("page already closed"))
    }

    async fn click(&self, control: &Control) -> StepOutcome {
        let page = match self.page() {
            Ok(p) => p,
            Err(e) => return StepOutcome::Failed(e.to_string()),
        };
        let script = match click_script(control) {
            Ok(s) => s,
            Err(e) => return StepOutcome::Failed(e.to_string()),
        };

        let clicked = match page.evaluate(script).await {
            Ok(v) => v.into_value::<bool>().unwrap_or(false),
            Err(e) => return StepOutcome::Failed(format!("click failed: {}", e)),
        };
        if !clicked {
            return StepOutcome::Absent;
        }

        // A navigating click ends when the new document is parsed or its
        // load completes; an in-place update has no pending navigation and
        // `wait_for_navigation` returns at once.
        let new_document = new_document_ready();
        let waited = tokio::time::timeout(self.navigation_timeout, async {
            tokio::select! {
                r = page.wait_for_navigation() => r
                    .map(|_| ())
                    .map_err(|e| anyhow!("navigation after click failed: {}", e)),
                r = wait_until(page, &new_document, self.navigation_timeout) => r,
            }
        })
        .await;
        match waited {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return StepOutcome::Failed(e.to_string()),
            Err(_) => {
                return StepOutcome::Failed(format!(
                    "navigation after click timed out after {}s",
                    self.navigation_timeout.as_secs()
                ))
            }
        }
        if let Err(e) = wait_for_dom_content(page, self.navigation_timeout).await {
            return StepOutcome::Failed(e.to_string());
        }
        tokio::time::sleep(self.settle).await;
        StepOutcome::Applied
    }

    async fn scroll_to_bottom(&self) -> StepOutcome {
        let page = match self.page() {
            Ok(p) => p,
            Err(e) => return StepOutcome::Failed(e.to_string()),
        };
        if let Err(e) = page.evaluate(SCROLL_TO_BOTTOM).await {
            return StepOutcome::Failed(format!("scroll failed: {}", e));
        }
        tokio::time::sleep(self.settle).await;
        StepOutcome::Applied
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn snapshot(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| anyhow!("Failed to get page content: {}", e))
    }

    async fn perform(&mut self, interaction: Interaction) -> StepOutcome {
        match interaction {
            Interaction::Click(control) => self.click(&control).await,
            Interaction::ScrollToBottom => self.scroll_to_bottom().await,
        }
    }

    async fn close(&mut self) {
        self.page.take();
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Browser close error (non-fatal): {}", e);
            }
            if tokio::time::timeout(Duration::from_secs(5), browser.wait())
                .await
                .is_err()
            {
                warn!("Browser did not exit within 5s; killing");
                let _ = browser.kill().await;
            }
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        debug!("Browser session released");
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        let handler = self.handler.take();
        let Some(mut browser) = self.browser.take() else {
            if let Some(h) = handler {
                h.abort();
            }
            return;
        };
        // Drop cannot await; hand the close to the runtime if there is one.
        // The CDP handler must keep running until the close command lands.
        // Without a runtime the child is killed by chromiumoxide's own Drop.
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    let _ = browser.close().await;
                    let _ = tokio::time::timeout(Duration::from_secs(5), browser.wait()).await;
                    if let Some(h) = handler {
                        h.abort();
                    }
                });
            }
            Err(_) => {
                if let Some(h) = handler {
                    h.abort();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_script_escapes_selector_and_text() {
        let script = click_script(&Control::with_text("a._1LKTO3", "Next")).unwrap();
        assert!(script.contains(r#"querySelectorAll("a._1LKTO3")"#));
        assert!(script.contains(r#"const wanted = "Next";"#));

        let script = click_script(&Control::new("a[data-hook='see-all-reviews-link-foot']")).unwrap();
        assert!(script.contains("const wanted = null;"));
    }

    #[test]
    fn click_text_match_ignores_case_and_spacing() {
        let script = click_script(&Control::with_text("a._1LKTO3", "Next")).unwrap();
        assert!(script.contains(r"replace(/\s+/g, ' ').trim().toLowerCase()"));
        assert!(script.contains("norm(e.textContent).includes(norm(wanted))"));
    }

    #[test]
    fn click_marks_the_document_it_leaves() {
        let script = click_script(&Control::new("a.more")).unwrap();
        let mark = script.find("window.__reviewScoutClicked = true;").unwrap();
        let click = script.find("el.click();").unwrap();
        assert!(mark < click);
        assert!(new_document_ready().starts_with("!window.__reviewScoutClicked &&"));
    }

    #[test]
    fn navigation_readiness_skips_the_blank_start_page() {
        assert!(TARGET_DOM_READY.contains("location.href !== 'about:blank'"));
        assert!(TARGET_DOM_READY.contains("document.readyState !== 'loading'"));
    }

    #[test]
    fn request_timeout_follows_navigation_deadline() {
        let renderer = ChromiumRenderer::from_config(&ScoutConfig {
            navigation_timeout_secs: Some(60),
            ..Default::default()
        });
        let config = build_headless_config(
            "/usr/bin/chromium",
            "Mozilla/5.0 test",
            1280,
            720,
            renderer.navigation_timeout,
        )
        .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("request_timeout: 60s"), "{}", debug);

        let config =
            build_headless_config("/usr/bin/chromium", "Mozilla/5.0 test", 1280, 720, Duration::from_secs(90))
                .unwrap();
        assert!(format!("{:?}", config).contains("request_timeout: 90s"));
    }
}
