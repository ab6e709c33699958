use std::time::Duration;

// ---------------------------------------------------------------------------
// ScoutConfig: file-based config loader (review-scout.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "SCOUT_CONFIG";
pub const ENV_RENDERING: &str = "SCOUT_RENDERING";
pub const ENV_NAV_TIMEOUT_SECS: &str = "SCOUT_NAV_TIMEOUT_SECS";
pub const ENV_STATIC_TIMEOUT_SECS: &str = "SCOUT_STATIC_TIMEOUT_SECS";
pub const ENV_SETTLE_MS: &str = "SCOUT_SETTLE_MS";
pub const ENV_USER_AGENT: &str = "SCOUT_USER_AGENT";
pub const ENV_CHROME_EXECUTABLE: &str = "CHROME_EXECUTABLE";

const DEFAULT_NAV_TIMEOUT_SECS: u64 = 60;
const DEFAULT_STATIC_TIMEOUT_SECS: u64 = 20;
const DEFAULT_SETTLE_MS: u64 = 1000;
const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);

/// Top-level config loaded from `review-scout.json`.
///
/// Every field is optional. Resolution order for each knob is
/// JSON field → env var → built-in default.
#[derive(serde::Deserialize, Default, Clone, Debug)]
pub struct ScoutConfig {
    /// Force the rendering capability on (`true`) or off (`false`).
    /// Absent means "detect from the environment".
    pub rendering: Option<bool>,
    /// Ceiling for headless navigation (DOM content loaded). Default: 60.
    pub navigation_timeout_secs: Option<u64>,
    /// Timeout for the plain HTTP GET path. Default: 20.
    pub static_timeout_secs: Option<u64>,
    /// Pause after navigation and after every interaction. Default: 1000.
    pub settle_ms: Option<u64>,
    /// Pin a user agent instead of drawing from the built-in pool.
    pub user_agent: Option<String>,
    pub viewport_width: Option<u32>,
    pub viewport_height: Option<u32>,
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Parses the usual on/off spellings. Anything else is "unset".
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

impl ScoutConfig {
    pub fn resolve_navigation_timeout(&self) -> Duration {
        let secs = self
            .navigation_timeout_secs
            .or_else(|| env_u64(ENV_NAV_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_NAV_TIMEOUT_SECS);
        Duration::from_secs(secs.max(1))
    }

    pub fn resolve_static_timeout(&self) -> Duration {
        let secs = self
            .static_timeout_secs
            .or_else(|| env_u64(ENV_STATIC_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_STATIC_TIMEOUT_SECS);
        Duration::from_secs(secs.max(1))
    }

    pub fn resolve_settle(&self) -> Duration {
        let ms = self
            .settle_ms
            .or_else(|| env_u64(ENV_SETTLE_MS))
            .unwrap_or(DEFAULT_SETTLE_MS);
        Duration::from_millis(ms)
    }

    /// Pinned user agent: JSON field → `SCOUT_USER_AGENT` → `None` (random pool).
    pub fn resolve_user_agent(&self) -> Option<String> {
        if let Some(ua) = &self.user_agent {
            if !ua.trim().is_empty() {
                return Some(ua.trim().to_string());
            }
        }
        std::env::var(ENV_USER_AGENT)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn resolve_viewport(&self) -> (u32, u32) {
        (
            self.viewport_width.unwrap_or(DEFAULT_VIEWPORT.0).max(320),
            self.viewport_height.unwrap_or(DEFAULT_VIEWPORT.1).max(240),
        )
    }
}

/// Load `review-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `SCOUT_CONFIG` env var path
/// 2. `./review-scout.json`
/// 3. `../review-scout.json`
///
/// Missing file → `ScoutConfig::default()` (silent, all env-var fallbacks apply).
/// Parse error → log a warning, return `ScoutConfig::default()`.
pub fn load_scout_config() -> ScoutConfig {
    let mut candidates = vec![
        std::path::PathBuf::from("review-scout.json"),
        std::path::PathBuf::from("../review-scout.json"),
    ];
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        candidates.insert(0, std::path::PathBuf::from(env_path));
    }

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        return match parse_scout_config(&contents) {
            Ok(cfg) => {
                tracing::info!("review-scout.json loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!("{} at {}; using defaults", e, path.display());
                ScoutConfig::default()
            }
        };
    }

    ScoutConfig::default()
}

pub fn parse_scout_config(contents: &str) -> crate::ScoutResult<ScoutConfig> {
    serde_json::from_str::<ScoutConfig>(contents)
        .map_err(|e| crate::ScoutError::Config(format!("review-scout.json parse error: {}", e)))
}

/// Optional override for the Chromium-family browser executable.
///
/// Only returns a value when `CHROME_EXECUTABLE` is set to an existing path;
/// otherwise auto-discovery in `scraping::browser_manager` applies.
pub fn chrome_executable_override() -> Option<String> {
    let p = std::env::var(ENV_CHROME_EXECUTABLE).ok()?;
    let p = p.trim();
    if p.is_empty() || !std::path::Path::new(p).exists() {
        return None;
    }
    Some(p.to_string())
}
