use std::sync::OnceLock;
use tracing::info;

use super::config::{parse_switch, ScoutConfig, ENV_RENDERING};

/// Env vars whose mere presence marks a deployment sandbox without the OS
/// libraries a headless Chromium needs.
pub const STATIC_ONLY_MARKERS: &[&str] = &["SCOUT_STATIC_ONLY", "RENDER", "VERCEL", "SPACE_ID"];

/// Whether dynamic rendering is usable in this process.
///
/// Computed once (see [`RenderCapability::detect`]) and handed to the
/// dispatcher at construction. Tests build it directly with
/// [`RenderCapability::available`] / [`RenderCapability::unavailable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCapability {
    available: bool,
}

static DETECTED: OnceLock<RenderCapability> = OnceLock::new();

impl RenderCapability {
    pub const fn available() -> Self {
        Self { available: true }
    }

    pub const fn unavailable() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Process-wide capability, detected on first call and cached for the
    /// lifetime of the process.
    pub fn detect(config: &ScoutConfig) -> Self {
        *DETECTED.get_or_init(|| {
            let cap = Self::from_signals(
                |k| std::env::var(k).ok(),
                config.rendering,
                crate::scraping::browser_manager::native_browser_available,
            );
            info!(
                "Rendering capability: {}",
                if cap.available { "available" } else { "unavailable (static-only)" }
            );
            cap
        })
    }

    /// Pure decision over the environment signals.
    ///
    /// 1. `SCOUT_RENDERING` on/off wins.
    /// 2. Config-file `rendering` field.
    /// 3. Any static-only sandbox marker → unavailable.
    /// 4. Otherwise available iff a browser executable is discoverable.
    pub fn from_signals<E, B>(env: E, config_rendering: Option<bool>, browser_present: B) -> Self
    where
        E: Fn(&str) -> Option<String>,
        B: FnOnce() -> bool,
    {
        if let Some(forced) = env(ENV_RENDERING).and_then(|v| parse_switch(&v)) {
            return Self { available: forced };
        }
        if let Some(forced) = config_rendering {
            return Self { available: forced };
        }
        let sandboxed = STATIC_ONLY_MARKERS.iter().any(|k| {
            env(k)
                .map(|v| !v.trim().is_empty() && parse_switch(&v) != Some(false))
                .unwrap_or(false)
        });
        if sandboxed {
            return Self { available: false };
        }
        Self {
            available: browser_present(),
        }
    }
}
