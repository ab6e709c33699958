//! Anti-bot countermeasures shared by both fetch paths: user-agent rotation,
//! browser-like request headers, a navigator hardening script for the
//! headless path, and block-page detection for diagnostics.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use rand::seq::IndexedRandom;
use std::sync::OnceLock;

/// Desktop-only: mobile agents get served a different review markup that the
/// site selectors don't cover.
pub const USER_AGENTS: &[&str] = &[
    // Chrome – Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36",
    // Chrome – macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    // Chrome – Linux
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    // Edge – Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// Returns a randomly-chosen realistic desktop User-Agent string.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}

/// The pinned agent when one is configured, otherwise a random pool entry.
pub fn user_agent_or_random(pinned: Option<&str>) -> String {
    match pinned {
        Some(ua) if !ua.trim().is_empty() => ua.trim().to_string(),
        _ => random_user_agent().to_string(),
    }
}

/// Additional headers a real browser sends on a top-level navigation.
pub fn get_stealth_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.9"),
        ("DNT", "1"),
        ("Upgrade-Insecure-Requests", "1"),
        ("Sec-Fetch-Dest", "document"),
        ("Sec-Fetch-Mode", "navigate"),
        ("Sec-Fetch-Site", "none"),
        ("Cache-Control", "max-age=0"),
    ]
}

/// Injected before any page script runs. Hides the usual headless tells.
pub fn navigator_stealth_script() -> &'static str {
    r#"
(() => {
    const proto = Navigator.prototype;
    try { Object.defineProperty(proto, 'webdriver', { get: () => undefined, configurable: true }); } catch (e) {}
    try { Object.defineProperty(proto, 'languages', { get: () => ['en-US', 'en'], configurable: true }); } catch (e) {}
    try { Object.defineProperty(proto, 'plugins', { get: () => [1, 2, 3, 4, 5], configurable: true }); } catch (e) {}
    if (!window.chrome) {
        try { window.chrome = { runtime: {} }; } catch (e) {}
    }
    const query = window.navigator.permissions && window.navigator.permissions.query;
    if (query) {
        window.navigator.permissions.query = (p) =>
            p && p.name === 'notifications'
                ? Promise.resolve({ state: Notification.permission })
                : query.call(window.navigator.permissions, p);
    }
})();
"#
}

// ── Block-page detection ─────────────────────────────────────────────────────

const BLOCK_SIGNATURES: &[(&str, &str)] = &[
    ("enter the characters you see below", "robot_check"),
    ("sorry, we just need to make sure you're not a robot", "robot_check"),
    ("/errors/validatecaptcha", "captcha"),
    ("captcha", "captcha"),
    ("verify you are human", "captcha"),
    ("access denied", "access_denied"),
    ("unusual traffic", "unusual_traffic"),
    ("are you a human", "captcha"),
];

static BLOCK_MATCHER: OnceLock<AhoCorasick> = OnceLock::new();

fn block_matcher() -> &'static AhoCorasick {
    BLOCK_MATCHER.get_or_init(|| {
        let needles: Vec<&str> = BLOCK_SIGNATURES.iter().map(|(n, _)| *n).collect();
        AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(needles)
            .expect("valid block-page signatures")
    })
}

/// Label of the first bot-wall signature found in `html`, if any.
///
/// Only used for logging: a blocked page simply extracts zero reviews and
/// the normal fallback rules apply.
pub fn detect_block_reason(html: &str) -> Option<&'static str> {
    block_matcher()
        .find(html)
        .map(|m| BLOCK_SIGNATURES[m.pattern().as_usize()].1)
}
