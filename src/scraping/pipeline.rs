//! Per-site fetch pipelines: the rendered path with bounded escalation and the
//! static path. Both contain every backend fault and return whatever was
//! collected.

use super::extract::{extract, ReviewSet};
use super::render::{Interaction, PageSession, Renderer, StepOutcome};
use super::static_fetch::StaticFetcher;
use crate::features::antibot;
use crate::sites::{Escalation, SiteAdapter};
use tracing::{debug, info, warn};

/// Re-reads the page and merges what the selectors find. A failed snapshot
/// leaves `reviews` untouched.
async fn harvest(
    session: &mut dyn PageSession,
    adapter: &dyn SiteAdapter,
    reviews: &mut ReviewSet,
) -> Result<usize, String> {
    let html = session.snapshot().await.map_err(|e| e.to_string())?;
    if reviews.is_empty() {
        if let Some(reason) = antibot::detect_block_reason(&html) {
            warn!("{}: rendered page looks blocked ({})", adapter.name(), reason);
        }
    }
    Ok(reviews.merge(extract(&html, adapter.selectors())))
}

/// One escalation step: interact, then harvest. Only `Applied` steps are
/// followed by a re-read.
async fn escalate(
    session: &mut dyn PageSession,
    adapter: &dyn SiteAdapter,
    interaction: Interaction,
    reviews: &mut ReviewSet,
) -> StepOutcome {
    match session.perform(interaction).await {
        StepOutcome::Applied => match harvest(session, adapter, reviews).await {
            Ok(added) => {
                debug!("{}: {} → +{} reviews", adapter.name(), interaction, added);
                StepOutcome::Applied
            }
            Err(e) => {
                warn!("{}: snapshot after {} failed: {}", adapter.name(), interaction, e);
                StepOutcome::Failed(e)
            }
        },
        StepOutcome::Absent => {
            debug!("{}: {} skipped, control absent", adapter.name(), interaction);
            StepOutcome::Absent
        }
        StepOutcome::Failed(reason) => {
            warn!(
                "{}: {} failed, keeping prior results: {}",
                adapter.name(),
                interaction,
                reason
            );
            StepOutcome::Failed(reason)
        }
    }
}

/// Everything after navigation: initial read, site escalation, trailing
/// scroll. Each stage runs only while the request is under-filled.
async fn drive(
    session: &mut dyn PageSession,
    adapter: &dyn SiteAdapter,
    limit: usize,
    reviews: &mut ReviewSet,
) {
    if let Err(e) = harvest(session, adapter, reviews).await {
        warn!("{}: initial snapshot failed: {}", adapter.name(), e);
        return;
    }

    match adapter.escalation() {
        Escalation::SingleMore { control } => {
            if reviews.len() < limit {
                escalate(session, adapter, Interaction::Click(control), reviews).await;
            }
        }
        Escalation::Paginated { next, max_pages } => {
            let mut pages = 0u8;
            while reviews.len() < limit && pages < max_pages {
                pages += 1;
                if !escalate(session, adapter, Interaction::Click(next), reviews)
                    .await
                    .is_applied()
                {
                    break;
                }
            }
        }
    }

    if reviews.len() < limit {
        escalate(session, adapter, Interaction::ScrollToBottom, reviews).await;
    }
}

/// Rendered path. Opens one browser, drives it, always closes it.
pub async fn collect_rendered(
    renderer: &dyn Renderer,
    adapter: &dyn SiteAdapter,
    url: &str,
    limit: usize,
) -> Vec<String> {
    let mut session = match renderer.open(url).await {
        Ok(s) => s,
        Err(e) => {
            warn!("{}: render failed for {}: {}", adapter.name(), url, e);
            return Vec::new();
        }
    };

    let mut reviews = ReviewSet::new();
    drive(session.as_mut(), adapter, limit, &mut reviews).await;
    session.close().await;

    info!(
        "{}: rendered path collected {} reviews (limit {})",
        adapter.name(),
        reviews.len(),
        limit
    );
    reviews.into_truncated(limit)
}

/// Static path: one GET, one extraction.
pub async fn collect_static(
    fetcher: &dyn StaticFetcher,
    adapter: &dyn SiteAdapter,
    url: &str,
    limit: usize,
) -> Vec<String> {
    let html = fetcher.fetch(url).await;
    let mut reviews = ReviewSet::new();
    reviews.merge(extract(&html, adapter.selectors()));
    info!(
        "{}: static path collected {} reviews (limit {})",
        adapter.name(),
        reviews.len(),
        limit
    );
    reviews.into_truncated(limit)
}
