use crate::core::types::{FetchRequest, FetchResult};
use crate::{AppState, ScoutResult};
use tracing::{debug, info};

/// Resolve the site for `request.url` and run the dispatcher.
///
/// A request for nothing (`max_reviews <= 0`) short-circuits before URL
/// validation and carries no site. Otherwise only request validation can
/// fail here (`InvalidUrl`, `UnsupportedSite`); every scraping fault is
/// already folded into the result.
pub async fn fetch_reviews(
    state: &AppState,
    request: &FetchRequest,
) -> ScoutResult<(Option<&'static str>, FetchResult)> {
    if request.limit().is_none() {
        debug!("max_reviews = {}; nothing to fetch", request.max_reviews);
        return Ok((None, FetchResult::not_requested()));
    }

    let adapter = state.sites.resolve(&request.url)?;
    info!(
        "Fetching up to {} {} reviews: {}",
        request.max_reviews,
        adapter.name(),
        request.url
    );

    let result = state
        .dispatcher
        .fetch_reviews(adapter.as_ref(), request)
        .await;

    info!(
        "{}: {} reviews via {}",
        adapter.name(),
        result.len(),
        result.mode.as_str()
    );
    Ok((Some(adapter.name()), result))
}
