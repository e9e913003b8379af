use scrollback_core::{HarvestOutcome, HarvestedItem, SelectorProfile};
use url::Url;

use crate::classify::ElementClassifier;
use crate::page::{PageDriver, PageError};
use crate::sanitize;

/// Scroll offsets at or below this count as the top boundary.
const TOP_EPSILON_PX: f64 = 2.0;

/// One harvest pass over the currently mounted items.
///
/// Placeholders are dropped, unclassifiable nodes are skipped with a log
/// line (a single bad node never aborts the pass), and surviving items are
/// sanitized into self-contained snapshots. The pass also assesses whether
/// the top boundary is in view and captures the origin header when it is.
pub async fn harvest_pass(
    page: &dyn PageDriver,
    profile: &SelectorProfile,
    classifier: &ElementClassifier,
    capture_ms: i128,
) -> Result<HarvestOutcome, PageError> {
    let base = match page.base_url().await {
        Ok(raw) => Url::parse(&raw).ok(),
        Err(PageError::DocumentGone(reason)) => return Err(PageError::DocumentGone(reason)),
        Err(_) => None,
    };

    let raw = page.visible_items(&profile.items).await?;
    let mut items = Vec::with_capacity(raw.len());
    for candidate in &raw {
        match classifier.classify(&candidate.outer_html, candidate.index, capture_ms) {
            Ok(c) if c.placeholder => {
                engine_logging::engine_trace!("skipping placeholder at index {}", candidate.index);
            }
            Ok(c) => {
                let html = sanitize::sanitize_fragment(&candidate.outer_html, base.as_ref());
                items.push(HarvestedItem {
                    key: c.key,
                    order: c.order,
                    html,
                });
            }
            Err(err) => {
                engine_logging::engine_warn!("skipping node at index {}: {err}", candidate.index);
            }
        }
    }

    let metrics = page.scroll_metrics().await?;
    let text = page.container_text().await?.to_lowercase();
    let boundary_seen = profile
        .boundary_markers
        .iter()
        .any(|marker| text.contains(&marker.to_lowercase()));
    let at_top = metrics.scroll_top <= TOP_EPSILON_PX || boundary_seen;

    let header_html = if at_top {
        page.header_html().await?
    } else {
        None
    };

    engine_logging::engine_debug!(
        "harvested {} candidates, {} kept, at_top={at_top}",
        raw.len(),
        items.len()
    );

    Ok(HarvestOutcome {
        items,
        at_top,
        header_html,
    })
}
