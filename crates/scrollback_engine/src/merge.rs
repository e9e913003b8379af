use scrollback_core::{ItemRecord, SelectorProfile};

use crate::classify::ElementClassifier;
use crate::page::PageDriver;
use crate::types::MergeReport;

/// Compute the final ordered child list from a cache snapshot.
///
/// Records sort by `(order, sequence)` ascending, which places the
/// synthesized header (order `i128::MIN`) first when present. Records
/// whose stored HTML still matches placeholder signals are dropped.
/// Pure and deterministic: the same snapshot yields byte-identical output.
pub fn plan_children(snapshot: &[ItemRecord], classifier: &ElementClassifier) -> Vec<String> {
    let mut records: Vec<&ItemRecord> = snapshot.iter().collect();
    records.sort_by(|a, b| a.order.cmp(&b.order).then(a.sequence.cmp(&b.sequence)));

    let mut children = Vec::with_capacity(records.len());
    for record in records {
        if !record.is_header() && classifier.is_placeholder_fragment(&record.html) {
            engine_logging::engine_debug!("dropping stale placeholder record {}", record.key);
            continue;
        }
        children.push(record.html.clone());
    }
    children
}

/// Rebuild the live container's children from the snapshot: existing
/// children (real items and stale placeholders alike) are replaced
/// wholesale by the deduplicated, chronologically ordered records.
///
/// Destructive; run once per capture, after acquisition has finished.
pub async fn merge(
    page: &dyn PageDriver,
    snapshot: &[ItemRecord],
    profile: &SelectorProfile,
) -> MergeReport {
    let classifier = ElementClassifier::new(&profile.placeholder_classes);
    let children = plan_children(snapshot, &classifier);

    match page.replace_children(&children).await {
        Ok(()) => {
            engine_logging::engine_info!(
                "merged {} of {} records into container",
                children.len(),
                snapshot.len()
            );
            MergeReport {
                ok: true,
                inserted_count: children.len(),
                total_count: snapshot.len(),
                error: None,
            }
        }
        Err(err) => MergeReport {
            ok: false,
            inserted_count: 0,
            total_count: snapshot.len(),
            error: Some(err.to_string()),
        },
    }
}
