use std::collections::VecDeque;
use std::time::Duration;

use chrono::Utc;
use scrollback_core::{
    update, AcquireConfig, Effect, ItemRecord, Msg, SessionState, StopReason,
};

use crate::classify::ElementClassifier;
use crate::harvest;
use crate::merge;
use crate::page::{PageDriver, PageError};
use crate::quiesce;
use crate::scroll::ScrollDriver;
use crate::types::{AcquireReport, MergeReport};

/// One capture session: the explicit owner of everything that must survive
/// across discrete invocations within a single document lifetime.
///
/// The orchestrator holds the session, may call [`acquire`] repeatedly to
/// resume/extend a capture, reads [`snapshot`] at any point (failures
/// included), and finally calls [`merge`] once to materialize the result.
///
/// [`acquire`]: CaptureSession::acquire
/// [`snapshot`]: CaptureSession::snapshot
/// [`merge`]: CaptureSession::merge
pub struct CaptureSession {
    state: SessionState,
}

impl CaptureSession {
    pub fn new(config: AcquireConfig) -> Self {
        Self {
            state: SessionState::new(config),
        }
    }

    /// Everything captured so far, available even after a failed run.
    pub fn snapshot(&self) -> Vec<ItemRecord> {
        self.state.cache().snapshot()
    }

    /// Items cached so far, header excluded.
    pub fn loaded_count(&self) -> usize {
        self.state.cache().item_count()
    }

    /// Drive the acquisition machine against `page` until a stop condition
    /// fires. Never blocks indefinitely: every wait and every loop is
    /// bounded.
    pub async fn acquire(&mut self, page: &dyn PageDriver) -> AcquireReport {
        let config = self.state.config().clone();
        let scroll = ScrollDriver::new(page, &config);
        let classifier = ElementClassifier::new(&config.selectors.placeholder_classes);

        let mut state = std::mem::replace(&mut self.state, SessionState::new(config.clone()));
        let mut effects: VecDeque<Effect> = state.start().into_iter().collect();

        let mut reason: Option<StopReason> = None;
        // Backstop on effect dispatches, independent of the machine's own
        // iteration ceiling.
        let mut dispatches_left = config.max_iterations.saturating_mul(4).max(16);

        while let Some(effect) = effects.pop_front() {
            if dispatches_left == 0 {
                reason = Some(StopReason::IterationCeiling);
                break;
            }
            dispatches_left -= 1;
            engine_logging::set_pass(u64::from(state.passes()) + 1);

            let msg = match effect {
                Effect::Finish(stop) => {
                    reason = Some(stop);
                    break;
                }
                Effect::LocateScroller => match scroll.locate().await {
                    Ok(true) => Msg::ScrollerLocated,
                    Ok(false) => Msg::ScrollerMissing,
                    Err(PageError::DocumentGone(why)) => {
                        engine_logging::engine_error!("document gone: {why}");
                        Msg::DocumentGone
                    }
                    // A driver that cannot even probe has nothing to drive.
                    Err(err) => {
                        engine_logging::engine_warn!("scroller probe failed: {err}");
                        Msg::ScrollerMissing
                    }
                },
                Effect::JumpToBottom => {
                    let moved = scroll.jump_to_bottom().await;
                    settled_harvest(page, &config, &classifier, moved).await
                }
                Effect::ApproachTop { target } => {
                    let moved = scroll.approach(target.as_deref()).await;
                    settled_harvest(page, &config, &classifier, moved).await
                }
                Effect::ProbeTop => {
                    let moved = scroll.to_top().await;
                    settled_harvest(page, &config, &classifier, moved).await
                }
                Effect::Bump => {
                    let moved = scroll.bump().await;
                    settled_harvest(page, &config, &classifier, moved).await
                }
            };

            let (next, new_effects) = update(state, msg);
            state = next;
            effects.extend(new_effects);
        }

        let reason = reason
            .or_else(|| state.stop_reason())
            .unwrap_or(StopReason::IterationCeiling);
        let loaded_count = state.cache().item_count();
        self.state = state;

        let ok = !reason.is_failure();
        if ok {
            engine_logging::engine_info!("acquisition stopped: {reason} ({loaded_count} items)");
        } else {
            engine_logging::engine_error!("acquisition failed: {reason}");
        }

        AcquireReport {
            ok,
            loaded_count,
            stop: reason,
            error: (!ok).then(|| reason.to_string()),
        }
    }

    /// Materialize the final chronological order into the live container.
    /// Destructive to the container's existing children; run after
    /// acquisition has finished.
    pub async fn merge(&self, page: &dyn PageDriver) -> MergeReport {
        let snapshot = self.snapshot();
        merge::merge(page, &snapshot, &self.state.config().selectors).await
    }
}

/// Common tail of every scroll effect: wait for the renderer to settle,
/// then harvest. The mutation watch is scoped to this wait and dropped on
/// both exit paths.
async fn settled_harvest(
    page: &dyn PageDriver,
    config: &AcquireConfig,
    classifier: &ElementClassifier,
    moved: Result<(), PageError>,
) -> Msg {
    if let Err(err) = moved {
        return step_error(err);
    }

    let watch = page.watch_mutations();
    quiesce::settle(
        watch.as_ref(),
        Duration::from_millis(config.stability_window_ms),
        Duration::from_millis(config.max_settle_ms),
    )
    .await;
    drop(watch);

    let capture_ms = i128::from(Utc::now().timestamp_millis());
    match harvest::harvest_pass(page, &config.selectors, classifier, capture_ms).await {
        Ok(outcome) => Msg::Harvested(outcome),
        Err(err) => step_error(err),
    }
}

/// Map a page error onto the machine's vocabulary: losing the document is
/// session-fatal, everything else is a transient no-op pass.
fn step_error(err: PageError) -> Msg {
    match err {
        PageError::DocumentGone(why) => {
            engine_logging::engine_error!("document gone: {why}");
            Msg::DocumentGone
        }
        err => {
            engine_logging::engine_warn!("transient step failure: {err}");
            Msg::StepFailed
        }
    }
}
