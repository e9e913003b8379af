use crate::msg::HarvestOutcome;
use crate::state::{Phase, Topmost};
use crate::{Effect, Msg, SessionState, StopReason};

/// Pure update function: applies one observation to the session state and
/// returns the next effects to execute.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::ScrollerLocated => {
            if state.phase == Phase::Init {
                state.phase = Phase::Priming;
                vec![Effect::JumpToBottom]
            } else {
                Vec::new()
            }
        }
        Msg::ScrollerMissing => finish(&mut state, StopReason::NoScroller),
        Msg::DocumentGone => finish(&mut state, StopReason::DocumentGone),
        Msg::StepFailed => {
            // A failed scroll or harvest counts as a no-growth pass.
            state.passes += 1;
            state.no_growth_run += 1;
            advance(&mut state, false, 0)
        }
        Msg::Harvested(outcome) => {
            state.passes += 1;
            let inserted = absorb(&mut state, &outcome);
            if inserted == 0 {
                state.no_growth_run += 1;
            } else {
                state.no_growth_run = 0;
            }
            advance(&mut state, outcome.at_top, inserted)
        }
    };

    (state, effects)
}

/// Fold one harvest outcome into the cache and pointers. Returns the number
/// of newly cached items; the header is tracked separately and never counts
/// as growth.
fn absorb(state: &mut SessionState, outcome: &HarvestOutcome) -> usize {
    let mut inserted = 0;
    for item in &outcome.items {
        if state.cache.insert(&item.key, item.order, item.html.clone()) {
            inserted += 1;
        }
    }

    if let Some(header) = &outcome.header_html {
        state.cache.insert_header(header.clone());
    }

    // The pointer tracks the smallest-order item visible right now, not the
    // global minimum: the next approach scroll aims at a mounted node.
    if let Some(top) = outcome.items.iter().min_by_key(|item| item.order) {
        state.topmost = Some(Topmost {
            key: top.key.clone(),
            order: top.order,
        });
    }

    inserted
}

/// Pick the next phase and effect after a settled pass.
fn advance(state: &mut SessionState, at_top: bool, inserted: usize) -> Vec<Effect> {
    // Global bounds come first; they hold in every phase and guarantee
    // termination against an adversarial or infinite source.
    if let Some(max) = state.config.max_items {
        if state.cache.item_count() >= max {
            return finish(state, StopReason::MaxItems);
        }
    }
    if state.passes >= state.config.max_iterations {
        return finish(state, StopReason::IterationCeiling);
    }

    match state.phase {
        Phase::Priming | Phase::Iterating => {
            state.phase = Phase::Iterating;
            if at_top {
                state.phase = Phase::AtTopConfirming { quiet_rounds: 0 };
                return vec![Effect::ProbeTop];
            }
            if !state.config.stop_at_top && state.no_growth_run >= state.config.no_growth_limit {
                return finish(state, StopReason::NoGrowth);
            }
            if state.no_growth_run >= state.config.stuck_threshold {
                state.phase = Phase::StuckRecovery { bumps_used: 0 };
                return vec![Effect::Bump];
            }
            vec![approach(state)]
        }
        Phase::StuckRecovery { bumps_used } => {
            if at_top {
                state.phase = Phase::AtTopConfirming { quiet_rounds: 0 };
                return vec![Effect::ProbeTop];
            }
            if inserted > 0 {
                state.phase = Phase::Iterating;
                return vec![approach(state)];
            }
            let used = bumps_used + 1;
            if used >= state.config.max_bumps {
                // Exhaustion is a normal terminal outcome: the partial
                // history captured so far is still returned as success.
                return finish(state, StopReason::StuckExhausted);
            }
            state.phase = Phase::StuckRecovery { bumps_used: used };
            vec![Effect::Bump]
        }
        Phase::AtTopConfirming { quiet_rounds } => {
            if inserted > 0 {
                // A late lazy batch arrived; resume normal iteration.
                state.phase = Phase::Iterating;
                return vec![approach(state)];
            }
            let rounds = quiet_rounds + 1;
            if rounds >= state.config.confirm_rounds {
                return finish(state, StopReason::TopConfirmed);
            }
            state.phase = Phase::AtTopConfirming {
                quiet_rounds: rounds,
            };
            vec![Effect::ProbeTop]
        }
        // No settled pass is expected in these phases; ignore stragglers.
        Phase::Init | Phase::Done(_) => Vec::new(),
    }
}

fn approach(state: &SessionState) -> Effect {
    Effect::ApproachTop {
        target: state.topmost.as_ref().map(|t| t.key.clone()),
    }
}

fn finish(state: &mut SessionState, reason: StopReason) -> Vec<Effect> {
    state.phase = Phase::Done(reason);
    vec![Effect::Finish(reason)]
}
