use serde::{Deserialize, Serialize};

/// Selector strategy lists used to locate page structure.
///
/// Each list is tried in order until a strategy succeeds, so entries should
/// go from most to least specific. The defaults target a generic virtualized
/// chat list; an orchestrator overrides them per source application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorProfile {
    /// Candidate selectors for the scrollable message container.
    pub scroller: Vec<String>,
    /// Candidate selectors for individual message items.
    pub items: Vec<String>,
    /// Class-name tokens that mark loading/skeleton placeholders.
    pub placeholder_classes: Vec<String>,
    /// Phrases whose presence in the container text marks the timeline origin.
    pub boundary_markers: Vec<String>,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self {
            scroller: vec![
                "[data-list-id='chat-messages']".to_string(),
                "[class*='messagesWrapper'] [class*='scroller']".to_string(),
                "[role='log']".to_string(),
                "main [class*='scroller']".to_string(),
            ],
            items: vec![
                "li[data-list-item-id]".to_string(),
                "li[id^='chat-messages-']".to_string(),
                "[data-message-id]".to_string(),
                "[role='article']".to_string(),
            ],
            placeholder_classes: vec![
                "skeleton".to_string(),
                "spinner".to_string(),
                "loading".to_string(),
                "placeholder".to_string(),
                "shimmer".to_string(),
            ],
            boundary_markers: vec![
                "beginning of".to_string(),
                "start of the conversation".to_string(),
                "no earlier messages".to_string(),
            ],
        }
    }
}

/// Tuning knobs for one acquisition session.
///
/// The heuristic thresholds here are pacing, not correctness: the machine
/// terminates for any values because of `max_iterations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquireConfig {
    /// Stop once this many items are cached. `None` means unbounded.
    pub max_items: Option<usize>,
    /// Continuous mutation-free window treated as quiescence.
    pub stability_window_ms: u64,
    /// Upper bound on any single settle wait.
    pub max_settle_ms: u64,
    /// Consecutive no-growth passes that end a non-`stop_at_top` run.
    pub no_growth_limit: u32,
    /// Keep going until the timeline origin is confirmed, rather than
    /// stopping on the first no-growth run.
    pub stop_at_top: bool,
    /// Consecutive empty passes before stuck recovery kicks in.
    pub stuck_threshold: u32,
    /// Corrective bumps attempted during stuck recovery before giving up.
    pub max_bumps: u32,
    /// Quiet re-harvests required to confirm the top has been reached.
    pub confirm_rounds: u32,
    /// Hard ceiling on harvest passes for the whole session.
    pub max_iterations: u32,
    /// Upward step size when no captured item is known to scroll toward.
    pub step_px: f64,
    /// Jump size for stuck-recovery bumps.
    pub bump_px: f64,
    /// Page structure strategies.
    pub selectors: SelectorProfile,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            max_items: None,
            stability_window_ms: 400,
            max_settle_ms: 4_000,
            no_growth_limit: 5,
            stop_at_top: true,
            stuck_threshold: 2,
            max_bumps: 4,
            confirm_rounds: 3,
            max_iterations: 500,
            step_px: 600.0,
            bump_px: 2_400.0,
            selectors: SelectorProfile::default(),
        }
    }
}
