use std::fmt;

use serde::Serialize;

use crate::cache::MessageCache;
use crate::config::AcquireConfig;
use crate::effect::Effect;

/// Acquisition phases. Terminal is `Done` with the reason that stopped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Priming,
    Iterating,
    StuckRecovery { bumps_used: u32 },
    AtTopConfirming { quiet_rounds: u32 },
    Done(StopReason),
}

/// Why a session stopped. Only `NoScroller` and `DocumentGone` are
/// failures; everything else returns the accumulated cache as success,
/// partial history included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    MaxItems,
    TopConfirmed,
    StuckExhausted,
    NoGrowth,
    IterationCeiling,
    NoScroller,
    DocumentGone,
}

impl StopReason {
    pub fn is_failure(self) -> bool {
        matches!(self, StopReason::NoScroller | StopReason::DocumentGone)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::MaxItems => write!(f, "configured item limit reached"),
            StopReason::TopConfirmed => write!(f, "timeline origin confirmed"),
            StopReason::StuckExhausted => write!(f, "stuck recovery exhausted"),
            StopReason::NoGrowth => write!(f, "no growth across recent passes"),
            StopReason::IterationCeiling => write!(f, "iteration ceiling reached"),
            StopReason::NoScroller => write!(f, "no scrollable container found"),
            StopReason::DocumentGone => write!(f, "document unavailable"),
        }
    }
}

/// The captured item currently believed to be nearest the timeline origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topmost {
    pub key: String,
    pub order: i128,
}

/// All mutable state of one capture session.
///
/// Owned by the orchestrator and threaded through every component, so the
/// cache survives across repeated `acquire` invocations within the same
/// document lifetime without any ambient globals.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) config: AcquireConfig,
    pub(crate) phase: Phase,
    pub(crate) cache: MessageCache,
    pub(crate) passes: u32,
    pub(crate) no_growth_run: u32,
    pub(crate) topmost: Option<Topmost>,
}

impl SessionState {
    pub fn new(config: AcquireConfig) -> Self {
        Self {
            config,
            phase: Phase::Init,
            cache: MessageCache::new(),
            passes: 0,
            no_growth_run: 0,
            topmost: None,
        }
    }

    /// Begin (or resume) an acquisition run. The cache is kept so a resumed
    /// capture extends prior progress; the walk restarts from `Init`.
    pub fn start(&mut self) -> Vec<Effect> {
        self.phase = Phase::Init;
        self.passes = 0;
        self.no_growth_run = 0;
        vec![Effect::LocateScroller]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &AcquireConfig {
        &self.config
    }

    pub fn cache(&self) -> &MessageCache {
        &self.cache
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn topmost(&self) -> Option<&Topmost> {
        self.topmost.as_ref()
    }

    /// The terminal reason, once the machine has finished.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.phase {
            Phase::Done(reason) => Some(reason),
            _ => None,
        }
    }
}
