use crate::state::StopReason;

/// Commands the state machine asks the effect runner to execute.
///
/// Every scroll-flavored effect implies the same tail: wait for quiescence,
/// harvest the visible items, and feed the result back as a `Msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Locate the scrollable container via the configured strategies.
    LocateScroller,
    /// Jump to the newest end of the list for the baseline harvest.
    JumpToBottom,
    /// Scroll toward the topmost captured item to provoke lazy loading,
    /// or take a small upward step when none is known yet.
    ApproachTop { target: Option<String> },
    /// Capture the origin header and force-scroll to the absolute top.
    ProbeTop,
    /// Larger corrective jump used during stuck recovery.
    Bump,
    /// Terminal: the session is finished, successfully or not.
    Finish(StopReason),
}
