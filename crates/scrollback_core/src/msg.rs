/// Observations fed back into the state machine by the effect runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A scrollable container was located.
    ScrollerLocated,
    /// No scrollable container exists anywhere in the document.
    ScrollerMissing,
    /// A scroll step settled and the visible items were classified.
    Harvested(HarvestOutcome),
    /// The scroll or harvest step failed transiently; nothing was captured.
    StepFailed,
    /// The hosting document is closed or navigated away.
    DocumentGone,
}

/// What one settled harvest pass saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// Visible, non-placeholder items in enumeration order.
    pub items: Vec<HarvestedItem>,
    /// Scroll offset at the top boundary, or a boundary marker phrase
    /// present in the container text.
    pub at_top: bool,
    /// Origin-header HTML, when the top of the timeline is in view.
    pub header_html: Option<String>,
}

/// One classified, sanitized item from a harvest pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestedItem {
    pub key: String,
    pub order: i128,
    pub html: String,
}
