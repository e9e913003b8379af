use scrollback_core::StopReason;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by a page driver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// The node the operation targeted is no longer in the document.
    /// Transient: the loop continues and re-enumerates on the next pass.
    #[error("node detached from document")]
    Detached,
    /// The hosting document is closed or navigated away. Session-fatal.
    #[error("document unavailable: {0}")]
    DocumentGone(String),
    /// Any other driver-level failure; treated as transient.
    #[error("driver failure: {0}")]
    Driver(String),
}

/// Result of one acquisition run, handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquireReport {
    pub ok: bool,
    /// Items cached across the whole session, header excluded.
    pub loaded_count: usize,
    pub stop: StopReason,
    pub error: Option<String>,
}

/// Result of materializing the final chronological order into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub ok: bool,
    /// Children actually inserted (placeholder records are skipped).
    pub inserted_count: usize,
    /// Records in the snapshot, header included.
    pub total_count: usize,
    pub error: Option<String>,
}
