//! Scrollback engine: effect execution against a live page.
mod acquire;
mod classify;
mod harvest;
mod merge;
mod page;
mod quiesce;
mod sanitize;
mod scroll;
mod types;

pub use acquire::CaptureSession;
pub use classify::{Classification, ClassifyError, ElementClassifier};
pub use harvest::harvest_pass;
pub use merge::{merge, plan_children};
pub use page::{MutationWatch, PageDriver, RawItem, ScrollMetrics};
pub use quiesce::settle;
pub use sanitize::sanitize_fragment;
pub use scroll::ScrollDriver;
pub use types::{AcquireReport, MergeReport, PageError};
