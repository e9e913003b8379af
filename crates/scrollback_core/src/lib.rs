//! Scrollback core: pure acquisition state machine and cache types.
mod cache;
mod config;
mod effect;
mod msg;
mod record;
mod state;
mod update;

pub use cache::MessageCache;
pub use config::{AcquireConfig, SelectorProfile};
pub use effect::Effect;
pub use msg::{HarvestOutcome, HarvestedItem, Msg};
pub use record::{ItemRecord, HEADER_KEY};
pub use state::{Phase, SessionState, StopReason, Topmost};
pub use update::update;
