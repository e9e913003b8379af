/// Cache key of the synthesized timeline-origin header record.
///
/// Contains a space, which no DOM id or identifier attribute token may
/// carry, so it cannot collide with a real item key.
pub const HEADER_KEY: &str = "timeline origin";

/// One harvested item, frozen at the moment of its first capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// Stable identity across re-renders of the same logical item.
    pub key: String,
    /// Chronological sort key. Full integer precision; never a float.
    pub order: i128,
    /// Harvest-time insertion counter, tie-break for equal `order`.
    pub sequence: u64,
    /// Self-contained HTML snapshot of the item subtree.
    pub html: String,
}

impl ItemRecord {
    /// Whether this is the synthesized origin-header record.
    pub fn is_header(&self) -> bool {
        self.key == HEADER_KEY
    }
}
