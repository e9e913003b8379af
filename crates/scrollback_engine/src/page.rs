use async_trait::async_trait;

pub use crate::types::PageError;

/// A candidate item as the renderer currently mounts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    /// Position within the current enumeration.
    pub index: usize,
    /// Serialized outer HTML of the node.
    pub outer_html: String,
}

/// Geometry of the adopted scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    /// `scrollHeight - clientHeight`; zero when nothing overflows.
    pub scroll_range: f64,
}

/// Live handle onto a subtree mutation subscription.
///
/// Dropping the handle unsubscribes, so a settle wait cannot leak its
/// observer on either exit path.
pub trait MutationWatch: Send {
    /// Monotonically increasing revision; any DOM mutation (child list,
    /// attributes, character data, subtree) advances it.
    fn revision(&self) -> u64;
}

/// The engine's only boundary to the live renderer.
///
/// A production implementation drives a real browser document; tests use a
/// simulated page. Every method may fail with `DocumentGone` at any time.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Document base URL used to absolutize embedded references.
    async fn base_url(&self) -> Result<String, PageError>;

    /// Whether `selector` matches an element that is vertically
    /// overflow-scrollable and has overflowing content.
    async fn probe_scroller(&self, selector: &str) -> Result<bool, PageError>;

    /// Whether the document's root scrolling element overflows; the
    /// last-resort scroller when no candidate selector matches.
    async fn root_scrollable(&self) -> Result<bool, PageError>;

    /// Bind subsequent scroll operations to the given container
    /// (`None` = the root scrolling element).
    async fn adopt_scroller(&self, selector: Option<&str>) -> Result<(), PageError>;

    /// Current geometry of the adopted container.
    async fn scroll_metrics(&self) -> Result<ScrollMetrics, PageError>;

    /// Write `scrollTop` on the adopted container.
    async fn set_scroll_top(&self, px: f64) -> Result<(), PageError>;

    /// Dispatch synthetic wheel and scroll events; some renderers only
    /// react to interaction-shaped input, not bare `scrollTop` writes.
    async fn dispatch_scroll_events(&self, delta_y: f64) -> Result<(), PageError>;

    /// Bring the item with the given key into view. `Ok(false)` means the
    /// item is no longer mounted.
    async fn scroll_into_view(&self, key: &str) -> Result<bool, PageError>;

    /// Enumerate currently mounted candidate items, using the first item
    /// selector that matches anything.
    async fn visible_items(&self, selectors: &[String]) -> Result<Vec<RawItem>, PageError>;

    /// Text content of the container, scanned for boundary marker phrases.
    async fn container_text(&self) -> Result<String, PageError>;

    /// Outer HTML of the timeline-origin header, when mounted.
    async fn header_html(&self) -> Result<Option<String>, PageError>;

    /// Subscribe to subtree mutations.
    fn watch_mutations(&self) -> Box<dyn MutationWatch>;

    /// Destructively replace the container's children.
    async fn replace_children(&self, children: &[String]) -> Result<(), PageError>;
}
