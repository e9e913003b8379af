//! Simulated virtualized chat page used by the scenario tests.
//!
//! Keeps a full timeline but only "mounts" a sliding suffix of it, and
//! mounts older batches when the scroll offset approaches the top, the way
//! a lazily-rendered history list behaves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scrollback_engine::{MutationWatch, PageDriver, PageError, RawItem, ScrollMetrics};

pub const ITEM_HEIGHT: f64 = 100.0;
pub const VIEWPORT_PX: f64 = 800.0;
/// Scroll offsets below this provoke the next lazy batch.
const LOAD_THRESHOLD_PX: f64 = 250.0;

const SNOWFLAKE_EPOCH_MS: i128 = 1_420_070_400_000;
const BASE_MS: i128 = 1_700_000_000_000;

pub fn snowflake_for(ms: i128) -> i128 {
    (ms - SNOWFLAKE_EPOCH_MS) << 22
}

/// Key the classifier will derive for message `n` (its element id).
pub fn message_key(n: usize) -> String {
    format!("chat-messages-{}", snowflake_for(BASE_MS + n as i128 * 60_000))
}

/// One realistic message node: snowflake id, text, and a lazy image.
pub fn message_html(n: usize) -> String {
    format!(
        r#"<li id="{key}" class="messageListItem"><div class="contents">message number {n}</div><img src="blank.gif" loading="lazy" data-src="/media/full-{n}.png"></li>"#,
        key = message_key(n),
    )
}

struct Inner {
    timeline: Vec<String>,
    /// Index of the oldest mounted item; 0 means fully loaded.
    loaded_from: usize,
    batch: usize,
    scroll_top: f64,
    has_scroller: bool,
    dead: Option<String>,
    die_after_scrolls: Option<u32>,
    scroll_ops: u32,
    events_dispatched: u32,
    include_skeleton: bool,
    replaced_children: Option<Vec<String>>,
}

impl Inner {
    fn mounted(&self) -> usize {
        self.timeline.len() - self.loaded_from
    }

    fn scroll_range(&self) -> f64 {
        (self.mounted() as f64 * ITEM_HEIGHT - VIEWPORT_PX).max(0.0)
    }

    fn fully_loaded(&self) -> bool {
        self.loaded_from == 0
    }
}

pub struct SimulatedPage {
    inner: Mutex<Inner>,
    revision: Arc<AtomicU64>,
}

impl SimulatedPage {
    /// `total` items, newest `initially_mounted` of them mounted, older
    /// history revealed `batch` at a time.
    pub fn with_timeline(total: usize, initially_mounted: usize, batch: usize) -> Self {
        let timeline: Vec<String> = (0..total).map(message_html).collect();
        let loaded_from = total.saturating_sub(initially_mounted);
        let inner = Inner {
            timeline,
            loaded_from,
            batch,
            scroll_top: 0.0,
            has_scroller: true,
            dead: None,
            die_after_scrolls: None,
            scroll_ops: 0,
            events_dispatched: 0,
            include_skeleton: false,
            replaced_children: None,
        };
        let page = Self {
            inner: Mutex::new(inner),
            revision: Arc::new(AtomicU64::new(0)),
        };
        {
            let mut inner = page.inner.lock().unwrap();
            inner.scroll_top = inner.scroll_range();
        }
        page
    }

    /// A page with no scrollable element anywhere.
    pub fn without_scroller() -> Self {
        let page = Self::with_timeline(3, 3, 1);
        page.inner.lock().unwrap().has_scroller = false;
        page
    }

    /// Close the document after the given number of scroll operations.
    pub fn die_after(self, scroll_ops: u32) -> Self {
        self.inner.lock().unwrap().die_after_scrolls = Some(scroll_ops);
        self
    }

    /// Close the document immediately.
    pub fn close(&self) {
        self.inner.lock().unwrap().dead = Some("tab closed".to_string());
    }

    /// Mount a skeleton placeholder above the oldest loaded item while
    /// more history remains.
    pub fn with_skeleton(self) -> Self {
        self.inner.lock().unwrap().include_skeleton = true;
        self
    }

    pub fn replaced_children(&self) -> Option<Vec<String>> {
        self.inner.lock().unwrap().replaced_children.clone()
    }

    pub fn events_dispatched(&self) -> u32 {
        self.inner.lock().unwrap().events_dispatched
    }

    pub fn scroll_ops(&self) -> u32 {
        self.inner.lock().unwrap().scroll_ops
    }

    fn bump_revision(&self) {
        self.revision.fetch_add(1, Ordering::Relaxed);
    }

    /// Clamp, apply, and lazily mount older history when the offset lands
    /// near the top. Prepended content keeps the viewport anchored, so the
    /// offset shifts down by the height of what was mounted.
    fn apply_scroll(&self, inner: &mut Inner, px: f64) -> Result<(), PageError> {
        inner.scroll_ops += 1;
        if let Some(limit) = inner.die_after_scrolls {
            if inner.scroll_ops >= limit {
                inner.dead = Some("tab closed".to_string());
                return Err(PageError::DocumentGone("tab closed".to_string()));
            }
        }

        let px = px.clamp(0.0, inner.scroll_range());
        if px < LOAD_THRESHOLD_PX && inner.loaded_from > 0 {
            let mount = inner.batch.min(inner.loaded_from);
            inner.loaded_from -= mount;
            inner.scroll_top = px + mount as f64 * ITEM_HEIGHT;
            self.bump_revision();
        } else {
            inner.scroll_top = px;
        }
        self.bump_revision();
        Ok(())
    }
}

fn check_alive(inner: &Inner) -> Result<(), PageError> {
    match &inner.dead {
        Some(reason) => Err(PageError::DocumentGone(reason.clone())),
        None => Ok(()),
    }
}

struct SimWatch(Arc<AtomicU64>);

impl MutationWatch for SimWatch {
    fn revision(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PageDriver for SimulatedPage {
    async fn base_url(&self) -> Result<String, PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        Ok("https://chat.example/app/channel/42".to_string())
    }

    async fn probe_scroller(&self, _selector: &str) -> Result<bool, PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        Ok(inner.has_scroller)
    }

    async fn root_scrollable(&self) -> Result<bool, PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        Ok(false)
    }

    async fn adopt_scroller(&self, _selector: Option<&str>) -> Result<(), PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)
    }

    async fn scroll_metrics(&self) -> Result<ScrollMetrics, PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        Ok(ScrollMetrics {
            scroll_top: inner.scroll_top,
            scroll_range: inner.scroll_range(),
        })
    }

    async fn set_scroll_top(&self, px: f64) -> Result<(), PageError> {
        let mut inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        self.apply_scroll(&mut inner, px)
    }

    async fn dispatch_scroll_events(&self, _delta_y: f64) -> Result<(), PageError> {
        let mut inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        inner.events_dispatched += 1;
        Ok(())
    }

    async fn scroll_into_view(&self, key: &str) -> Result<bool, PageError> {
        let mut inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        let needle = format!("id=\"{key}\"");
        let Some(position) = inner.timeline.iter().position(|html| html.contains(&needle)) else {
            return Ok(false);
        };
        if position < inner.loaded_from {
            return Ok(false);
        }
        let offset = (position - inner.loaded_from) as f64 * ITEM_HEIGHT;
        self.apply_scroll(&mut inner, offset)?;
        Ok(true)
    }

    async fn visible_items(&self, _selectors: &[String]) -> Result<Vec<RawItem>, PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        let mut items = Vec::new();
        if inner.include_skeleton && !inner.fully_loaded() {
            items.push(RawItem {
                index: 0,
                outer_html: r#"<li class="msg-loading-skeleton" aria-busy="true"></li>"#
                    .to_string(),
            });
        }
        for html in &inner.timeline[inner.loaded_from..] {
            items.push(RawItem {
                index: items.len(),
                outer_html: html.clone(),
            });
        }
        Ok(items)
    }

    async fn container_text(&self) -> Result<String, PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        let mut text = String::new();
        if inner.fully_loaded() {
            text.push_str("This is the beginning of your conversation history. ");
        }
        for (n, _) in inner.timeline.iter().enumerate().skip(inner.loaded_from) {
            text.push_str(&format!("message number {n} "));
        }
        Ok(text)
    }

    async fn header_html(&self) -> Result<Option<String>, PageError> {
        let inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        Ok(inner.fully_loaded().then(|| {
            r#"<div class="conversation-header">Conversation started</div>"#.to_string()
        }))
    }

    fn watch_mutations(&self) -> Box<dyn MutationWatch> {
        Box::new(SimWatch(self.revision.clone()))
    }

    async fn replace_children(&self, children: &[String]) -> Result<(), PageError> {
        let mut inner = self.inner.lock().unwrap();
        check_alive(&inner)?;
        inner.replaced_children = Some(children.to_vec());
        Ok(())
    }
}
