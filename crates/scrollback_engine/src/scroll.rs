use scrollback_core::AcquireConfig;

use crate::page::{PageDriver, PageError};

/// Scroll adjustments against the adopted container.
///
/// Locating runs an ordered strategy chain over candidate selectors with
/// the root scrolling element as the last resort. Every adjustment writes
/// `scrollTop` and additionally dispatches synthetic wheel/scroll events,
/// since some renderers ignore bare programmatic writes.
pub struct ScrollDriver<'a> {
    page: &'a dyn PageDriver,
    scroller_selectors: &'a [String],
    step_px: f64,
    bump_px: f64,
}

impl<'a> ScrollDriver<'a> {
    pub fn new(page: &'a dyn PageDriver, config: &'a AcquireConfig) -> Self {
        Self {
            page,
            scroller_selectors: &config.selectors.scroller,
            step_px: config.step_px,
            bump_px: config.bump_px,
        }
    }

    /// Try each candidate selector in order, then the root scrolling
    /// element. Returns `false` when nothing scrollable exists at all.
    pub async fn locate(&self) -> Result<bool, PageError> {
        for selector in self.scroller_selectors {
            if self.page.probe_scroller(selector).await? {
                self.page.adopt_scroller(Some(selector)).await?;
                engine_logging::engine_debug!("scroller located via {selector}");
                return Ok(true);
            }
        }
        if self.page.root_scrollable().await? {
            self.page.adopt_scroller(None).await?;
            engine_logging::engine_debug!("falling back to root scrolling element");
            return Ok(true);
        }
        Ok(false)
    }

    /// Jump to the newest end of the list.
    pub async fn jump_to_bottom(&self) -> Result<(), PageError> {
        let metrics = self.page.scroll_metrics().await?;
        self.nudge(metrics.scroll_range, metrics.scroll_range - metrics.scroll_top)
            .await
    }

    /// Force-scroll to the absolute top.
    pub async fn to_top(&self) -> Result<(), PageError> {
        let metrics = self.page.scroll_metrics().await?;
        self.nudge(0.0, -metrics.scroll_top).await
    }

    /// Scroll toward the topmost captured item to provoke the renderer's
    /// lazy-load-on-approach behavior; falls back to a plain upward step
    /// when that item is unmounted or none is known yet.
    pub async fn approach(&self, target: Option<&str>) -> Result<(), PageError> {
        if let Some(key) = target {
            if self.page.scroll_into_view(key).await? {
                // Overshoot a little so the loader sees us coming.
                return self.step_up(self.step_px / 2.0).await;
            }
            engine_logging::engine_debug!("topmost item {key} unmounted, stepping instead");
        }
        self.step_up(self.step_px).await
    }

    /// Larger corrective jump for stuck recovery.
    pub async fn bump(&self) -> Result<(), PageError> {
        engine_logging::engine_debug!("stuck recovery bump of {}px", self.bump_px);
        self.step_up(self.bump_px).await
    }

    async fn step_up(&self, amount: f64) -> Result<(), PageError> {
        let metrics = self.page.scroll_metrics().await?;
        let to = (metrics.scroll_top - amount).max(0.0);
        self.nudge(to, to - metrics.scroll_top).await
    }

    async fn nudge(&self, to: f64, delta: f64) -> Result<(), PageError> {
        self.page.set_scroll_top(to).await?;
        self.page.dispatch_scroll_events(delta).await
    }
}
