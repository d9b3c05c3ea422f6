//! Auto-rotating banner carousel: timer-driven index rotation, drag
//! reconciliation, and interpolated pagination dots.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{MediaItem, Route};

/// How long each banner stays in view before the rotator advances.
pub const ROTATION_PERIOD: Duration = Duration::from_millis(5000);

/// Pagination dot width when its item is out of view.
pub const DOT_COMPACT: f32 = 8.0;
/// Pagination dot width when its item is fully in view.
pub const DOT_EXPANDED: f32 = 16.0;
/// Pagination dot opacity when its item is out of view.
pub const DOT_DIM: f32 = 0.3;

/// Where the display surface should move after an advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    pub offset: f32,
    pub animated: bool,
}

/// Interpolated visuals for one pagination dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotStyle {
    pub width: f32,
    pub opacity: f32,
}

/// Horizontally paged surface the carousel renders into.
pub trait DisplaySurface: Send + Sync {
    fn scroll_to(&self, offset: f32, animated: bool);
}

/// Dispatches navigation to a detail screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Carousel position state. Both the rotation timer and user drags
/// funnel through the two mutators here, so the next tick always
/// continues from whatever the user last saw.
#[derive(Debug)]
pub struct CarouselState {
    items: Vec<MediaItem>,
    current: usize,
    offset: f32,
    page_width: f32,
}

impl CarouselState {
    pub fn new(items: Vec<MediaItem>, page_width: f32) -> Self {
        Self {
            items,
            current: 0,
            offset: 0.0,
            page_width,
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Timer tick: move to the next item, wrapping past the last one.
    /// `None` when there is nothing to rotate through.
    pub fn advance(&mut self) -> Option<ScrollTarget> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.offset = self.current as f32 * self.page_width;
        Some(ScrollTarget {
            offset: self.offset,
            animated: true,
        })
    }

    /// Drag reconciliation: track the surface offset, and when it snaps
    /// to a different item make that the current one. Returns whether
    /// the current index changed.
    pub fn sync_to_offset(&mut self, offset: f32) -> bool {
        self.offset = offset;
        if self.items.is_empty() || self.page_width <= 0.0 {
            return false;
        }
        let snapped = (offset / self.page_width).round();
        let snapped = if snapped < 0.0 { 0 } else { snapped as usize };
        let snapped = snapped.min(self.items.len() - 1);
        if snapped != self.current {
            self.current = snapped;
            true
        } else {
            false
        }
    }

    /// Dot visuals for item `index`: width runs 16 down to 8 and opacity
    /// 1.0 down to 0.3, linearly over one page width of scroll distance
    /// on either side, clamped there.
    pub fn dot(&self, index: usize) -> DotStyle {
        let d = if self.page_width > 0.0 {
            ((self.offset - index as f32 * self.page_width).abs() / self.page_width).min(1.0)
        } else {
            1.0
        };
        DotStyle {
            width: DOT_EXPANDED - (DOT_EXPANDED - DOT_COMPACT) * d,
            opacity: 1.0 - (1.0 - DOT_DIM) * d,
        }
    }

    pub fn dots(&self) -> Vec<DotStyle> {
        (0..self.items.len()).map(|i| self.dot(i)).collect()
    }

    fn replace_items(&mut self, items: Vec<MediaItem>) {
        self.items = items;
        if self.items.is_empty() {
            self.current = 0;
        } else if self.current >= self.items.len() {
            self.current = self.items.len() - 1;
        }
        self.offset = self.current as f32 * self.page_width;
    }
}

/// Owns the rotation timer for one banner carousel.
///
/// Must be created inside a tokio runtime. The timer task is owned by
/// this rotator and aborted on drop; a dropped rotator never mutates
/// state again. An empty carousel never starts a timer at all.
pub struct BannerRotator {
    state: Arc<Mutex<CarouselState>>,
    surface: Arc<dyn DisplaySurface>,
    restart: Arc<Notify>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl BannerRotator {
    pub fn new(items: Vec<MediaItem>, page_width: f32, surface: Arc<dyn DisplaySurface>) -> Self {
        let rotator = Self {
            state: Arc::new(Mutex::new(CarouselState::new(items, page_width))),
            surface,
            restart: Arc::new(Notify::new()),
            task: Mutex::new(None),
        };
        rotator.ensure_rotating();
        rotator
    }

    fn ensure_rotating(&self) {
        let mut task = self.task.lock();
        if task.is_some() || self.state.lock().is_empty() {
            return;
        }
        let state = Arc::clone(&self.state);
        let surface = Arc::clone(&self.surface);
        let restart = Arc::clone(&self.restart);
        *task = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(ROTATION_PERIOD) => {
                        let target = state.lock().advance();
                        if let Some(target) = target {
                            debug!(offset = target.offset as f64, "banner auto-advance");
                            surface.scroll_to(target.offset, target.animated);
                        }
                    }
                    // A restart signal puts the full period back on the
                    // clock without advancing.
                    _ = restart.notified() => {}
                }
            }
        }));
    }

    /// Continuous scroll sample from a user drag. When the drag lands
    /// on a new item the pending rotation period starts over, so the
    /// next tick continues from where the user left off.
    pub fn handle_scroll(&self, offset: f32) {
        let changed = self.state.lock().sync_to_offset(offset);
        if changed {
            self.restart.notify_one();
        }
    }

    /// Replaces the carousel contents. A rotator that was idle because
    /// it had no items begins rotating; one emptied out stops.
    pub fn set_items(&self, items: Vec<MediaItem>) {
        let emptied = items.is_empty();
        self.state.lock().replace_items(items);
        if emptied {
            if let Some(task) = self.task.lock().take() {
                task.abort();
            }
        } else {
            self.ensure_rotating();
            self.restart.notify_one();
        }
    }

    /// Press on item `index`: dispatch to its detail screen. Out of
    /// range presses are ignored.
    pub fn press(&self, index: usize, navigator: &dyn Navigator) {
        let route = self
            .state
            .lock()
            .items()
            .get(index)
            .map(MediaItem::detail_route);
        if let Some(route) = route {
            navigator.navigate(route);
        }
    }

    pub fn current_index(&self) -> usize {
        self.state.lock().current_index()
    }

    pub fn dots(&self) -> Vec<DotStyle> {
        self.state.lock().dots()
    }

    pub fn is_rotating(&self) -> bool {
        self.task.lock().is_some()
    }
}

impl Drop for BannerRotator {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}
