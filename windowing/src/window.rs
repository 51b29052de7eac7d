use alloc::sync::Arc;

use crate::cache::{KeyCacheKey, MeasurementCache};
use crate::oracle::HeightOracle;
use crate::range::{Window, compute_window};
use crate::{
    Align, ConfigError, Correction, MeasureKind, RowKey, RowLayout, ViewportState, WindowOptions,
};

/// A headless list window.
///
/// `RowWindow` owns the viewport state and the measurement cache of one list and keeps the
/// computed [`Window`] in sync with them: every setter that changes an input recomputes the
/// window (once per [`Self::batch_update`] when batched) and then fires `on_change`.
///
/// It holds no UI objects. Platform wiring lives in the `windowing-bridge` crate.
#[derive(Clone, Debug)]
pub struct RowWindow<K = RowKey> {
    options: WindowOptions<K>,
    viewport: ViewportState,
    cache: MeasurementCache<K>,
    window: Window<K>,
    revision: u64,

    dirty: bool,
    batch_depth: usize,
    notify_pending: bool,
}

impl<K: KeyCacheKey> RowWindow<K> {
    /// Creates a window from options.
    ///
    /// Fails with [`ConfigError::MissingHeightStrategy`] when neither a fixed row height nor an
    /// estimator is configured. No row is laid out in that case.
    pub fn new(options: WindowOptions<K>) -> Result<Self, ConfigError> {
        options.validate()?;
        wdebug!(
            row_count = options.row_count,
            fixed_size = options.is_fixed_size(),
            overscan = options.overscan,
            "RowWindow::new"
        );
        let mut w = Self {
            options,
            viewport: ViewportState::default(),
            cache: MeasurementCache::new(),
            window: Window::empty(),
            revision: 0,
            dirty: true,
            batch_depth: 0,
            notify_pending: false,
        };
        w.recompute();
        Ok(w)
    }

    pub fn options(&self) -> &WindowOptions<K> {
        &self.options
    }

    /// Replaces the options. Invalid options are rejected and the current ones kept.
    ///
    /// The measurement cache survives reconfiguration.
    pub fn set_options(&mut self, options: WindowOptions<K>) -> Result<(), ConfigError> {
        options.validate()?;
        self.options = options;
        wdebug!(
            row_count = self.options.row_count,
            fixed_size = self.options.is_fixed_size(),
            overscan = self.options.overscan,
            "RowWindow::set_options"
        );
        self.invalidate();
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to [`Self::set_options`].
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut WindowOptions<K>),
    ) -> Result<(), ConfigError> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    /// Coalesces every update made inside `f` into a single recomputation and a single
    /// `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);

        f(self);

        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && core::mem::take(&mut self.notify_pending) {
            self.flush();
        }
    }

    pub fn row_count(&self) -> usize {
        self.options.row_count
    }

    pub fn set_row_count(&mut self, row_count: usize) {
        if self.options.row_count == row_count {
            return;
        }
        self.options.row_count = row_count;
        self.invalidate();
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.invalidate();
    }

    pub fn scrolling_delay_ms(&self) -> u64 {
        self.options.scrolling_delay_ms
    }

    pub fn set_scrolling_delay_ms(&mut self, delay_ms: u64) {
        self.options.scrolling_delay_ms = delay_ms;
    }

    pub fn set_row_height(&mut self, f: impl Fn(usize) -> f64 + Send + Sync + 'static) {
        self.options.row_height = Some(Arc::new(f));
        self.invalidate();
    }

    pub fn set_estimate_row_height(&mut self, f: impl Fn(usize) -> f64 + Send + Sync + 'static) {
        self.options.estimate_row_height = Some(Arc::new(f));
        self.invalidate();
    }

    pub fn set_get_row_key(&mut self, f: impl Fn(usize) -> K + Send + Sync + 'static) {
        self.options.get_row_key = Arc::new(f);
        self.invalidate();
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&RowWindow<K>) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.options.get_row_key)(index)
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn container_height(&self) -> f64 {
        self.viewport.container_height
    }

    pub fn set_container_height(&mut self, height: f64) {
        if !(height.is_finite() && height >= 0.0) {
            wwarn!(height, "ignoring invalid container height");
            return;
        }
        if self.viewport.container_height == height {
            return;
        }
        wtrace!(height, "set_container_height");
        self.viewport.container_height = height;
        self.invalidate();
    }

    pub fn scroll_offset(&self) -> f64 {
        self.viewport.scroll_offset
    }

    /// Sets the scroll offset. Negative offsets (elastic overscroll) are clamped to zero.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        if !offset.is_finite() {
            wwarn!(offset, "ignoring non-finite scroll offset");
            return;
        }
        let offset = offset.max(0.0);
        if self.viewport.scroll_offset == offset {
            return;
        }
        wtrace!(offset, "set_scroll_offset");
        self.viewport.scroll_offset = offset;
        self.invalidate();
    }

    pub fn is_scrolling(&self) -> bool {
        self.viewport.is_scrolling
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.viewport.is_scrolling == is_scrolling {
            return;
        }
        self.viewport.is_scrolling = is_scrolling;
        self.notify();
    }

    /// The current computed window.
    ///
    /// Inside [`Self::batch_update`] this may lag behind the latest inputs until the batch ends.
    pub fn window(&self) -> &Window<K> {
        &self.window
    }

    pub fn virtual_rows(&self) -> &[RowLayout<K>] {
        self.window.virtual_rows()
    }

    pub fn total_height(&self) -> f64 {
        self.window.total_height()
    }

    pub fn start_index(&self) -> Option<usize> {
        self.window.start_index()
    }

    pub fn end_index(&self) -> Option<usize> {
        self.window.end_index()
    }

    /// Incremented every time the window is recomputed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn measurement_cache(&self) -> &MeasurementCache<K> {
        &self.cache
    }

    pub fn measurement_cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cached_height(&self, key: &K) -> Option<f64> {
        self.cache.get(key)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        index < self.options.row_count && self.cache.contains(&self.key_for(index))
    }

    /// Records the observed height of a rendered row.
    ///
    /// An `Initial` measurement is skipped when the row already has a cached height; a `Resize`
    /// always applies. When the row starts above the current scroll offset, the scroll offset is
    /// moved by the height delta before the new height is committed, so content already scrolled
    /// past stays in place. The returned [`Correction`] carries that adjustment so the caller can
    /// mirror it on the real scroll container.
    ///
    /// The offset never goes below zero, so when a shrinking row would push it negative,
    /// `scroll_adjustment` is smaller in magnitude than `delta`.
    pub fn record_measurement(
        &mut self,
        index: usize,
        observed: f64,
        kind: MeasureKind,
    ) -> Correction {
        if index >= self.options.row_count {
            wwarn!(
                index,
                row_count = self.options.row_count,
                "measurement for out-of-range row discarded"
            );
            return Correction::Discarded;
        }
        if !(observed.is_finite() && observed >= 0.0) {
            wwarn!(index, observed, "invalid row measurement discarded");
            return Correction::Discarded;
        }
        if self.options.is_fixed_size() {
            wtrace!(index, "fixed-size rows ignore measurements");
            return Correction::Ignored;
        }

        if self.dirty {
            self.recompute();
        }

        let key = self.key_for(index);
        let cached = self.cache.get(&key);
        if kind == MeasureKind::Initial && cached.is_some() {
            return Correction::Unchanged;
        }
        if cached == Some(observed) {
            return Correction::Unchanged;
        }

        let Some(row) = self.window.row(index) else {
            return Correction::Discarded;
        };
        let delta = observed - row.height;
        let offset_top = row.offset_top;

        let mut scroll_adjustment = 0.0;
        let scroll_offset = self.viewport.scroll_offset;
        if delta != 0.0 && scroll_offset > offset_top {
            let next = (scroll_offset + delta).max(0.0);
            scroll_adjustment = next - scroll_offset;
            self.viewport.scroll_offset = next;
        }
        wtrace!(index, observed, delta, scroll_adjustment, "record_measurement");

        self.cache.insert(key, observed);
        self.invalidate();
        Correction::Applied {
            delta,
            scroll_adjustment,
        }
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll_offset(&self) -> f64 {
        (self.window.total_height() - self.viewport.container_height).max(0.0)
    }

    pub fn clamp_scroll_offset(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll_offset())
    }

    /// Computes the scroll offset that brings `index` into view with the given alignment.
    ///
    /// The index is clamped to the list; an empty list yields `0.0`.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> f64 {
        let rows = self.window.rows();
        if rows.is_empty() {
            return 0.0;
        }
        let row = &rows[index.min(rows.len() - 1)];
        let view = self.viewport.container_height;

        let target = match align {
            Align::Start => row.offset_top,
            Align::End => row.end() - view,
            Align::Center => row.offset_top + row.height / 2.0 - view / 2.0,
            Align::Auto => {
                let cur = self.viewport.scroll_offset;
                if row.offset_top >= cur && row.end() <= cur + view {
                    cur
                } else if row.offset_top < cur {
                    row.offset_top
                } else {
                    row.end() - view
                }
            }
        };

        self.clamp_scroll_offset(target)
    }

    /// Scrolls to `index` without marking the list as scrolling. Returns the applied offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> f64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        offset
    }

    fn invalidate(&mut self) {
        self.dirty = true;
        self.notify();
    }

    fn notify(&mut self) {
        if self.batch_depth > 0 {
            self.notify_pending = true;
            return;
        }
        self.flush();
    }

    fn flush(&mut self) {
        if self.dirty {
            self.recompute();
        }
        if let Some(cb) = self.options.on_change.clone() {
            cb(self);
        }
    }

    fn recompute(&mut self) {
        self.dirty = false;
        let window = HeightOracle::new(&self.options, &self.cache)
            .map(|oracle| {
                compute_window(
                    &oracle,
                    self.viewport.container_height,
                    self.viewport.scroll_offset,
                    self.options.overscan,
                )
            })
            .unwrap_or_default();
        self.window = window;
        self.revision = self.revision.wrapping_add(1);
        wtrace!(
            revision = self.revision,
            start = ?self.window.start_index(),
            end = ?self.window.end_index(),
            total_height = self.window.total_height(),
            "recompute"
        );
    }
}
