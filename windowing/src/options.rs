use alloc::sync::Arc;

use crate::window::RowWindow;
use crate::{ConfigError, RowKey};

/// Rows rendered beyond each visible edge unless configured otherwise.
pub const DEFAULT_OVERSCAN: usize = 3;
/// Quiescence delay before `is_scrolling` resets, in milliseconds.
pub const DEFAULT_SCROLLING_DELAY_MS: u64 = 300;

/// A row height function (`index -> height`).
pub type HeightFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// A callback fired after the window has been recomputed.
///
/// Inside [`RowWindow::batch_update`] it fires once, when the batch ends.
pub type OnChangeCallback<K> = Arc<dyn Fn(&RowWindow<K>) + Send + Sync>;

/// Configuration for [`crate::RowWindow`].
///
/// Closures are stored in `Arc`s so callers can tweak a field and hand the options back via
/// `RowWindow::set_options` without reallocating them.
pub struct WindowOptions<K = RowKey> {
    pub row_count: usize,
    /// Fixed row heights. When set, measurements are ignored.
    pub row_height: Option<HeightFn>,
    /// Height estimate used until a row has been measured.
    pub estimate_row_height: Option<HeightFn>,
    pub get_row_key: Arc<dyn Fn(usize) -> K + Send + Sync>,
    pub overscan: usize,
    pub scrolling_delay_ms: u64,
    pub on_change: Option<OnChangeCallback<K>>,
}

impl<K> Clone for WindowOptions<K> {
    fn clone(&self) -> Self {
        Self {
            row_count: self.row_count,
            row_height: self.row_height.clone(),
            estimate_row_height: self.estimate_row_height.clone(),
            get_row_key: Arc::clone(&self.get_row_key),
            overscan: self.overscan,
            scrolling_delay_ms: self.scrolling_delay_ms,
            on_change: self.on_change.clone(),
        }
    }
}

impl WindowOptions<RowKey> {
    /// Fixed-size rows keyed by index.
    pub fn fixed(
        row_count: usize,
        row_height: impl Fn(usize) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::new(row_count, |i| i as u64).with_row_height(row_height)
    }

    /// Dynamically measured rows keyed by index.
    pub fn estimated(
        row_count: usize,
        estimate_row_height: impl Fn(usize) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::new(row_count, |i| i as u64).with_estimate_row_height(estimate_row_height)
    }
}

impl<K> WindowOptions<K> {
    /// Creates options with a row key mapping and no height strategy yet.
    ///
    /// One of [`Self::with_row_height`] or [`Self::with_estimate_row_height`] must be applied
    /// before the options are handed to a [`RowWindow`].
    pub fn new(
        row_count: usize,
        get_row_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            row_count,
            row_height: None,
            estimate_row_height: None,
            get_row_key: Arc::new(get_row_key),
            overscan: DEFAULT_OVERSCAN,
            scrolling_delay_ms: DEFAULT_SCROLLING_DELAY_MS,
            on_change: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_height.is_none() && self.estimate_row_height.is_none() {
            return Err(ConfigError::MissingHeightStrategy);
        }
        Ok(())
    }

    /// Returns `true` when a fixed row height function is configured.
    pub fn is_fixed_size(&self) -> bool {
        self.row_height.is_some()
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_row_height(mut self, f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        self.row_height = Some(Arc::new(f));
        self
    }

    pub fn with_estimate_row_height(
        mut self,
        f: impl Fn(usize) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.estimate_row_height = Some(Arc::new(f));
        self
    }

    pub fn with_get_row_key(mut self, f: impl Fn(usize) -> K + Send + Sync + 'static) -> Self {
        self.get_row_key = Arc::new(f);
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_scrolling_delay_ms(mut self, delay_ms: u64) -> Self {
        self.scrolling_delay_ms = delay_ms;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&RowWindow<K>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K> core::fmt::Debug for WindowOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("row_count", &self.row_count)
            .field("fixed_size", &self.row_height.is_some())
            .field("estimated", &self.estimate_row_height.is_some())
            .field("overscan", &self.overscan)
            .field("scrolling_delay_ms", &self.scrolling_delay_ms)
            .finish_non_exhaustive()
    }
}
