/// Default row key: the row index itself, for lists that never reorder.
pub type RowKey = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

/// Layout of a single row in the scroll axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowLayout<K> {
    pub key: K,
    pub index: usize,
    pub height: f64,
    /// Sum of the heights of every preceding row.
    pub offset_top: f64,
}

impl<K> RowLayout<K> {
    /// Trailing edge of the row (`offset_top + height`).
    pub fn end(&self) -> f64 {
        self.offset_top + self.height
    }
}

/// Index range of a computed window. All indexes are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    /// First row to render (includes overscan).
    pub start_index: usize,
    /// Last row to render (includes overscan).
    pub end_index: usize,
    /// First row intersecting the viewport.
    pub visible_start: usize,
    /// Last row intersecting the viewport.
    pub visible_end: usize,
}

impl WindowRange {
    /// Number of rows to render.
    pub fn rendered_count(&self) -> usize {
        self.end_index + 1 - self.start_index
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }
}

/// Viewport geometry and scroll state as last reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub container_height: f64,
    pub scroll_offset: f64,
    pub is_scrolling: bool,
}

/// Origin of a row measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasureKind {
    /// First measurement taken when a row element is attached. Skipped if the row already has a
    /// cached height.
    Initial,
    /// A size-change notification for an observed row. Always applied.
    Resize,
}

/// Outcome of [`crate::RowWindow::record_measurement`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Correction {
    /// Index out of range or invalid extent; nothing changed.
    Discarded,
    /// Fixed-size mode: measurements are not used.
    Ignored,
    /// The measurement did not change anything (already cached or equal to the cached value).
    Unchanged,
    /// The measurement was committed to the cache.
    Applied {
        /// `observed - previous` height of the row.
        delta: f64,
        /// Amount the scroll offset was moved to keep the content in place (`0.0` when the row
        /// starts at or below the scroll offset).
        scroll_adjustment: f64,
    },
}

impl Correction {
    /// Scroll adjustment the platform scroll container should mirror, if any.
    pub fn scroll_adjustment(&self) -> Option<f64> {
        match *self {
            Self::Applied {
                scroll_adjustment, ..
            } if scroll_adjustment != 0.0 => Some(scroll_adjustment),
            _ => None,
        }
    }
}
