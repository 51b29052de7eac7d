use alloc::vec::Vec;

use crate::{RowLayout, WindowRange};

/// Row count, keys and heights as seen by the range calculator.
pub trait RowSource<K> {
    fn row_count(&self) -> usize;
    fn row_key(&self, index: usize) -> K;
    fn row_height(&self, index: usize, key: &K) -> f64;
}

/// A plain slice of heights, keyed by index.
impl RowSource<usize> for [f64] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row_key(&self, index: usize) -> usize {
        index
    }

    fn row_height(&self, index: usize, _key: &usize) -> f64 {
        self[index]
    }
}

/// The output of one range computation: the full row layout plus the window to render.
#[derive(Clone, Debug, PartialEq)]
pub struct Window<K> {
    rows: Vec<RowLayout<K>>,
    range: Option<WindowRange>,
    total_height: f64,
}

impl<K> Window<K> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            range: None,
            total_height: 0.0,
        }
    }

    /// Layout of every row, not just the windowed ones.
    pub fn rows(&self) -> &[RowLayout<K>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&RowLayout<K>> {
        self.rows.get(index)
    }

    /// Rows to render, in index order (overscan included).
    pub fn virtual_rows(&self) -> &[RowLayout<K>] {
        match self.range {
            Some(r) => &self.rows[r.start_index..=r.end_index],
            None => &[],
        }
    }

    /// `None` when the list is empty.
    pub fn range(&self) -> Option<WindowRange> {
        self.range
    }

    pub fn start_index(&self) -> Option<usize> {
        self.range.map(|r| r.start_index)
    }

    pub fn end_index(&self) -> Option<usize> {
        self.range.map(|r| r.end_index)
    }

    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    /// Returns the row whose span contains `offset`, clamped to the last row.
    ///
    /// Runs in `O(log n)` over the already computed prefix sums.
    pub fn index_at_offset(&self, offset: f64) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        let consumed = self.rows.partition_point(|row| row.end() <= offset);
        Some(consumed.min(self.rows.len() - 1))
    }
}

impl<K> Default for Window<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Lays out every row and picks the window to render.
///
/// The visible range starts at the first row whose trailing edge passes `scroll_offset` and ends
/// at the first row whose trailing edge reaches `scroll_offset + viewport_extent`. Either bound
/// falls back to the last row when no row qualifies, and the end never precedes the start.
/// `overscan` then widens the range on both sides, clamped to the list.
///
/// This is a full `O(row_count)` pass; nothing is carried over between calls.
pub fn compute_window<K, S>(
    rows: &S,
    viewport_extent: f64,
    scroll_offset: f64,
    overscan: usize,
) -> Window<K>
where
    S: RowSource<K> + ?Sized,
{
    let count = rows.row_count();
    if count == 0 {
        return Window::empty();
    }

    let range_end = scroll_offset + viewport_extent;
    let mut layout = Vec::with_capacity(count);
    let mut total = 0.0f64;
    let mut visible_start = None;
    let mut visible_end = None;

    for index in 0..count {
        let key = rows.row_key(index);
        let height = rows.row_height(index, &key);
        let offset_top = total;
        total += height;

        if visible_start.is_none() && total > scroll_offset {
            visible_start = Some(index);
        }
        if visible_end.is_none() && total >= range_end {
            visible_end = Some(index);
        }

        layout.push(RowLayout {
            key,
            index,
            height,
            offset_top,
        });
    }

    let last = count - 1;
    let visible_start = visible_start.unwrap_or(last);
    // A zero-height viewport can stop the end at a row that ends exactly at the offset.
    let visible_end = visible_end.unwrap_or(last).max(visible_start);

    Window {
        rows: layout,
        range: Some(WindowRange {
            start_index: visible_start.saturating_sub(overscan),
            end_index: visible_end.saturating_add(overscan).min(last),
            visible_start,
            visible_end,
        }),
        total_height: total,
    }
}
