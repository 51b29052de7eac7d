use thiserror::Error;

/// A platform signal that could not be applied.
///
/// These are never returned to the caller: the signal is logged and dropped, and the previous
/// window stays in place until the next valid event.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SignalError {
    #[error("size change reported for an element that is not attached to a row")]
    UntrackedElement,
    #[error("row index {index} is out of range (row count {row_count})")]
    IndexOutOfRange { index: usize, row_count: usize },
    #[error("row {index} reported an invalid height {height}")]
    InvalidExtent { index: usize, height: f64 },
}
