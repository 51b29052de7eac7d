//! A headless list-windowing core.
//!
//! Given a row count, per-row heights and the viewport of a scroll container, this crate
//! computes the contiguous slice of rows that has to be materialized: a prefix-sum layout of
//! every row, the visible index range and a symmetric overscan margin around it.
//!
//! Row heights may be unknown up front. In dynamic-size mode an estimator stands in until the
//! rendering layer reports a real measurement, which is cached by row key. When a row above the
//! scroll offset turns out taller or shorter than estimated, the scroll offset is corrected by
//! the same amount so the content on screen does not jump.
//!
//! The crate is UI-agnostic. A rendering layer (or the `windowing-bridge` crate) provides:
//! - the container height
//! - the scroll offset and scrolling state
//! - measured row heights
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod error;
mod options;
mod oracle;
mod range;
mod types;
mod window;


pub use cache::{KeyCacheKey, MeasurementCache};
pub use error::ConfigError;
pub use options::{
    DEFAULT_OVERSCAN, DEFAULT_SCROLLING_DELAY_MS, HeightFn, OnChangeCallback, WindowOptions,
};
pub use oracle::HeightOracle;
pub use range::{RowSource, Window, compute_window};
pub use types::{Align, Correction, MeasureKind, RowKey, RowLayout, ViewportState, WindowRange};
pub use window::RowWindow;
