//! Platform observation bridge for the `windowing` crate.
//!
//! `windowing` computes windows from plain numbers. This crate connects it to a host UI:
//!
//! - container size and scroll offset tracking
//! - debounced "is scrolling" state driven by cancellable timers
//! - per-row size observation with lazy measurement and scroll correction
//! - subscription lifecycle (activate, deactivate, container changes, drop)
//!
//! Hosts implement the traits in [`platform`] over their own element handles and forward
//! events to [`VirtualList`]. No UI toolkit is referenced here.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod activity;
mod error;
mod list;
pub mod platform;
mod rows;

#[cfg(test)]
mod tests;

pub use activity::ScrollActivity;
pub use error::SignalError;
pub use list::{ContainerAccessor, VirtualList};
pub use platform::{
    Host, Platform, RowSizeObservation, Scheduler, ScrollObservation, SizeObservation,
};
