//! Platform services consumed by [`crate::VirtualList`].
//!
//! The bridge never reaches into a UI toolkit directly. A host implements these traits over its
//! own element handles (DOM nodes, widget ids, ...) and forwards the matching events to the
//! `on_*` entry points of the list.
use core::fmt;

/// Element handles of the host.
pub trait Host {
    type Element: Clone + PartialEq + fmt::Debug;
}

/// Box-size observation of the scroll container.
///
/// Once observed, the host reports changes through [`crate::VirtualList::on_container_resize`].
pub trait SizeObservation: Host {
    fn observe_size(&mut self, element: &Self::Element);
    fn unobserve_size(&mut self, element: &Self::Element);
}

/// Scroll-position observation of the scroll container.
///
/// Once observed, the host reports every scroll event through
/// [`crate::VirtualList::on_scroll`].
pub trait ScrollObservation: Host {
    fn observe_scroll(&mut self, element: &Self::Element);
    fn unobserve_scroll(&mut self, element: &Self::Element);
    /// Current scroll offset of `element`.
    fn scroll_offset(&self, element: &Self::Element) -> f64;
    /// Moves the scroll position of `element` by `delta`.
    fn scroll_by(&mut self, element: &Self::Element, delta: f64);
}

/// Size observation of an arbitrary, changing set of row elements.
///
/// Observed rows report size changes through [`crate::VirtualList::on_row_resize`].
pub trait RowSizeObservation: Host {
    fn observe_row(&mut self, element: &Self::Element);
    fn unobserve_row(&mut self, element: &Self::Element);
    /// Whether the element is still part of the render tree.
    fn is_connected(&self, element: &Self::Element) -> bool;
    /// Current border-box height of the element.
    fn row_height(&self, element: &Self::Element) -> f64;
}

/// Cancellable one-shot timers.
///
/// A scheduled task that is not cancelled fires through [`crate::VirtualList::on_timer`].
pub trait Scheduler {
    type Task: Copy + PartialEq + fmt::Debug;

    fn schedule(&mut self, delay_ms: u64) -> Self::Task;
    fn cancel(&mut self, task: Self::Task);
}

/// Everything a [`crate::VirtualList`] needs from its host.
pub trait Platform: SizeObservation + ScrollObservation + RowSizeObservation + Scheduler {}

impl<T> Platform for T where
    T: SizeObservation + ScrollObservation + RowSizeObservation + Scheduler
{
}
