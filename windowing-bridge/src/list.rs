use alloc::boxed::Box;

use windowing::{
    Align, ConfigError, KeyCacheKey, MeasureKind, RowLayout, RowWindow, Window, WindowOptions,
};

use crate::SignalError;
use crate::activity::ScrollActivity;
use crate::platform::Platform;
use crate::rows::RowRegistry;

/// Returns the current scroll container, if there is one yet.
pub type ContainerAccessor<E> = Box<dyn Fn() -> Option<E>>;

/// A [`RowWindow`] wired to a host platform.
///
/// The list owns every platform subscription it makes. Hosts drive it by:
/// - calling [`Self::activate`] / [`Self::deactivate`] with the lifecycle of the list view
/// - forwarding container resize, scroll, row resize and timer events to the `on_*` methods
/// - attaching each rendered row element with [`Self::attach`] (or [`Self::set_row_element`])
///
/// The rendering layer reads the window through the accessors and never mutates viewport state
/// or the measurement cache directly.
pub struct VirtualList<K, P: Platform> {
    window: RowWindow<K>,
    platform: P,
    container: ContainerAccessor<P::Element>,
    attached: Option<P::Element>,
    active: bool,
    activity: ScrollActivity<P::Task>,
    rows: RowRegistry<P::Element>,
    discarded_signals: usize,
    last_signal_error: Option<SignalError>,
}

impl<K: KeyCacheKey, P: Platform> VirtualList<K, P> {
    /// Validates `options` and builds an inactive list. Nothing is observed until
    /// [`Self::activate`].
    pub fn new(
        options: WindowOptions<K>,
        platform: P,
        container: impl Fn() -> Option<P::Element> + 'static,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            window: RowWindow::new(options)?,
            platform,
            container: Box::new(container),
            attached: None,
            active: false,
            activity: ScrollActivity::new(),
            rows: RowRegistry::new(),
            discarded_signals: 0,
            last_signal_error: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Subscribes to the scroll container, if the accessor returns one, and reads the scroll
    /// offset once.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        wdebug!("VirtualList::activate");
        self.attach_container();
    }

    /// Releases every subscription: container size, scroll, rows and the pending quiescence
    /// timer.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        wdebug!("VirtualList::deactivate");
        self.release_subscriptions();
        self.active = false;
        self.window.set_is_scrolling(false);
    }

    /// Re-queries the container accessor and moves the subscriptions when the handle changed.
    pub fn refresh_container(&mut self) {
        if !self.active {
            return;
        }
        let next = (self.container)();
        if next == self.attached {
            return;
        }
        wdebug!(from = ?self.attached, to = ?next, "scroll container changed");
        self.detach_container();
        self.window.set_is_scrolling(false);
        self.attach_container();
    }

    /// Replaces the container accessor and reattaches if the list is active.
    pub fn set_container_accessor(
        &mut self,
        container: impl Fn() -> Option<P::Element> + 'static,
    ) {
        self.container = Box::new(container);
        self.refresh_container();
    }

    /// Host event: the scroll container's box size changed.
    pub fn on_container_resize(&mut self, element: &P::Element, height: f64) {
        if !self.is_current_container(element) {
            wtrace!(?element, "resize for a container that is not observed");
            return;
        }
        self.window.set_container_height(height);
    }

    /// Host event: the scroll container scrolled.
    pub fn on_scroll(&mut self, element: &P::Element) {
        if !self.is_current_container(element) {
            wtrace!(?element, "scroll for a container that is not observed");
            return;
        }
        let offset = self.platform.scroll_offset(element);
        let delay_ms = self.window.scrolling_delay_ms();
        self.activity.restart(&mut self.platform, delay_ms);
        self.window.batch_update(|w| {
            w.set_scroll_offset(offset);
            w.set_is_scrolling(true);
        });
    }

    /// Host event: a scheduled task fired.
    pub fn on_timer(&mut self, task: P::Task) {
        if self.activity.fire(task) {
            wtrace!("scrolling settled");
            self.window.set_is_scrolling(false);
        }
    }

    /// Host event: an observed row element changed size.
    ///
    /// Disconnected elements are unobserved and ignored. Signals that cannot be mapped to a
    /// valid row are logged and dropped.
    pub fn on_row_resize(&mut self, element: &P::Element, height: f64) {
        if !self.platform.is_connected(element) {
            wtrace!(?element, "row element detached, dropping observation");
            if self.rows.remove_element(element).is_some() {
                self.platform.unobserve_row(element);
            }
            return;
        }
        let Some(index) = self.rows.index_of(element) else {
            self.report(SignalError::UntrackedElement);
            return;
        };
        self.measure(index, height, MeasureKind::Resize);
    }

    /// Attaches the element rendering row `index` for size observation and measures it once.
    ///
    /// Attaching the same element to the same row again is a no-op. An element previously
    /// attached to this row is detached first.
    pub fn attach(&mut self, index: usize, element: P::Element) {
        let row_count = self.window.row_count();
        if index >= row_count {
            self.report(SignalError::IndexOutOfRange { index, row_count });
            return;
        }
        if self.rows.element_at(index) == Some(&element) {
            return;
        }
        if let Some(prev) = self.rows.remove_index(index) {
            self.platform.unobserve_row(&prev);
        }
        if !self.platform.is_connected(&element) {
            wtrace!(index, ?element, "attach: element is not connected");
            if self.rows.remove_element(&element).is_some() {
                self.platform.unobserve_row(&element);
            }
            return;
        }
        if self.rows.insert(index, element.clone()) {
            self.platform.observe_row(&element);
        }
        let height = self.platform.row_height(&element);
        self.measure(index, height, MeasureKind::Initial);
    }

    /// Ref-callback style attachment: `Some` attaches, `None` detaches whatever element was
    /// attached to row `index`.
    pub fn set_row_element(&mut self, index: usize, element: Option<P::Element>) {
        match element {
            Some(element) => self.attach(index, element),
            None => {
                if let Some(prev) = self.rows.remove_index(index) {
                    self.platform.unobserve_row(&prev);
                }
            }
        }
    }

    /// Stops observing `element`.
    pub fn detach(&mut self, element: &P::Element) {
        if self.rows.remove_element(element).is_some() {
            self.platform.unobserve_row(element);
        }
    }

    /// Scrolls the container so that row `index` is aligned as requested. Returns the target
    /// offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> f64 {
        let target = self.window.scroll_to_index_offset(index, align);
        let delta = target - self.window.scroll_offset();
        if delta != 0.0 {
            if let Some(container) = &self.attached {
                self.platform.scroll_by(container, delta);
            }
        }
        self.window.set_scroll_offset(target);
        target
    }

    pub fn window(&self) -> &Window<K> {
        self.window.window()
    }

    pub fn row_window(&self) -> &RowWindow<K> {
        &self.window
    }

    /// Row count, heights, overscan and key changes go through the wrapped [`RowWindow`].
    pub fn row_window_mut(&mut self) -> &mut RowWindow<K> {
        &mut self.window
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

    pub fn is_scrolling(&self) -> bool {
        self.window.is_scrolling()
    }

    pub fn scroll_offset(&self) -> f64 {
        self.window.scroll_offset()
    }

    pub fn container_height(&self) -> f64 {
        self.window.container_height()
    }

    pub fn revision(&self) -> u64 {
        self.window.revision()
    }

    /// The quiescence timer state behind [`Self::is_scrolling`].
    pub fn scroll_activity(&self) -> &ScrollActivity<P::Task> {
        &self.activity
    }

    pub fn container(&self) -> Option<&P::Element> {
        self.attached.as_ref()
    }

    pub fn attached_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of platform signals dropped as malformed.
    pub fn discarded_signals(&self) -> usize {
        self.discarded_signals
    }

    pub fn last_signal_error(&self) -> Option<SignalError> {
        self.last_signal_error
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn measure(&mut self, index: usize, height: f64, kind: MeasureKind) {
        let row_count = self.window.row_count();
        if index >= row_count {
            self.report(SignalError::IndexOutOfRange { index, row_count });
            return;
        }
        if !(height.is_finite() && height >= 0.0) {
            self.report(SignalError::InvalidExtent { index, height });
            return;
        }

        let correction = self.window.record_measurement(index, height, kind);
        if let (Some(delta), Some(container)) = (correction.scroll_adjustment(), &self.attached) {
            wtrace!(index, delta, "mirroring scroll correction");
            self.platform.scroll_by(container, delta);
        }
    }

    fn report(&mut self, err: SignalError) {
        wwarn!(error = %err, "discarding malformed row signal");
        self.discarded_signals = self.discarded_signals.saturating_add(1);
        self.last_signal_error = Some(err);
    }

    fn is_current_container(&self, element: &P::Element) -> bool {
        self.active && self.attached.as_ref() == Some(element)
    }

    fn attach_container(&mut self) {
        let Some(container) = (self.container)() else {
            wtrace!("no scroll container yet");
            return;
        };
        self.platform.observe_size(&container);
        self.platform.observe_scroll(&container);
        let offset = self.platform.scroll_offset(&container);
        self.window.set_scroll_offset(offset);
        self.attached = Some(container);
    }
}

impl<K, P: Platform> VirtualList<K, P> {
    fn detach_container(&mut self) {
        self.activity.cancel(&mut self.platform);
        if let Some(container) = self.attached.take() {
            self.platform.unobserve_size(&container);
            self.platform.unobserve_scroll(&container);
        }
    }

    fn release_subscriptions(&mut self) {
        self.detach_container();
        for element in self.rows.drain() {
            self.platform.unobserve_row(&element);
        }
    }
}

impl<K, P: Platform> Drop for VirtualList<K, P> {
    fn drop(&mut self) {
        self.release_subscriptions();
    }
}

impl<K, P> core::fmt::Debug for VirtualList<K, P>
where
    K: core::fmt::Debug,
    P: Platform,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualList")
            .field("window", &self.window)
            .field("attached", &self.attached)
            .field("active", &self.active)
            .field("attached_rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}
