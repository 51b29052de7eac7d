use crate::*;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::vec::Vec;

use windowing::{Align, ConfigError, RowKey, WindowOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct El(u32);

const CONTAINER: El = El(1);

#[derive(Default, Debug)]
struct State {
    observed_size: Vec<El>,
    observed_scroll: Vec<El>,
    observed_rows: Vec<El>,
    scroll_offsets: HashMap<El, f64>,
    row_heights: HashMap<El, f64>,
    disconnected: Vec<El>,
    scroll_by_log: Vec<(El, f64)>,
    now_ms: u64,
    next_task: u64,
    timers: Vec<(u64, u64)>,
}

/// In-memory host with a manual clock. Clones share state so tests can inspect it after the
/// list takes ownership.
#[derive(Clone, Default, Debug)]
struct FakePlatform {
    state: Rc<RefCell<State>>,
}

impl FakePlatform {
    fn set_scroll(&self, el: El, offset: f64) {
        self.state.borrow_mut().scroll_offsets.insert(el, offset);
    }

    fn set_row_height(&self, el: El, height: f64) {
        self.state.borrow_mut().row_heights.insert(el, height);
    }

    fn disconnect(&self, el: El) {
        self.state.borrow_mut().disconnected.push(el);
    }

    /// Moves the clock forward and returns the tasks that came due.
    fn advance(&self, ms: u64) -> Vec<u64> {
        let mut s = self.state.borrow_mut();
        s.now_ms += ms;
        let now = s.now_ms;
        let (due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut s.timers)
            .into_iter()
            .partition(|(_, at)| *at <= now);
        s.timers = rest;
        due.into_iter().map(|(task, _)| task).collect()
    }

    fn subscriptions(&self) -> usize {
        let s = self.state.borrow();
        s.observed_size.len() + s.observed_scroll.len() + s.observed_rows.len() + s.timers.len()
    }

    fn observed_rows(&self) -> Vec<El> {
        self.state.borrow().observed_rows.clone()
    }

    fn scroll_by_log(&self) -> Vec<(El, f64)> {
        self.state.borrow().scroll_by_log.clone()
    }
}

impl Host for FakePlatform {
    type Element = El;
}

impl SizeObservation for FakePlatform {
    fn observe_size(&mut self, element: &El) {
        self.state.borrow_mut().observed_size.push(*element);
    }

    fn unobserve_size(&mut self, element: &El) {
        self.state.borrow_mut().observed_size.retain(|e| e != element);
    }
}

impl ScrollObservation for FakePlatform {
    fn observe_scroll(&mut self, element: &El) {
        self.state.borrow_mut().observed_scroll.push(*element);
    }

    fn unobserve_scroll(&mut self, element: &El) {
        self.state.borrow_mut().observed_scroll.retain(|e| e != element);
    }

    fn scroll_offset(&self, element: &El) -> f64 {
        self.state
            .borrow()
            .scroll_offsets
            .get(element)
            .copied()
            .unwrap_or(0.0)
    }

    fn scroll_by(&mut self, element: &El, delta: f64) {
        let mut s = self.state.borrow_mut();
        s.scroll_by_log.push((*element, delta));
        *s.scroll_offsets.entry(*element).or_insert(0.0) += delta;
    }
}

impl RowSizeObservation for FakePlatform {
    fn observe_row(&mut self, element: &El) {
        self.state.borrow_mut().observed_rows.push(*element);
    }

    fn unobserve_row(&mut self, element: &El) {
        self.state.borrow_mut().observed_rows.retain(|e| e != element);
    }

    fn is_connected(&self, element: &El) -> bool {
        !self.state.borrow().disconnected.contains(element)
    }

    fn row_height(&self, element: &El) -> f64 {
        self.state
            .borrow()
            .row_heights
            .get(element)
            .copied()
            .unwrap_or(0.0)
    }
}

impl Scheduler for FakePlatform {
    type Task = u64;

    fn schedule(&mut self, delay_ms: u64) -> u64 {
        let mut s = self.state.borrow_mut();
        let task = s.next_task;
        s.next_task += 1;
        let at = s.now_ms + delay_ms;
        s.timers.push((task, at));
        task
    }

    fn cancel(&mut self, task: u64) {
        self.state.borrow_mut().timers.retain(|(t, _)| *t != task);
    }
}

type List = VirtualList<RowKey, FakePlatform>;

fn list_with(
    options: WindowOptions,
    container: Option<El>,
) -> (List, FakePlatform, Rc<Cell<Option<El>>>) {
    let platform = FakePlatform::default();
    let slot = Rc::new(Cell::new(container));
    let accessor = {
        let slot = Rc::clone(&slot);
        move || slot.get()
    };
    let list = VirtualList::new(options, platform.clone(), accessor).unwrap();
    (list, platform, slot)
}

fn estimated_list() -> (List, FakePlatform) {
    let (list, platform, _) = list_with(WindowOptions::estimated(100, |_| 50.0), Some(CONTAINER));
    (list, platform)
}

fn advance(list: &mut List, ms: u64) {
    let fired = list.platform().advance(ms);
    for task in fired {
        list.on_timer(task);
    }
}

#[test]
fn missing_height_strategy_is_rejected() {
    let err = VirtualList::new(
        WindowOptions::new(10, |i| i as u64),
        FakePlatform::default(),
        || None,
    )
    .err();
    assert_eq!(err, Some(ConfigError::MissingHeightStrategy));
}

#[test]
fn activate_observes_container_and_reads_offset() {
    let (mut list, platform) = estimated_list();
    platform.set_scroll(CONTAINER, 120.0);
    assert!(!list.is_active());
    assert_eq!(platform.subscriptions(), 0);

    list.activate();
    assert!(list.is_active());
    assert_eq!(list.container(), Some(&CONTAINER));
    assert_eq!(list.scroll_offset(), 120.0);
    {
        let s = platform.state.borrow();
        assert_eq!(s.observed_size, [CONTAINER]);
        assert_eq!(s.observed_scroll, [CONTAINER]);
    }

    // Activating twice does not double-subscribe.
    list.activate();
    assert_eq!(platform.subscriptions(), 2);
}

#[test]
fn missing_container_is_a_noop() {
    let (mut list, platform, _) = list_with(WindowOptions::estimated(100, |_| 50.0), None);
    list.activate();
    assert!(list.is_active());
    assert_eq!(list.container(), None);
    assert_eq!(platform.subscriptions(), 0);

    list.on_scroll(&CONTAINER);
    list.on_container_resize(&CONTAINER, 500.0);
    assert!(!list.is_scrolling());
    assert_eq!(list.container_height(), 0.0);
}

#[test]
fn inactive_list_ignores_container_events() {
    let (mut list, platform) = estimated_list();
    platform.set_scroll(CONTAINER, 300.0);
    list.on_scroll(&CONTAINER);
    list.on_container_resize(&CONTAINER, 500.0);
    assert_eq!(list.scroll_offset(), 0.0);
    assert_eq!(list.container_height(), 0.0);
    assert!(!list.is_scrolling());
}

#[test]
fn container_swap_moves_subscriptions() {
    let (mut list, platform, slot) =
        list_with(WindowOptions::estimated(100, |_| 50.0), Some(CONTAINER));
    list.activate();

    let next = El(2);
    platform.set_scroll(next, 75.0);
    slot.set(Some(next));
    list.refresh_container();

    assert_eq!(list.container(), Some(&next));
    assert_eq!(list.scroll_offset(), 75.0);
    {
        let s = platform.state.borrow();
        assert_eq!(s.observed_size, [next]);
        assert_eq!(s.observed_scroll, [next]);
    }

    // Events from the old container are stale.
    list.on_container_resize(&CONTAINER, 900.0);
    assert_eq!(list.container_height(), 0.0);
    list.on_container_resize(&next, 400.0);
    assert_eq!(list.container_height(), 400.0);
}

#[test]
fn replacing_the_container_accessor_releases_the_old_container() {
    let (mut list, platform) = estimated_list();
    list.activate();
    list.on_scroll(&CONTAINER);
    assert!(list.is_scrolling());

    let next = El(3);
    platform.set_scroll(next, 40.0);
    list.set_container_accessor(move || Some(next));

    assert_eq!(list.container(), Some(&next));
    assert_eq!(list.scroll_offset(), 40.0);
    assert!(!list.is_scrolling());
    assert!(!list.scroll_activity().is_pending());
    {
        let s = platform.state.borrow();
        assert_eq!(s.observed_size, [next]);
        assert_eq!(s.observed_scroll, [next]);
        assert!(s.timers.is_empty());
    }

    // The old container no longer drives the list.
    list.on_scroll(&CONTAINER);
    assert!(!list.is_scrolling());
}

#[test]
fn replacing_the_accessor_while_inactive_subscribes_on_activate() {
    let (mut list, platform) = estimated_list();
    let next = El(3);
    list.set_container_accessor(move || Some(next));
    assert_eq!(platform.subscriptions(), 0);

    list.activate();
    assert_eq!(list.container(), Some(&next));
    assert_eq!(platform.state.borrow().observed_size, [next]);
}

#[test]
fn container_resize_recomputes_window() {
    let (mut list, _) = estimated_list();
    list.activate();
    list.on_container_resize(&CONTAINER, 500.0);

    let range = list.window().range().unwrap();
    assert_eq!(range.visible_start, 0);
    assert_eq!(range.visible_end, 9);
    assert_eq!(list.start_index(), Some(0));
    assert_eq!(list.end_index(), Some(12));
    assert_eq!(list.total_height(), 5000.0);
}

#[test]
fn scrolling_settles_after_the_last_event() {
    let (mut list, platform) = estimated_list();
    list.activate();
    list.on_container_resize(&CONTAINER, 500.0);

    assert!(!list.scroll_activity().is_pending());
    platform.set_scroll(CONTAINER, 100.0);
    list.on_scroll(&CONTAINER);
    assert!(list.is_scrolling());
    assert!(list.scroll_activity().is_pending());
    assert_eq!(list.scroll_offset(), 100.0);

    advance(&mut list, 100);
    platform.set_scroll(CONTAINER, 150.0);
    list.on_scroll(&CONTAINER);
    assert_eq!(list.scroll_offset(), 150.0);

    // 300ms after the first event, but only 200ms after the second.
    advance(&mut list, 200);
    assert!(list.is_scrolling());

    advance(&mut list, 99);
    assert!(list.is_scrolling());

    advance(&mut list, 1);
    assert!(!list.is_scrolling());
    assert!(!list.scroll_activity().is_pending());
    assert_eq!(platform.subscriptions(), 2);
}

#[test]
fn stale_timer_is_ignored() {
    let (mut list, _) = estimated_list();
    list.activate();
    list.on_scroll(&CONTAINER);
    list.on_scroll(&CONTAINER);

    // Task 0 belonged to the first event and was cancelled by the second.
    list.on_timer(0);
    assert!(list.is_scrolling());
    assert!(list.scroll_activity().is_pending());
    list.on_timer(1);
    assert!(!list.is_scrolling());
}

#[test]
fn scroll_and_scrolling_flag_notify_once() {
    let hits = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let options = WindowOptions::estimated(100, |_| 50.0).with_on_change(Some({
        let hits = std::sync::Arc::clone(&hits);
        move |_: &windowing::RowWindow| {
            hits.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    }));
    let (mut list, platform, _) = list_with(options, Some(CONTAINER));
    list.activate();
    hits.store(0, std::sync::atomic::Ordering::Relaxed);

    platform.set_scroll(CONTAINER, 40.0);
    list.on_scroll(&CONTAINER);
    assert_eq!(hits.load(std::sync::atomic::Ordering::Relaxed), 1);
}

#[test]
fn attach_measures_once_and_observes_the_row() {
    let (mut list, platform) = estimated_list();
    list.activate();

    let row = El(10);
    platform.set_row_height(row, 80.0);
    list.attach(0, row);
    assert_eq!(platform.observed_rows(), [row]);
    assert_eq!(list.row_window().cached_height(&0), Some(80.0));
    assert_eq!(list.total_height(), 80.0 + 99.0 * 50.0);

    // Re-attaching the same element is a no-op, even if it grew meanwhile.
    platform.set_row_height(row, 90.0);
    list.attach(0, row);
    assert_eq!(platform.observed_rows(), [row]);
    assert_eq!(list.row_window().cached_height(&0), Some(80.0));

    // Later size changes arrive through the observer.
    list.on_row_resize(&row, 90.0);
    assert_eq!(list.row_window().cached_height(&0), Some(90.0));
    assert_eq!(list.attached_rows(), 1);
}

#[test]
fn attaching_a_new_element_replaces_the_old_one() {
    let (mut list, platform) = estimated_list();
    list.activate();

    platform.set_row_height(El(10), 60.0);
    platform.set_row_height(El(11), 70.0);
    list.attach(3, El(10));
    list.attach(3, El(11));

    assert_eq!(platform.observed_rows(), [El(11)]);
    // The row was already measured, so the new element's initial read does not override it.
    assert_eq!(list.row_window().cached_height(&3), Some(60.0));
    list.on_row_resize(&El(11), 70.0);
    assert_eq!(list.row_window().cached_height(&3), Some(70.0));
}

#[test]
fn set_row_element_none_detaches() {
    let (mut list, platform) = estimated_list();
    list.activate();
    platform.set_row_height(El(10), 60.0);

    list.set_row_element(4, Some(El(10)));
    assert_eq!(list.attached_rows(), 1);
    list.set_row_element(4, None);
    assert_eq!(list.attached_rows(), 0);
    assert!(platform.observed_rows().is_empty());

    // The measurement survives detachment.
    assert_eq!(list.row_window().cached_height(&4), Some(60.0));
}

#[test]
fn disconnected_row_is_unobserved_and_ignored() {
    let (mut list, platform) = estimated_list();
    list.activate();
    platform.set_row_height(El(10), 60.0);
    list.attach(0, El(10));

    platform.disconnect(El(10));
    list.on_row_resize(&El(10), 0.0);

    assert!(platform.observed_rows().is_empty());
    assert_eq!(list.row_window().cached_height(&0), Some(60.0));
    assert_eq!(list.discarded_signals(), 0);
}

#[test]
fn disconnected_element_is_never_attached() {
    let (mut list, platform) = estimated_list();
    list.activate();
    platform.disconnect(El(10));
    list.attach(0, El(10));
    assert_eq!(list.attached_rows(), 0);
    assert!(!list.row_window().is_measured(0));
}

#[test]
fn malformed_signals_are_counted_and_dropped() {
    let (mut list, platform, _) =
        list_with(WindowOptions::estimated(10, |_| 50.0), Some(CONTAINER));
    list.activate();
    let before = list.revision();

    list.on_row_resize(&El(99), 10.0);
    assert_eq!(list.discarded_signals(), 1);
    assert_eq!(list.last_signal_error(), Some(SignalError::UntrackedElement));

    list.attach(50, El(20));
    assert_eq!(list.discarded_signals(), 2);
    assert_eq!(
        list.last_signal_error(),
        Some(SignalError::IndexOutOfRange {
            index: 50,
            row_count: 10
        })
    );
    assert!(platform.observed_rows().is_empty());

    platform.set_row_height(El(21), -4.0);
    list.attach(2, El(21));
    assert_eq!(list.discarded_signals(), 3);
    assert!(matches!(
        list.last_signal_error(),
        Some(SignalError::InvalidExtent { index: 2, .. })
    ));

    assert_eq!(list.revision(), before);
    assert_eq!(list.row_window().measurement_cache_len(), 0);
}

#[test]
fn row_above_viewport_growing_shifts_scroll_and_container() {
    let (mut list, platform, _) =
        list_with(WindowOptions::estimated(100, |_| 100.0), Some(CONTAINER));
    platform.set_scroll(CONTAINER, 250.0);
    list.activate();
    list.on_container_resize(&CONTAINER, 500.0);
    assert_eq!(list.scroll_offset(), 250.0);

    platform.set_row_height(El(12), 150.0);
    list.attach(2, El(12));

    assert_eq!(list.scroll_offset(), 300.0);
    assert_eq!(platform.scroll_by_log(), [(CONTAINER, 50.0)]);
    assert_eq!(platform.scroll_offset(&CONTAINER), 300.0);
    assert_eq!(list.total_height(), 100.0 * 99.0 + 150.0);
}

#[test]
fn row_below_scroll_offset_does_not_shift_scroll() {
    let (mut list, platform, _) =
        list_with(WindowOptions::estimated(100, |_| 100.0), Some(CONTAINER));
    platform.set_scroll(CONTAINER, 250.0);
    list.activate();
    list.on_container_resize(&CONTAINER, 500.0);

    platform.set_row_height(El(13), 150.0);
    list.attach(3, El(13));

    assert_eq!(list.scroll_offset(), 250.0);
    assert!(platform.scroll_by_log().is_empty());
}

#[test]
fn fixed_rows_ignore_measurements() {
    let (mut list, platform, _) =
        list_with(WindowOptions::fixed(100, |_| 40.0), Some(CONTAINER));
    list.activate();
    platform.set_row_height(El(10), 80.0);
    list.attach(0, El(10));
    list.on_row_resize(&El(10), 120.0);

    assert_eq!(list.row_window().measurement_cache_len(), 0);
    assert_eq!(list.total_height(), 4000.0);
    assert_eq!(list.discarded_signals(), 0);
}

#[test]
fn scroll_to_index_moves_the_container() {
    let (mut list, platform) = estimated_list();
    list.activate();
    list.on_container_resize(&CONTAINER, 500.0);

    let target = list.scroll_to_index(10, Align::Start);
    assert_eq!(target, 500.0);
    assert_eq!(list.scroll_offset(), 500.0);
    assert_eq!(platform.scroll_by_log(), [(CONTAINER, 500.0)]);
    assert!(!list.is_scrolling());

    // Already there: nothing to mirror.
    list.scroll_to_index(10, Align::Start);
    assert_eq!(platform.scroll_by_log().len(), 1);
}

#[test]
fn deactivate_releases_every_subscription() {
    let (mut list, platform) = estimated_list();
    list.activate();
    list.on_scroll(&CONTAINER);
    list.attach(0, El(10));
    list.attach(1, El(11));
    assert_eq!(platform.subscriptions(), 5);
    assert!(list.scroll_activity().is_pending());

    list.deactivate();
    assert!(!list.is_active());
    assert!(!list.is_scrolling());
    assert!(!list.scroll_activity().is_pending());
    assert_eq!(list.container(), None);
    assert_eq!(list.attached_rows(), 0);
    assert_eq!(platform.subscriptions(), 0);

    // Reactivation resubscribes to the container only.
    list.activate();
    assert_eq!(platform.subscriptions(), 2);
}

#[test]
fn drop_releases_every_subscription() {
    let (mut list, platform) = estimated_list();
    list.activate();
    list.on_scroll(&CONTAINER);
    list.attach(0, El(10));
    assert_eq!(platform.subscriptions(), 4);

    drop(list);
    assert_eq!(platform.subscriptions(), 0);
}

#[test]
fn keyed_rows_keep_measurements_across_reorder() {
    let options = WindowOptions::new(3, |i| [10u64, 20, 30][i]).with_estimate_row_height(|_| 50.0);
    let (mut list, platform, _) = list_with(options, Some(CONTAINER));
    list.activate();
    platform.set_row_height(El(10), 90.0);
    list.attach(0, El(10));
    assert_eq!(list.virtual_rows()[0].height, 90.0);

    list.row_window_mut().set_get_row_key(|i| [30u64, 10, 20][i]);
    let heights: Vec<f64> = list.virtual_rows().iter().map(|r| r.height).collect();
    assert_eq!(heights, [50.0, 90.0, 50.0]);
}
