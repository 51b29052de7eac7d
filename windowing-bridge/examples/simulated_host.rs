// Example: a minimal host driving a VirtualList with scroll, resize and timer events.
//
// Run with `RUST_LOG=windowing=trace,windowing_bridge=trace` to see the internal events.
use std::collections::HashMap;

use tracing_subscriber::EnvFilter;
use windowing::{Align, WindowOptions};
use windowing_bridge::{
    Host, RowSizeObservation, Scheduler, ScrollObservation, SizeObservation, VirtualList,
};

#[derive(Default, Debug)]
struct SimHost {
    scroll: HashMap<u32, f64>,
    heights: HashMap<u32, f64>,
    observed: Vec<u32>,
    now_ms: u64,
    timers: Vec<(u32, u64)>,
    next_task: u32,
}

impl SimHost {
    fn advance(&mut self, ms: u64) -> Vec<u32> {
        self.now_ms += ms;
        let now = self.now_ms;
        let (due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|(_, at)| *at <= now);
        self.timers = rest;
        due.into_iter().map(|(task, _)| task).collect()
    }
}

impl Host for SimHost {
    type Element = u32;
}

impl SizeObservation for SimHost {
    fn observe_size(&mut self, element: &u32) {
        self.observed.push(*element);
    }

    fn unobserve_size(&mut self, element: &u32) {
        self.observed.retain(|e| e != element);
    }
}

impl ScrollObservation for SimHost {
    fn observe_scroll(&mut self, _element: &u32) {}

    fn unobserve_scroll(&mut self, _element: &u32) {}

    fn scroll_offset(&self, element: &u32) -> f64 {
        self.scroll.get(element).copied().unwrap_or(0.0)
    }

    fn scroll_by(&mut self, element: &u32, delta: f64) {
        *self.scroll.entry(*element).or_insert(0.0) += delta;
    }
}

impl RowSizeObservation for SimHost {
    fn observe_row(&mut self, element: &u32) {
        self.observed.push(*element);
    }

    fn unobserve_row(&mut self, element: &u32) {
        self.observed.retain(|e| e != element);
    }

    fn is_connected(&self, _element: &u32) -> bool {
        true
    }

    fn row_height(&self, element: &u32) -> f64 {
        self.heights.get(element).copied().unwrap_or(40.0)
    }
}

impl Scheduler for SimHost {
    type Task = u32;

    fn schedule(&mut self, delay_ms: u64) -> u32 {
        let task = self.next_task;
        self.next_task += 1;
        self.timers.push((task, self.now_ms + delay_ms));
        task
    }

    fn cancel(&mut self, task: u32) {
        self.timers.retain(|(t, _)| *t != task);
    }
}

const CONTAINER: u32 = 0;

fn render(list: &mut VirtualList<u64, SimHost>) {
    let rows: Vec<usize> = list.virtual_rows().iter().map(|r| r.index).collect();
    for index in rows {
        // Row elements are identified by index + 1000 in this host.
        list.attach(index, index as u32 + 1000);
    }
    println!(
        "off={} scrolling={} range={:?} total={} observed_rows={}",
        list.scroll_offset(),
        list.is_scrolling(),
        list.window().range(),
        list.total_height(),
        list.attached_rows()
    );
}

fn main() -> Result<(), windowing::ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = SimHost::default();
    // Every fifth row renders taller than estimated.
    for i in (0..200u32).step_by(5) {
        host.heights.insert(i + 1000, 90.0);
    }

    let mut list = VirtualList::new(
        WindowOptions::estimated(200, |_| 40.0).with_overscan(2),
        host,
        || Some(CONTAINER),
    )?;
    list.activate();
    list.on_container_resize(&CONTAINER, 400.0);
    render(&mut list);

    for step in 1..=3 {
        list.platform_mut().scroll_by(&CONTAINER, 300.0);
        list.on_scroll(&CONTAINER);
        render(&mut list);
        let fired = list.platform_mut().advance(100 * step);
        for task in fired {
            list.on_timer(task);
        }
    }

    let fired = list.platform_mut().advance(1000);
    for task in fired {
        list.on_timer(task);
    }
    println!("settled: scrolling={}", list.is_scrolling());

    let target = list.scroll_to_index(150, Align::Center);
    println!("scroll_to_index(150) -> {target}");
    render(&mut list);

    list.deactivate();
    println!("after deactivate: observed={}", list.platform().observed.len());
    Ok(())
}
