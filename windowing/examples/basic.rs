// Example: fixed-size rows and the scroll-to helper.
use windowing::{Align, RowWindow, WindowOptions};

fn main() -> Result<(), windowing::ConfigError> {
    let mut w = RowWindow::new(WindowOptions::fixed(1_000_000, |_| 24.0))?;
    w.batch_update(|w| {
        w.set_container_height(480.0);
        w.set_scroll_offset(123_456.0);
    });

    println!("total_height={}", w.total_height());
    println!("range={:?}", w.window().range());
    println!("first_rendered={:?}", w.virtual_rows().first());

    let off = w.scroll_to_index(999_999, Align::End);
    println!("after scroll_to_index: offset={off} end={:?}", w.end_index());
    Ok(())
}
