// Example: estimated heights, lazy measurement and scroll correction.
use windowing::{MeasureKind, RowWindow, WindowOptions};

fn main() -> Result<(), windowing::ConfigError> {
    let mut w = RowWindow::new(WindowOptions::estimated(100, |_| 100.0))?;
    w.batch_update(|w| {
        w.set_container_height(300.0);
        w.set_scroll_offset(250.0);
    });

    println!(
        "before: off={} total={} range={:?}",
        w.scroll_offset(),
        w.total_height(),
        w.window().range()
    );

    // Row 2 starts above the scroll offset. Its real height replaces the estimate and the
    // offset moves by the same delta, so the rows on screen stay put.
    let correction = w.record_measurement(2, 150.0, MeasureKind::Initial);
    println!(
        "measure(2): {correction:?} off={} total={}",
        w.scroll_offset(),
        w.total_height()
    );

    // A row below the offset only changes the total.
    let correction = w.record_measurement(5, 80.0, MeasureKind::Initial);
    println!(
        "measure(5): {correction:?} off={} total={}",
        w.scroll_offset(),
        w.total_height()
    );
    Ok(())
}
