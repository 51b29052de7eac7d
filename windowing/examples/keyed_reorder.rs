// Example: measurements follow keys after reorder.
use windowing::{MeasureKind, RowWindow, WindowOptions};

fn main() -> Result<(), windowing::ConfigError> {
    let ids = ["alpha", "beta", "gamma"];
    let mut w = RowWindow::new(
        WindowOptions::new(ids.len(), move |i| ids[i]).with_estimate_row_height(|_| 20.0),
    )?;
    w.record_measurement(0, 64.0, MeasureKind::Initial);
    print_rows("before reorder", &w);

    // The data set was reversed; "alpha" now lives at index 2 and keeps its measured height.
    w.set_get_row_key(move |i| ids[ids.len() - 1 - i]);
    print_rows("after reorder", &w);
    Ok(())
}

fn print_rows(label: &str, w: &RowWindow<&'static str>) {
    println!("{label}:");
    for row in w.window().rows() {
        println!(
            "  #{} {:<6} top={:<5} height={}",
            row.index, row.key, row.offset_top, row.height
        );
    }
}
