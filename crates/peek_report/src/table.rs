//! Plain-text value tables.
//!
//! One row for the window start, then one row for every tick inside the
//! window at which any listed trace changes. One column per trace.

use std::collections::BTreeSet;
use std::io::Write;

use peek_trace::{Tick, Trace};

use crate::error::ReportError;
use crate::window::Window;

/// Ticks at which the table has a row.
pub fn row_ticks(traces: &[&Trace], window: Window) -> Vec<Tick> {
    let mut ticks = BTreeSet::from([window.start]);
    for trace in traces {
        ticks.extend(
            trace
                .samples_in_range(window.start, window.stop)
                .iter()
                .map(|s| s.time),
        );
    }
    ticks.into_iter().collect()
}

/// Writes the value table for `traces` over `window`.
pub fn write_table<W: Write>(
    out: &mut W,
    traces: &[&Trace],
    window: Window,
) -> Result<(), ReportError> {
    let ticks = row_ticks(traces, window);
    log::debug!(
        "table of {} traces over {window}: {} rows",
        traces.len(),
        ticks.len()
    );

    let header: Vec<String> = std::iter::once("tick".to_string())
        .chain(traces.iter().map(|t| t.name().to_string()))
        .collect();
    let rows: Vec<Vec<String>> = ticks
        .iter()
        .map(|&tick| {
            std::iter::once(tick.to_string())
                .chain(traces.iter().map(|t| t.value_at(tick).to_string()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    write_row(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    write_row(out, &rule, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

/// Renders the value table to a string.
pub fn render_table(traces: &[&Trace], window: Window) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_table(&mut buf, traces, window)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> std::io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:>w$}"))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traces() -> (Trace, Trace) {
        let clk = Trace::from_samples("clk", 1, [(0, 0), (5, 1), (8, 0), (12, 1)]).unwrap();
        let data = Trace::from_samples("top.data", 8, [(0, 10), (6, 200)]).unwrap();
        (clk, data)
    }

    #[test]
    fn rows_at_window_start_and_changes() {
        let (clk, data) = traces();
        let w = Window::new(4, 10).unwrap();
        assert_eq!(row_ticks(&[&clk, &data], w), vec![4, 5, 6, 8]);
    }

    #[test]
    fn renders_aligned_columns() {
        let (clk, data) = traces();
        let table = render_table(&[&clk, &data], Window::new(4, 10).unwrap()).unwrap();
        let expected = "\
tick  clk  top.data
----  ---  --------
   4    0        10
   5    1        10
   6    1       200
   8    0       200
";
        assert_eq!(table, expected);
    }

    #[test]
    fn real_values_use_display() {
        let t = Trace::from_samples("v", 64, [(0, 0.5)]).unwrap();
        let table = render_table(&[&t], Window::new(0, 3).unwrap()).unwrap();
        assert!(table.ends_with("   0  0.5\n"), "{table}");
    }

    #[test]
    fn no_traces_lists_only_the_start() {
        let table = render_table(&[], Window::new(7, 9).unwrap()).unwrap();
        assert_eq!(table, "tick\n----\n   7\n");
    }
}
