// crates/client/src/sink.rs
//! Where the poller sends what it renders.

use std::io::Write;

/// Display capability driven by the poll loop.
///
/// Calls arrive in the order a chart would need them: `reset` when the
/// stream restarts, `extend` with only the new samples, then `relayout`
/// with the visible x range.
pub trait PlotSink {
    /// Clear everything; `label` is the new file name or a sentinel.
    fn reset(&mut self, label: &str);

    /// Append samples whose logical indices start at `start`.
    fn extend(&mut self, start: usize, values: &[f64]);

    /// Visible x range, `[max(0, next - window), next]`.
    fn relayout(&mut self, x_min: usize, x_max: usize);
}

/// Writes one line per event, for watching a stream from a terminal.
pub struct TerminalSink<W: Write> {
    out: W,
    label: String,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            label: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PlotSink for TerminalSink<W> {
    fn reset(&mut self, label: &str) {
        self.label = label.to_string();
        let _ = writeln!(self.out, "== {label}");
    }

    fn extend(&mut self, start: usize, values: &[f64]) {
        let Some(last) = values.last() else {
            return;
        };
        let _ = write!(
            self.out,
            "{} +{} @{} last={last:.5}",
            self.label,
            values.len(),
            start
        );
    }

    fn relayout(&mut self, x_min: usize, x_max: usize) {
        let _ = writeln!(self.out, " window=[{x_min}, {x_max}]");
    }
}
