// crates/core/src/cursor.rs
//! Client-side stitching of successive full-sequence snapshots into one
//! continuous, bounded plot.
//!
//! The server always returns the whole current file. The cursor remembers
//! which file it last saw and how many samples it has already rendered, so
//! each poll contributes only the new suffix. A different label or a
//! shorter sequence means the stream restarted (rotation or truncation) and
//! everything is rendered afresh.

use std::collections::VecDeque;
use std::ops::Range;

use crate::types::SignalSnapshot;

/// What a single poll changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorUpdate {
    /// The rendered window was cleared before anything was appended.
    pub reset: bool,
    /// Logical indices of the samples appended by this poll.
    pub appended: Range<usize>,
}

impl CursorUpdate {
    pub fn is_noop(&self) -> bool {
        !self.reset && self.appended.is_empty()
    }
}

/// `(observed_filename, next_index, window)` state machine.
#[derive(Debug, Clone)]
pub struct StreamCursor {
    observed: String,
    next_index: usize,
    window: VecDeque<f64>,
    max_window: usize,
}

impl StreamCursor {
    /// Starts as `(empty, 0, empty)`. `max_window` is clamped to at least 1.
    pub fn new(max_window: usize) -> Self {
        Self {
            observed: String::new(),
            next_index: 0,
            window: VecDeque::new(),
            max_window: max_window.max(1),
        }
    }

    pub fn observed(&self) -> &str {
        &self.observed
    }

    /// Count of leading samples of the logical stream already rendered.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn max_window(&self) -> usize {
        self.max_window
    }

    /// The most recent `max_window` samples, oldest first.
    pub fn window(&self) -> Vec<f64> {
        self.window.iter().copied().collect()
    }

    /// Logical index of the first sample in [`Self::window`].
    pub fn window_start(&self) -> usize {
        self.next_index - self.window.len()
    }

    /// X-axis range `[max(0, next - max_window), next]` for the display.
    pub fn x_range(&self) -> (usize, usize) {
        (
            self.next_index.saturating_sub(self.max_window),
            self.next_index,
        )
    }

    /// Fold one poll result into the state.
    pub fn apply(&mut self, snapshot: &SignalSnapshot) -> CursorUpdate {
        let mut reset = false;
        if snapshot.filename != self.observed || snapshot.values.len() < self.next_index {
            self.window.clear();
            self.next_index = 0;
            self.observed.clone_from(&snapshot.filename);
            reset = true;
        }

        // Sentinels carry no renderable data even if a value slipped through.
        if !snapshot.is_renderable() {
            return CursorUpdate {
                reset,
                appended: self.next_index..self.next_index,
            };
        }

        let start = self.next_index;
        let total = snapshot.values.len();
        if total > start {
            self.window.extend(&snapshot.values[start..]);
            self.next_index = total;
            let excess = self.window.len().saturating_sub(self.max_window);
            self.window.drain(..excess);
        }

        CursorUpdate {
            reset,
            appended: start..self.next_index,
        }
    }
}
