//! Per-thread depth rows and the global row numbering across threads.

use tracing::debug;

use crate::data_types::{FrameData, Row};
use crate::decompose::decompose_frame;

/// The depth rows of one thread.
#[derive(Clone, Debug, Default)]
pub struct ThreadRow {
    pub label: String,
    /// Global index of this thread's first row.
    pub row_offset: usize,
    pub rows: Vec<Row>,
    pub last_frame: Option<i32>,
}

impl ThreadRow {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Adds the bars of one frame. Returns true if the row count grew.
    pub fn update_bars(
        &mut self,
        thread_index: usize,
        frame_number: i32,
        frame: &FrameData,
        floor: f64,
    ) -> bool {
        let layout = decompose_frame(frame, thread_index, frame_number, floor);

        let rows_changed = layout.depth > self.rows.len();
        if rows_changed {
            debug!(
                thread_index,
                from = self.rows.len(),
                to = layout.depth,
                "thread row grew"
            );
            self.rows.resize_with(layout.depth, Row::new);
        }

        let mut touched = vec![false; self.rows.len()];
        for placed in layout.bars {
            self.rows[placed.depth].push(placed.interval);
            touched[placed.depth] = true;
        }

        match self.last_frame {
            Some(last) if frame_number < last => {
                debug!(thread_index, frame_number, last, "out-of-order frame, re-sorting rows");
                for (row, _) in self.rows.iter_mut().zip(&touched).filter(|(_, t)| **t) {
                    row.sort();
                }
            }
            _ => self.last_frame = Some(frame_number),
        }

        rows_changed
    }
}

/// All thread rows of a timeline, indexed by thread index.
#[derive(Clone, Debug, Default)]
pub struct ThreadRows {
    threads: Vec<ThreadRow>,
}

impl ThreadRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn get(&self, thread_index: usize) -> Option<&ThreadRow> {
        self.threads.get(thread_index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThreadRow> {
        self.threads.iter()
    }

    /// Grows the registry so `thread_index` exists. Returns true if it grew.
    pub fn ensure(&mut self, thread_index: usize) -> bool {
        let grew = thread_index >= self.threads.len();
        while thread_index >= self.threads.len() {
            let row_offset = self
                .threads
                .last()
                .map_or(0, |prev| prev.row_offset + prev.num_rows() + 1);
            self.threads.push(ThreadRow {
                row_offset,
                ..Default::default()
            });
        }
        grew
    }

    pub fn set_label(&mut self, thread_index: usize, label: String) {
        if let Some(thread) = self.threads.get_mut(thread_index) {
            thread.label = label;
        }
    }

    /// Recomputes the offsets of every thread after `thread_index`.
    pub fn repair_offsets_after(&mut self, thread_index: usize) {
        let Some(thread) = self.threads.get(thread_index) else {
            return;
        };
        let mut offset = thread.row_offset + thread.num_rows() + 1;
        for thread in self.threads.iter_mut().skip(thread_index + 1) {
            thread.row_offset = offset;
            offset += thread.num_rows() + 1;
        }
    }

    /// Adds one frame of bars to a thread, growing the registry as needed.
    ///
    /// Returns true if the thread's row count grew, in which case the
    /// offsets of all later threads have already been repaired.
    pub fn ingest(
        &mut self,
        thread_index: usize,
        frame_number: i32,
        frame: &FrameData,
        label: String,
        floor: f64,
    ) -> bool {
        self.ensure(thread_index);
        let thread = &mut self.threads[thread_index];
        thread.label = label;
        let rows_changed = thread.update_bars(thread_index, frame_number, frame, floor);
        if rows_changed {
            self.repair_offsets_after(thread_index);
        }
        rows_changed
    }

    /// Maps a global row index to `(thread_index, depth)`.
    ///
    /// Separator rows and rows past the end map to `None`.
    pub fn locate(&self, row: usize) -> Option<(usize, usize)> {
        let mut found = None;
        for (thread_index, thread) in self.threads.iter().enumerate() {
            if thread.row_offset > row {
                break;
            }
            let depth = row - thread.row_offset;
            if depth < thread.num_rows() {
                found = Some((thread_index, depth));
            }
        }
        found
    }

    /// Total number of global rows, separators included.
    pub fn total_rows(&self) -> usize {
        self.threads
            .last()
            .map_or(0, |last| last.row_offset + last.num_rows() + 1)
    }
}

impl<'a> IntoIterator for &'a ThreadRows {
    type Item = &'a ThreadRow;
    type IntoIter = std::slice::Iter<'a, ThreadRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.threads.iter()
    }
}
