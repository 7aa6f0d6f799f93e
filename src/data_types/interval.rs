use std::cmp::Ordering;

use super::event::CollectorId;

/// A closed time range attributed to one collector within one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    pub collector: CollectorId,
    pub thread_index: usize,
    pub frame_number: i32,
}

impl Interval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Lookup order: by start, then by end.
    pub fn cmp_span(&self, other: &Interval) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then_with(|| self.end.total_cmp(&other.end))
    }
}

/// The bars at one stack depth of one thread.
///
/// Appends keep the row sorted as long as frames arrive in order; `sort` is
/// the bulk repair for the out-of-order case.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    bars: Vec<Interval>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bar: Interval) {
        self.bars.push(bar);
    }

    pub fn sort(&mut self) {
        self.bars.sort_by(Interval::cmp_span);
    }

    pub fn is_sorted(&self) -> bool {
        self.bars
            .windows(2)
            .all(|w| w[0].cmp_span(&w[1]) != Ordering::Greater)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Interval] {
        &self.bars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.bars.iter()
    }

    /// Index of the first bar whose end is not before `time`.
    pub fn first_ending_at_or_after(&self, time: f64) -> usize {
        self.bars.partition_point(|b| b.end < time)
    }

    /// Returns the bar covering `time`, if any.
    pub fn find(&self, time: f64) -> Option<&Interval> {
        let idx = self.bars.partition_point(|b| b.start < time);
        if let Some(bar) = self.bars.get(idx) {
            if bar.start == time {
                return Some(bar);
            }
        }
        idx.checked_sub(1)
            .and_then(|prev| self.bars.get(prev))
            .filter(|bar| bar.contains(time))
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
