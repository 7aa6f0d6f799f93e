//! Rebuilds call-stack shaped bars from one frame's flat start/end markers.

use tracing::trace;

use crate::data_types::{CollectorId, FrameData, Interval};

/// An entry of the open-collector stack.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Slot {
    Open { collector: CollectorId, since: f64 },
    /// Closed ahead of a child; still occupies its depth until the child ends.
    Closed,
}

/// An interval together with the stack depth it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedInterval {
    pub depth: usize,
    pub interval: Interval,
}

/// Result of decomposing one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameLayout {
    pub bars: Vec<PlacedInterval>,
    /// Deepest stack size reached; the thread needs at least this many rows.
    pub depth: usize,
}

/// Decomposes `frame` into bars.
///
/// Open times are clamped to `floor`, and an interval never starts after it
/// ends. Collectors still open when the events run out end with the frame.
pub fn decompose_frame(
    frame: &FrameData,
    thread_index: usize,
    frame_number: i32,
    floor: f64,
) -> FrameLayout {
    let mut stack: Vec<Slot> = Vec::new();
    let mut layout = FrameLayout::default();

    let place = |layout: &mut FrameLayout,
                 depth: usize,
                 collector: CollectorId,
                 start: f64,
                 end: f64| {
        layout.bars.push(PlacedInterval {
            depth,
            interval: Interval {
                start: start.min(end),
                end,
                collector,
                thread_index,
                frame_number,
            },
        });
    };

    for event in &frame.events {
        if event.is_start {
            stack.push(Slot::Open {
                collector: event.collector,
                since: event.time.max(floor),
            });
            layout.depth = layout.depth.max(stack.len());
            continue;
        }

        match stack.last() {
            Some(&Slot::Open { collector, since }) if collector == event.collector => {
                stack.pop();
                place(&mut layout, stack.len(), collector, since, event.time);
                while stack.last() == Some(&Slot::Closed) {
                    stack.pop();
                }
            }
            Some(_) => {
                // Ended before a child: keep the slot so deeper depths don't shift.
                let found = stack.iter().rposition(|slot| {
                    matches!(slot, Slot::Open { collector, .. } if *collector == event.collector)
                });
                match found {
                    Some(depth) => {
                        if let Slot::Open { collector, since } = stack[depth] {
                            place(&mut layout, depth, collector, since, event.time);
                        }
                        stack[depth] = Slot::Closed;
                    }
                    None => trace!(
                        collector = event.collector,
                        frame_number,
                        "dropping end of collector that is not open"
                    ),
                }
            }
            None => trace!(
                collector = event.collector,
                frame_number,
                "dropping end event on empty stack"
            ),
        }
    }

    while let Some(slot) = stack.pop() {
        if let Slot::Open { collector, since } = slot {
            place(&mut layout, stack.len(), collector, since, frame.end);
        }
    }

    layout
}
