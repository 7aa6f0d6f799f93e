/// Identifies a measured activity. Id 0 is the whole frame.
pub type CollectorId = u32;

/// The collector reserved for the frame itself.
pub const FRAME_COLLECTOR: CollectorId = 0;

/// One start or end marker from a thread's per-frame recording.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub collector: CollectorId,
    pub time: f64,
    pub is_start: bool,
}

impl Event {
    pub fn start(collector: CollectorId, time: f64) -> Self {
        Self {
            collector,
            time,
            is_start: true,
        }
    }

    pub fn end(collector: CollectorId, time: f64) -> Self {
        Self {
            collector,
            time,
            is_start: false,
        }
    }
}

/// A single measurement cycle of one thread.
///
/// Events are kept in emission order, which is not necessarily timestamp order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameData {
    pub start: f64,
    pub end: f64,
    pub events: Vec<Event>,
}

impl FrameData {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            events: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
