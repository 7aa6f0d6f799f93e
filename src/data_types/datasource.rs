use std::collections::{BTreeMap, HashMap};

use super::event::{CollectorId, FrameData, FRAME_COLLECTOR};

/// Read-only view of the recorded profiling data.
///
/// A timeline borrows its source for the duration of each call and never
/// keeps references into it.
pub trait ProfileSource {
    fn num_threads(&self) -> usize;

    fn thread_name(&self, thread_index: usize) -> String;

    fn oldest_frame_number(&self, thread_index: usize) -> Option<i32>;

    fn latest_frame_number(&self, thread_index: usize) -> Option<i32>;

    fn frame(&self, thread_index: usize, frame_number: i32) -> Option<&FrameData>;

    fn collector_name(&self, collector: CollectorId) -> String;

    /// Hierarchical name, e.g. `App:Cull:Traverse`.
    fn collector_fullname(&self, collector: CollectorId) -> String;

    fn has_collector(&self, collector: CollectorId) -> bool;

    /// Whether any frame is currently recorded for the thread.
    fn has_thread_data(&self, thread_index: usize) -> bool {
        self.oldest_frame_number(thread_index).is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectorDef {
    pub name: String,
    pub fullname: String,
}

#[derive(Clone, Debug, Default)]
pub struct ThreadRecord {
    pub name: String,
    frames: BTreeMap<i32, FrameData>,
}

impl ThreadRecord {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// In-memory store of per-thread frames and collector definitions.
#[derive(Clone, Debug, Default)]
pub struct ClientData {
    threads: Vec<ThreadRecord>,
    collectors: HashMap<CollectorId, CollectorDef>,
}

impl ClientData {
    pub fn new() -> Self {
        let mut data = Self::default();
        data.define_collector(FRAME_COLLECTOR, "Frame", "Frame");
        data
    }

    pub fn define_collector(
        &mut self,
        collector: CollectorId,
        name: impl Into<String>,
        fullname: impl Into<String>,
    ) {
        self.collectors.insert(
            collector,
            CollectorDef {
                name: name.into(),
                fullname: fullname.into(),
            },
        );
    }

    /// Names a thread, creating it (and any lower-indexed ones) if needed.
    pub fn set_thread_name(&mut self, thread_index: usize, name: impl Into<String>) {
        self.thread_mut(thread_index).name = name.into();
    }

    pub fn record_frame(&mut self, thread_index: usize, frame_number: i32, frame: FrameData) {
        self.thread_mut(thread_index).frames.insert(frame_number, frame);
    }

    /// Drops every frame numbered below `frame_number`, on all threads.
    pub fn expire_before(&mut self, frame_number: i32) {
        for thread in &mut self.threads {
            thread.frames = thread.frames.split_off(&frame_number);
        }
    }

    pub fn thread(&self, thread_index: usize) -> Option<&ThreadRecord> {
        self.threads.get(thread_index)
    }

    fn thread_mut(&mut self, thread_index: usize) -> &mut ThreadRecord {
        if thread_index >= self.threads.len() {
            self.threads.resize_with(thread_index + 1, ThreadRecord::default);
        }
        &mut self.threads[thread_index]
    }
}

impl ProfileSource for ClientData {
    fn num_threads(&self) -> usize {
        self.threads.len()
    }

    fn thread_name(&self, thread_index: usize) -> String {
        match self.threads.get(thread_index) {
            Some(thread) if !thread.name.is_empty() => thread.name.clone(),
            _ => format!("Thread {}", thread_index),
        }
    }

    fn oldest_frame_number(&self, thread_index: usize) -> Option<i32> {
        self.threads
            .get(thread_index)?
            .frames
            .first_key_value()
            .map(|(n, _)| *n)
    }

    fn latest_frame_number(&self, thread_index: usize) -> Option<i32> {
        self.threads
            .get(thread_index)?
            .frames
            .last_key_value()
            .map(|(n, _)| *n)
    }

    fn frame(&self, thread_index: usize, frame_number: i32) -> Option<&FrameData> {
        self.threads.get(thread_index)?.frames.get(&frame_number)
    }

    fn collector_name(&self, collector: CollectorId) -> String {
        self.collectors
            .get(&collector)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Collector {}", collector))
    }

    fn collector_fullname(&self, collector: CollectorId) -> String {
        self.collectors
            .get(&collector)
            .map(|c| c.fullname.clone())
            .unwrap_or_else(|| format!("Collector {}", collector))
    }

    fn has_collector(&self, collector: CollectorId) -> bool {
        self.collectors.contains_key(&collector)
    }
}
