//! Owner of a profile source and the timelines watching it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::data_types::{ProfileSource, TimelineConfig};
use crate::rendering::TimelineRenderer;
use crate::timeline::Timeline;

/// Something that wants to hear about newly recorded frames.
pub trait FrameListener<S: ?Sized> {
    fn new_data(&mut self, source: &S, thread_index: usize, frame_number: i32);
}

impl<S, R> FrameListener<S> for Timeline<R>
where
    S: ProfileSource + ?Sized,
    R: TimelineRenderer,
{
    fn new_data(&mut self, source: &S, thread_index: usize, frame_number: i32) {
        Timeline::new_data(self, source, thread_index, frame_number);
    }
}

/// Holds the data source and a registry of weak timeline handles.
///
/// Timelines are added with [`Monitor::register`] and must be removed with
/// [`Monitor::unregister`]; handles whose timeline was dropped are pruned on
/// the next dispatch.
pub struct Monitor<S> {
    source: S,
    timelines: Vec<Weak<RefCell<dyn FrameListener<S>>>>,
}

impl<S: ProfileSource> Monitor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            timelines: Vec::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Builds a timeline over the current data and registers it.
    pub fn open_timeline<R: TimelineRenderer + 'static>(
        &mut self,
        xsize: i32,
        ysize: i32,
        renderer: R,
        config: TimelineConfig,
    ) -> Rc<RefCell<Timeline<R>>>
    where
        S: 'static,
    {
        let timeline = Rc::new(RefCell::new(Timeline::with_config(
            &self.source,
            xsize,
            ysize,
            renderer,
            config,
        )));
        self.register(&timeline);
        timeline
    }

    pub fn register<T: FrameListener<S> + 'static>(&mut self, timeline: &Rc<RefCell<T>>) {
        if self.is_registered(timeline) {
            return;
        }
        let handle: Rc<RefCell<dyn FrameListener<S>>> = timeline.clone();
        self.timelines.push(Rc::downgrade(&handle));
        debug!(registered = self.timelines.len(), "timeline registered");
    }

    pub fn unregister<T: FrameListener<S> + 'static>(&mut self, timeline: &Rc<RefCell<T>>) {
        self.timelines
            .retain(|w| !std::ptr::addr_eq(w.as_ptr(), Rc::as_ptr(timeline)));
        debug!(registered = self.timelines.len(), "timeline unregistered");
    }

    pub fn is_registered<T: FrameListener<S> + 'static>(&self, timeline: &Rc<RefCell<T>>) -> bool {
        self.timelines
            .iter()
            .any(|w| std::ptr::addr_eq(w.as_ptr(), Rc::as_ptr(timeline)))
    }

    /// Number of live registered timelines.
    pub fn num_timelines(&self) -> usize {
        self.timelines.iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Tells every registered timeline that a frame became available.
    pub fn report_frame(&mut self, thread_index: usize, frame_number: i32) {
        self.timelines.retain(|w| w.strong_count() > 0);
        let live: Vec<_> = self.timelines.iter().filter_map(Weak::upgrade).collect();
        trace!(thread_index, frame_number, listeners = live.len(), "dispatching frame");
        for listener in live {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.new_data(&self.source, thread_index, frame_number),
                Err(_) => trace!(thread_index, frame_number, "listener busy, skipping frame"),
            }
        }
    }
}
