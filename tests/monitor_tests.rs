use std::cell::RefCell;
use std::rc::Rc;

use frame_timeline::data_types::{ClientData, Event, FrameData, TimelineConfig};
use frame_timeline::monitor::{FrameListener, Monitor};
use frame_timeline::rendering::{DrawCommand, RecordingRenderer};

fn frame(n: i32) -> FrameData {
    let s = n as f64 * 0.01;
    FrameData::new(s, s + 0.01).with_events([Event::start(0, s), Event::end(0, s + 0.01)])
}

#[derive(Default)]
struct Counter {
    seen: Vec<(usize, i32)>,
}

impl FrameListener<ClientData> for Counter {
    fn new_data(&mut self, _source: &ClientData, thread_index: usize, frame_number: i32) {
        self.seen.push((thread_index, frame_number));
    }
}

#[test]
fn test_open_timeline_loads_and_registers() {
    let mut data = ClientData::new();
    data.record_frame(0, 0, frame(0));
    let mut monitor = Monitor::new(data);

    let timeline = monitor.open_timeline(1000, 100, RecordingRenderer::new(), TimelineConfig::default());
    assert!(monitor.is_registered(&timeline));
    assert_eq!(monitor.num_timelines(), 1);
    assert_eq!(timeline.borrow().threads().get(0).unwrap().rows[0].len(), 1);
}

#[test]
fn test_report_frame_dispatches() {
    let mut monitor = Monitor::new(ClientData::new());
    let timeline = monitor.open_timeline(1000, 100, RecordingRenderer::new(), TimelineConfig::default());

    monitor.source_mut().record_frame(0, 0, frame(0));
    monitor.report_frame(0, 0);
    monitor.source_mut().record_frame(0, 1, frame(1));
    monitor.report_frame(0, 1);

    let timeline = timeline.borrow();
    assert_eq!(timeline.threads().get(0).unwrap().rows[0].len(), 2);
    let labels: Vec<_> = timeline
        .renderer()
        .bars()
        .filter_map(|c| match c {
            DrawCommand::Bar { label, .. } => Some(label.clone()),
            _ => None,
        })
        .collect();
    assert!(labels.contains(&"Frame 1".to_string()));
    assert_eq!(timeline.renderer().commands.last(), Some(&DrawCommand::Idle));
}

#[test]
fn test_unregister_stops_dispatch() {
    let mut monitor = Monitor::new(ClientData::new());
    let counter = Rc::new(RefCell::new(Counter::default()));
    monitor.register(&counter);
    monitor.register(&counter);
    assert_eq!(monitor.num_timelines(), 1);

    monitor.report_frame(0, 3);
    monitor.unregister(&counter);
    assert!(!monitor.is_registered(&counter));
    monitor.report_frame(0, 4);

    assert_eq!(counter.borrow().seen, vec![(0, 3)]);
}

#[test]
fn test_dropped_listeners_are_pruned() {
    let mut monitor = Monitor::new(ClientData::new());
    let kept = Rc::new(RefCell::new(Counter::default()));
    monitor.register(&kept);
    {
        let dropped = Rc::new(RefCell::new(Counter::default()));
        monitor.register(&dropped);
        assert_eq!(monitor.num_timelines(), 2);
    }
    assert_eq!(monitor.num_timelines(), 1);

    monitor.report_frame(1, 7);
    assert_eq!(kept.borrow().seen, vec![(1, 7)]);
}

#[test]
fn test_busy_listener_is_skipped() {
    let mut monitor = Monitor::new(ClientData::new());
    let busy = Rc::new(RefCell::new(Counter::default()));
    let idle = Rc::new(RefCell::new(Counter::default()));
    monitor.register(&busy);
    monitor.register(&idle);

    {
        let _held = busy.borrow();
        monitor.report_frame(0, 1);
    }
    monitor.report_frame(0, 2);

    assert_eq!(busy.borrow().seen, vec![(0, 2)]);
    assert_eq!(idle.borrow().seen, vec![(0, 1), (0, 2)]);
    assert_eq!(monitor.num_timelines(), 2);
}
