use frame_timeline::data_types::{ClientData, CollectorId, Event, FrameData, ProfileSource};
use frame_timeline::rendering::{DrawCommand, RecordingRenderer};
use frame_timeline::timeline::Timeline;
use frame_timeline::view_controller::NavKey;

const FRAME: f64 = 0.01;

fn frame(n: i32) -> FrameData {
    let s = n as f64 * FRAME;
    FrameData::new(s, s + FRAME).with_events([
        Event::start(0, s),
        Event::start(1, s + 0.001),
        Event::end(1, s + 0.004),
        Event::start(2, s + 0.005),
        Event::end(2, s + 0.008),
        Event::end(0, s + FRAME),
    ])
}

fn client(frames: i32) -> ClientData {
    let mut data = ClientData::new();
    data.define_collector(1, "Cull", "App:Cull");
    data.define_collector(2, "Draw", "App:Draw");
    data.set_thread_name(0, "Main");
    for n in 0..frames {
        data.record_frame(0, n, frame(n));
    }
    data
}

fn bar_labels(commands: &[DrawCommand]) -> Vec<String> {
    commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Bar { label, .. } => Some(label.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_initial_load() {
    let data = client(5);
    let timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    let thread = timeline.threads().get(0).unwrap();
    assert_eq!(thread.label, "Main");
    assert_eq!(thread.num_rows(), 2);
    assert_eq!(thread.rows[0].len(), 5);
    assert_eq!(thread.rows[1].len(), 10);
    assert_eq!(timeline.start_time(), 0.0);
    assert_eq!(timeline.lowest_start_time(), 0.0);
    assert!((timeline.highest_end_time() - 0.05).abs() < 1e-12);
    assert!(timeline.view().is_settled());
    assert!(timeline.renderer().commands.is_empty());
}

#[test]
fn test_hit_test_and_tooltip() {
    let data = client(5);
    let timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    let frame_bar = timeline.find_bar(0, 150).unwrap();
    assert_eq!(frame_bar.collector, 0);
    assert_eq!(frame_bar.frame_number, 1);

    let cull = timeline.find_bar(1, 15).unwrap();
    assert_eq!(cull.collector, 1);
    assert_eq!(cull.frame_number, 0);
    assert_eq!(timeline.bar_tooltip(&data, 1, 15), "App:Cull (3 ms)");

    assert!(timeline.find_bar(1, 45).is_none(), "gap between bars");
    assert_eq!(timeline.bar_tooltip(&data, 1, 45), "");
    assert!(timeline.find_bar(2, 15).is_none(), "separator row");
    assert!(timeline.find_bar(40, 15).is_none());
}

#[test]
fn test_force_redraw_draws_everything() {
    let data = client(5);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());
    timeline.force_redraw(&data);

    let commands = timeline.renderer_mut().take();
    assert_eq!(commands.first(), Some(&DrawCommand::Clear));
    assert_eq!(commands.get(1), Some(&DrawCommand::Begin));
    assert_eq!(commands.last(), Some(&DrawCommand::End));
    assert!(commands.contains(&DrawCommand::Separator(2)));

    let labels = bar_labels(&commands);
    assert_eq!(labels.len(), 15);
    assert!(labels.contains(&"Frame 0".to_string()));
    assert!(labels.contains(&"Cull".to_string()));
    assert!(labels.contains(&"Draw".to_string()));

    let guide_bars = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::GuideBar(..)))
        .count();
    assert!(guide_bars > 0);
}

#[test]
fn test_bars_are_clamped_to_widget() {
    let data = client(5);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());
    timeline.scroll_by(0.015);
    timeline.force_redraw(&data);

    let commands = timeline.renderer_mut().take();
    let frame1 = commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::Bar {
                from_x, to_x, label, ..
            } if label == "Frame 1" => Some((*from_x, *to_x)),
            _ => None,
        })
        .unwrap();
    assert_eq!(frame1.0, 0);
    assert!(frame1.1 > 0);
    assert!(!bar_labels(&commands).contains(&"Frame 0".to_string()));
}

#[test]
fn test_new_frame_appends_with_partial_redraw() {
    let mut data = client(5);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    data.record_frame(0, 5, frame(5));
    timeline.new_data(&data, 0, 5);

    let commands = timeline.renderer_mut().take();
    assert!(!commands.contains(&DrawCommand::Clear));
    assert_eq!(commands.first(), Some(&DrawCommand::Begin));
    assert_eq!(commands.last(), Some(&DrawCommand::Idle));
    assert!(bar_labels(&commands).contains(&"Frame 5".to_string()));
    assert_eq!(timeline.threads().get(0).unwrap().rows[0].len(), 6);
}

#[test]
fn test_deeper_frame_forces_full_redraw() {
    let mut data = client(2);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());
    timeline.take_threads_changed();

    let s = 2.0 * FRAME;
    data.record_frame(
        0,
        2,
        FrameData::new(s, s + FRAME).with_events([
            Event::start(0, s),
            Event::start(1, s + 0.001),
            Event::start(2, s + 0.002),
            Event::end(2, s + 0.003),
            Event::end(1, s + 0.004),
            Event::end(0, s + FRAME),
        ]),
    );
    timeline.new_data(&data, 0, 2);

    let commands = timeline.renderer_mut().take();
    assert_eq!(commands.first(), Some(&DrawCommand::Clear));
    assert!(commands.contains(&DrawCommand::Separator(3)));
    assert_eq!(timeline.threads().get(0).unwrap().num_rows(), 3);
    assert!(timeline.take_threads_changed());
}

#[test]
fn test_missing_frame_is_skipped() {
    let data = client(2);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    timeline.new_data(&data, 0, 99);
    timeline.new_data(&data, 7, 0);

    assert_eq!(timeline.renderer().commands, vec![DrawCommand::Idle, DrawCommand::Idle]);
    assert_eq!(timeline.threads().len(), 1);
}

#[test]
fn test_new_thread_updates_offsets() {
    let mut data = client(2);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    data.set_thread_name(2, "Loader");
    data.record_frame(2, 0, frame(0));
    timeline.new_data(&data, 2, 0);

    let threads = timeline.threads();
    assert_eq!(threads.len(), 3);
    let offsets: Vec<_> = threads.iter().map(|t| t.row_offset).collect();
    assert_eq!(offsets, vec![0, 3, 4]);
    assert_eq!(threads.get(2).unwrap().label, "Loader");
    assert_eq!(threads.locate(5), Some((2, 1)));
}

#[test]
fn test_first_frame_sets_start_time() {
    let mut data = ClientData::new();
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    data.record_frame(0, 40, frame(40));
    timeline.new_data(&data, 0, 40);
    assert!((timeline.start_time() - 0.4).abs() < 1e-12);
    assert!(timeline.view().is_settled());
    assert!((timeline.lowest_start_time() - 0.4).abs() < 1e-12);

    // A frame from before the window is clamped to the window start.
    data.record_frame(0, 39, frame(39));
    timeline.new_data(&data, 0, 39);
    assert!((timeline.lowest_start_time() - 0.39).abs() < 1e-12);
    for row in &timeline.threads().get(0).unwrap().rows {
        assert!(row.is_sorted());
        for bar in row {
            assert!(bar.start <= bar.end);
            assert!(bar.start >= timeline.lowest_start_time());
        }
    }
}

#[test]
fn test_partial_row_redraw_keeps_frame_together() {
    let data = client(5);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    timeline.force_redraw_row(&data, 1, 0, 20);
    let commands = timeline.renderer_mut().take();
    assert_eq!(commands.first(), Some(&DrawCommand::Begin));
    assert_eq!(commands.last(), Some(&DrawCommand::End));
    assert_eq!(bar_labels(&commands), vec!["Cull", "Draw"]);

    timeline.force_redraw_row(&data, 2, 0, 1000);
    assert!(bar_labels(&timeline.renderer_mut().take()).is_empty());
}

#[test]
fn test_resize() {
    let data = client(5);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    timeline.changed_size(&data, 1000, 200);
    assert!(timeline.renderer().commands.is_empty());

    timeline.changed_size(&data, 500, 300);
    assert_eq!(timeline.renderer().commands.first(), Some(&DrawCommand::Clear));
    assert_eq!((timeline.xsize(), timeline.ysize()), (500, 300));
    assert!((timeline.horizontal_scale() - 0.05).abs() < 1e-12);
    assert_eq!(timeline.horizontal_scroll(), timeline.start_time());
}

#[test]
fn test_idle_tick_reports_done() {
    let data = client(5);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());
    let (start, scale) = (timeline.start_time(), timeline.time_scale());

    assert!(!timeline.tick(&data, 1.0, 1.0 / 60.0));
    assert_eq!(timeline.start_time(), start);
    assert_eq!(timeline.time_scale(), scale);
    assert_eq!(timeline.renderer().commands.first(), Some(&DrawCommand::Clear));
}

#[test]
fn test_keys_drive_ticks() {
    let data = client(5);
    let mut timeline = Timeline::new(&data, 1000, 200, RecordingRenderer::new());

    timeline.key_down(NavKey::Right);
    assert!(timeline.tick(&data, 0.0, 0.1));
    assert!(timeline.start_time() > 0.0);
    timeline.key_up(NavKey::Right);

    let mut ticks = 0;
    while timeline.tick(&data, 0.0, 0.1) {
        ticks += 1;
        assert!(ticks < 100);
    }
    assert_eq!(timeline.navigation().scroll_speed, 0.0);
}

/// Hides the recorded frames of one thread.
struct MutedThread {
    data: ClientData,
    muted: usize,
}

impl ProfileSource for MutedThread {
    fn num_threads(&self) -> usize {
        self.data.num_threads()
    }

    fn thread_name(&self, thread_index: usize) -> String {
        self.data.thread_name(thread_index)
    }

    fn oldest_frame_number(&self, thread_index: usize) -> Option<i32> {
        self.data.oldest_frame_number(thread_index)
    }

    fn latest_frame_number(&self, thread_index: usize) -> Option<i32> {
        self.data.latest_frame_number(thread_index)
    }

    fn frame(&self, thread_index: usize, frame_number: i32) -> Option<&FrameData> {
        self.data.frame(thread_index, frame_number)
    }

    fn collector_name(&self, collector: CollectorId) -> String {
        self.data.collector_name(collector)
    }

    fn collector_fullname(&self, collector: CollectorId) -> String {
        self.data.collector_fullname(collector)
    }

    fn has_collector(&self, collector: CollectorId) -> bool {
        self.data.has_collector(collector)
    }

    fn has_thread_data(&self, thread_index: usize) -> bool {
        thread_index != self.muted
    }
}

#[test]
fn test_history_skips_threads_without_data() {
    let mut data = client(3);
    data.set_thread_name(1, "Loader");
    for n in 0..3 {
        data.record_frame(1, n, frame(n));
    }
    let source = MutedThread { data, muted: 1 };
    let timeline = Timeline::new(&source, 1000, 200, RecordingRenderer::new());

    let threads = timeline.threads();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads.get(0).unwrap().num_rows(), 2);
    assert_eq!(threads.get(1).unwrap().label, "Loader");
    assert_eq!(threads.get(1).unwrap().num_rows(), 0);
}
