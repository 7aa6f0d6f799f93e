//! The timeline view: ingestion, redraw dispatch, hit testing and animation.

use bytes::{Buf, BufMut};
use eyre::Result;
use tracing::{debug, info, trace};

use crate::data_types::{
    GuideBar, GuideBarUnits, Interval, ProfileSource, TimelineConfig, ViewState, FRAME_COLLECTOR,
};
use crate::guide_bars::{compute_guide_bars, GuideBarParams};
use crate::rendering::TimelineRenderer;
use crate::threads::ThreadRows;
use crate::transform::TimeTransform;
use crate::utils::format::format_number;
use crate::view_controller::{NavKey, NavigationState, ViewController, ViewParams};

/// A scrollable, zoomable view of per-thread call stacks over time.
///
/// The source is borrowed for each call that needs it; the timeline owns all
/// of its layout.
pub struct Timeline<R: TimelineRenderer = ()> {
    threads: ThreadRows,
    view: ViewParams,
    nav: NavigationState,
    have_start_time: bool,
    lowest_start_time: f64,
    highest_end_time: f64,
    guide_bars: Vec<GuideBar>,
    guide_bar_units: GuideBarUnits,
    threads_changed: bool,
    xsize: i32,
    ysize: i32,
    config: TimelineConfig,
    renderer: R,
}

impl<R: TimelineRenderer> Timeline<R> {
    pub fn new<S: ProfileSource + ?Sized>(source: &S, xsize: i32, ysize: i32, renderer: R) -> Self {
        Self::with_config(source, xsize, ysize, renderer, TimelineConfig::default())
    }

    /// Creates a timeline and loads everything the source currently holds.
    pub fn with_config<S: ProfileSource + ?Sized>(
        source: &S,
        xsize: i32,
        ysize: i32,
        renderer: R,
        config: TimelineConfig,
    ) -> Self {
        let mut timeline = Self {
            threads: ThreadRows::new(),
            view: ViewParams::new(0.0, config.initial_time_scale),
            nav: NavigationState::default(),
            have_start_time: false,
            lowest_start_time: 0.0,
            highest_end_time: 0.0,
            guide_bars: Vec::new(),
            guide_bar_units: config.guide_bar_units,
            threads_changed: false,
            xsize,
            ysize,
            config,
            renderer,
        };
        timeline.load_history(source);
        info!(
            threads = timeline.threads.len(),
            rows = timeline.threads.total_rows(),
            "timeline created"
        );
        timeline
    }

    fn load_history<S: ProfileSource + ?Sized>(&mut self, source: &S) {
        for thread_index in 0..source.num_threads() {
            let label = source.thread_name(thread_index);
            self.threads.ensure(thread_index);
            self.threads.set_label(thread_index, label.clone());
            self.threads_changed = true;
            if !source.has_thread_data(thread_index) {
                continue;
            }

            let (Some(oldest), Some(latest)) = (
                source.oldest_frame_number(thread_index),
                source.latest_frame_number(thread_index),
            ) else {
                continue;
            };

            for frame_number in oldest..=latest {
                let Some(frame) = source.frame(thread_index, frame_number) else {
                    continue;
                };
                self.note_bounds(frame.start, frame.end);
                self.threads.ingest(
                    thread_index,
                    frame_number,
                    frame,
                    label.clone(),
                    f64::NEG_INFINITY,
                );
            }
        }

        self.view.settle(self.lowest_start_time, self.view.time_scale);
        self.update_guide_bars();
    }

    fn note_bounds(&mut self, frame_start: f64, frame_end: f64) {
        if !self.have_start_time {
            self.have_start_time = true;
            self.lowest_start_time = frame_start;
            self.highest_end_time = frame_end;
        } else {
            self.lowest_start_time = self.lowest_start_time.min(frame_start);
            self.highest_end_time = self.highest_end_time.max(frame_end);
        }
    }

    /// Called as each frame becomes available. Frames may arrive out of
    /// order, and some may never arrive.
    pub fn new_data<S: ProfileSource + ?Sized>(
        &mut self,
        source: &S,
        thread_index: usize,
        frame_number: i32,
    ) {
        let Some(frame) = source.frame(thread_index, frame_number) else {
            trace!(thread_index, frame_number, "frame not available, skipping");
            self.renderer.idle();
            return;
        };
        let (frame_start, frame_end) = (frame.start, frame.end);

        if !self.have_start_time {
            self.view.settle(frame_start, self.view.time_scale);
        }
        self.note_bounds(frame_start, frame_end);

        let new_thread = thread_index >= self.threads.len();
        let rows_changed = self.threads.ingest(
            thread_index,
            frame_number,
            frame,
            source.thread_name(thread_index),
            self.view.start_time,
        );
        trace!(thread_index, frame_number, rows_changed, "ingested frame");

        if rows_changed || new_thread {
            self.threads_changed = true;
            self.update_guide_bars();
            self.force_redraw(source);
        } else {
            let transform = self.transform();
            if frame_end >= transform.start_time && frame_start <= transform.end_time() {
                self.update_guide_bars();
                self.renderer.begin_draw();
                self.draw_thread(source, thread_index, frame_start, frame_end);
                self.renderer.end_draw();
            }
        }

        self.renderer.idle();
    }

    /// To be called when the widget has been resized.
    pub fn changed_size<S: ProfileSource + ?Sized>(&mut self, source: &S, xsize: i32, ysize: i32) {
        if xsize != self.xsize || ysize != self.ysize {
            self.xsize = xsize;
            self.ysize = ysize;
            self.update_guide_bars();
            self.force_redraw(source);
        }
    }

    /// Clears the surface and redraws guide bars, every row and separators.
    pub fn force_redraw<S: ProfileSource + ?Sized>(&mut self, source: &S) {
        let transform = self.transform();
        self.renderer.clear_region();
        self.renderer.begin_draw();

        for bar in &self.guide_bars {
            let x = transform.timestamp_to_pixel(bar.time);
            if x > 0 && x < self.xsize - 1 {
                self.renderer.draw_guide_bar(x, bar.style);
            }
        }

        let (start_time, end_time) = (transform.start_time, transform.end_time());
        let mut num_rows = 0;
        for thread_index in 0..self.threads.len() {
            let depth = self.threads.get(thread_index).map_or(0, |t| t.num_rows());
            for row_index in 0..depth {
                self.draw_row(source, thread_index, row_index, start_time, end_time);
                num_rows += 1;
            }
            self.renderer.draw_separator(num_rows);
            num_rows += 1;
        }

        self.renderer.end_draw();
    }

    /// Redraws the pixel range `[from_x, to_x]` of one global row.
    pub fn force_redraw_row<S: ProfileSource + ?Sized>(
        &mut self,
        source: &S,
        row: usize,
        from_x: i32,
        to_x: i32,
    ) {
        let transform = self.transform();
        let start_time = transform.start_time.max(transform.pixel_to_timestamp(from_x));
        let end_time = transform.end_time().min(transform.pixel_to_timestamp(to_x));
        trace!(row, from_x, to_x, "partial redraw");

        self.renderer.begin_draw();
        if let Some((thread_index, row_index)) = self.threads.locate(row) {
            self.draw_row(source, thread_index, row_index, start_time, end_time);
        }
        self.renderer.end_draw();
    }

    fn draw_thread<S: ProfileSource + ?Sized>(
        &mut self,
        source: &S,
        thread_index: usize,
        start_time: f64,
        end_time: f64,
    ) {
        let depth = self.threads.get(thread_index).map_or(0, |t| t.num_rows());
        for row_index in 0..depth {
            self.draw_row(source, thread_index, row_index, start_time, end_time);
        }
    }

    /// Draws the bars of one row overlapping `[start_time, end_time]`.
    ///
    /// A frame whose first bar is drawn is always drawn to its end, even
    /// past `end_time`.
    fn draw_row<S: ProfileSource + ?Sized>(
        &mut self,
        source: &S,
        thread_index: usize,
        row_index: usize,
        start_time: f64,
        end_time: f64,
    ) {
        let transform = self.transform();
        let Some(thread) = self.threads.get(thread_index) else {
            return;
        };
        let Some(row) = thread.rows.get(row_index) else {
            return;
        };

        let first = row.first_ending_at_or_after(start_time);
        let bars = &row.bars()[first..];
        let Some(frame_number) = bars.first().map(|b| b.frame_number) else {
            return;
        };

        let global_row = thread.row_offset + row_index;
        for bar in bars {
            if bar.start > end_time && bar.frame_number != frame_number {
                break;
            }

            let from_x = transform.timestamp_to_pixel(bar.start);
            let to_x = transform.timestamp_to_pixel(bar.end);
            if to_x >= 0 && to_x > from_x && from_x < transform.width {
                let label = if bar.collector == FRAME_COLLECTOR {
                    format!("Frame {}", bar.frame_number)
                } else {
                    source.collector_name(bar.collector)
                };
                self.renderer.draw_bar(
                    global_row,
                    transform.clamp_x(from_x),
                    transform.clamp_x(to_x),
                    bar.collector,
                    &label,
                );
            }
        }
    }

    /// Recomputes the guide bars for the current window.
    pub fn update_guide_bars(&mut self) {
        let params = GuideBarParams {
            spacing_px: self.config.guide_bar_spacing_px,
            label_collision_px: self.config.label_collision_px,
            pixels_per_frame_guide: self.config.pixels_per_frame_guide,
            units: self.guide_bar_units,
        };
        self.guide_bars = compute_guide_bars(&self.threads, &self.transform(), &params);
    }

    /// Returns the bar under pixel `x` of global `row`.
    pub fn find_bar(&self, row: usize, x: i32) -> Option<Interval> {
        let time = self.transform().pixel_to_timestamp(x);
        let (thread_index, row_index) = self.threads.locate(row)?;
        self.threads
            .get(thread_index)?
            .rows
            .get(row_index)?
            .find(time)
            .copied()
    }

    /// Tooltip for the bar under the cursor, or an empty string.
    pub fn bar_tooltip<S: ProfileSource + ?Sized>(&self, source: &S, row: usize, x: i32) -> String {
        match self.find_bar(row, x) {
            Some(bar) if source.has_collector(bar.collector) => format!(
                "{} ({})",
                source.collector_fullname(bar.collector),
                format_number(bar.duration(), GuideBarUnits::MS | GuideBarUnits::SHOW_UNITS)
            ),
            _ => String::new(),
        }
    }

    /// Advances animations by `dt` seconds and redraws.
    ///
    /// Returns false once the view is idle and no more ticks are needed.
    pub fn tick<S: ProfileSource + ?Sized>(&mut self, source: &S, _time: f64, dt: f64) -> bool {
        let more = ViewController::step(&mut self.view, &mut self.nav, self.xsize, &self.config, dt);
        self.update_guide_bars();
        self.force_redraw(source);
        more
    }

    pub fn key_down(&mut self, key: NavKey) {
        self.nav.keys.press(key);
    }

    pub fn key_up(&mut self, key: NavKey) {
        self.nav.keys.release(key);
    }

    pub fn set_zoom_center(&mut self, x: i32) {
        self.nav.zoom_center = x;
    }

    /// Zooms immediately so `width_time` seconds are visible.
    pub fn zoom_to(&mut self, width_time: f64, center_px: i32) {
        self.view.zoom_to(width_time, center_px, self.xsize);
    }

    pub fn scroll_by(&mut self, delta_time: f64) {
        self.view.scroll_by(delta_time);
    }

    /// Starts an eased transition of the window start.
    pub fn jump_to(&mut self, start_time: f64) {
        self.view.jump_to(start_time);
    }

    /// Starts an eased transition of the time scale.
    pub fn zoom_target(&mut self, time_scale: f64) {
        self.view.zoom_target(time_scale);
    }

    pub fn set_guide_bar_units(&mut self, units: GuideBarUnits) {
        self.guide_bar_units = units;
        self.update_guide_bars();
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            time_scale: self.view.time_scale,
            start_time: self.view.start_time,
            lowest_start_time: self.lowest_start_time,
            highest_end_time: self.highest_end_time,
            guide_bar_units: self.guide_bar_units,
        }
    }

    pub fn write_state(&self, buf: &mut impl BufMut) {
        self.view_state().write_to(buf);
    }

    pub fn read_state<S: ProfileSource + ?Sized>(&mut self, source: &S, buf: &mut impl Buf) -> Result<()> {
        let state = ViewState::read_from(buf)?;
        self.restore_state(source, state);
        Ok(())
    }

    /// Applies persisted view scalars, stopping any motion.
    pub fn restore_state<S: ProfileSource + ?Sized>(&mut self, source: &S, state: ViewState) {
        self.view.settle(state.start_time, state.time_scale);
        self.lowest_start_time = state.lowest_start_time;
        self.highest_end_time = state.highest_end_time;
        self.guide_bar_units = state.guide_bar_units;
        self.have_start_time = true;
        self.nav.stop();
        info!(start_time = state.start_time, time_scale = state.time_scale, "restored view state");

        self.update_guide_bars();
        self.force_redraw(source);
    }

    /// Returns and clears the flag set when threads or rows were added.
    pub fn take_threads_changed(&mut self) -> bool {
        let changed = self.threads_changed;
        if changed {
            debug!(total_rows = self.threads.total_rows(), "thread layout changed");
        }
        self.threads_changed = false;
        changed
    }

    pub fn transform(&self) -> TimeTransform {
        TimeTransform::new(self.view.start_time, self.view.time_scale, self.xsize)
    }

    pub fn threads(&self) -> &ThreadRows {
        &self.threads
    }

    pub fn guide_bars(&self) -> &[GuideBar] {
        &self.guide_bars
    }

    pub fn view(&self) -> &ViewParams {
        &self.view
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn start_time(&self) -> f64 {
        self.view.start_time
    }

    pub fn time_scale(&self) -> f64 {
        self.view.time_scale
    }

    /// Visible time span.
    pub fn horizontal_scale(&self) -> f64 {
        self.transform().horizontal_scale()
    }

    pub fn horizontal_scroll(&self) -> f64 {
        self.view.start_time
    }

    pub fn lowest_start_time(&self) -> f64 {
        self.lowest_start_time
    }

    pub fn highest_end_time(&self) -> f64 {
        self.highest_end_time
    }

    pub fn xsize(&self) -> i32 {
        self.xsize
    }

    pub fn ysize(&self) -> i32 {
        self.ysize
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
