//! Drawing hooks the timeline calls; a concrete renderer implements them.

use crate::data_types::{CollectorId, GuideBarStyle};

/// Capability interface for the host's drawing surface. Every hook is a
/// no-op by default.
pub trait TimelineRenderer {
    /// Wipes the whole drawing surface.
    fn clear_region(&mut self) {}

    fn begin_draw(&mut self) {}

    fn end_draw(&mut self) {}

    /// Draws one bar in global `row` spanning `[from_x, to_x)`.
    fn draw_bar(
        &mut self,
        _row: usize,
        _from_x: i32,
        _to_x: i32,
        _collector: CollectorId,
        _label: &str,
    ) {
    }

    /// Draws the horizontal separator occupying global `row`.
    fn draw_separator(&mut self, _row: usize) {}

    fn draw_guide_bar(&mut self, _x: i32, _style: GuideBarStyle) {}

    /// Called after each ingestion.
    fn idle(&mut self) {}
}

/// Renderer that draws nothing.
impl TimelineRenderer for () {}

/// One recorded hook invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Begin,
    End,
    Bar {
        row: usize,
        from_x: i32,
        to_x: i32,
        collector: CollectorId,
        label: String,
    },
    Separator(usize),
    GuideBar(i32, GuideBarStyle),
    Idle,
}

/// Renderer that records every call, for tests and headless hosts.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn bars(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Bar { .. }))
    }
}

impl TimelineRenderer for RecordingRenderer {
    fn clear_region(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn begin_draw(&mut self) {
        self.commands.push(DrawCommand::Begin);
    }

    fn end_draw(&mut self) {
        self.commands.push(DrawCommand::End);
    }

    fn draw_bar(&mut self, row: usize, from_x: i32, to_x: i32, collector: CollectorId, label: &str) {
        self.commands.push(DrawCommand::Bar {
            row,
            from_x,
            to_x,
            collector,
            label: label.to_string(),
        });
    }

    fn draw_separator(&mut self, row: usize) {
        self.commands.push(DrawCommand::Separator(row));
    }

    fn draw_guide_bar(&mut self, x: i32, style: GuideBarStyle) {
        self.commands.push(DrawCommand::GuideBar(x, style));
    }

    fn idle(&mut self) {
        self.commands.push(DrawCommand::Idle);
    }
}
