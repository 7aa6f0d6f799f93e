//! frame_timeline: incremental timeline layout for nested per-frame profiling events

pub mod data_types;
pub mod decompose;
pub mod guide_bars;
pub mod monitor;
pub mod rendering;
pub mod threads;
pub mod timeline;
pub mod transform;
pub mod utils;
pub mod view_controller;

pub use data_types::{
    ClientData, CollectorId, Event, FrameData, GuideBar, GuideBarStyle, GuideBarUnits, Interval,
    ProfileSource, Row, TimelineConfig, ViewState,
};
pub use monitor::{FrameListener, Monitor};
pub use rendering::{DrawCommand, RecordingRenderer, TimelineRenderer};
pub use timeline::Timeline;
pub use view_controller::NavKey;
