use bytes::{Buf, BufMut};
use eyre::{ensure, Result, WrapErr};
use serde::{Deserialize, Serialize};

use super::guide::GuideBarUnits;

/// Tunables for a timeline view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Seconds per pixel when a view is first opened.
    pub initial_time_scale: f64,
    /// Desired distance between guide bars.
    pub guide_bar_spacing_px: f64,
    /// Frame labels closer than this hide the previous label.
    pub label_collision_px: i32,
    /// One frame guide bar is allowed per this many pixels of width.
    pub pixels_per_frame_guide: i32,
    /// Exponential rate used for velocity decay and target easing.
    pub ease_rate: f64,
    pub velocity_stop_threshold: f64,
    /// Pixels scrolled per second at unit scroll velocity.
    pub scroll_speed_px: f64,
    /// Start time snaps to its target within this many pixels.
    pub start_snap_px: f64,
    pub scale_snap: f64,
    pub guide_bar_units: GuideBarUnits,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            // 1 ms per 10 pixels.
            initial_time_scale: 1.0 / 10000.0,
            guide_bar_spacing_px: 150.0,
            label_collision_px: 30,
            pixels_per_frame_guide: 100,
            ease_rate: 12.0,
            velocity_stop_threshold: 0.2,
            scroll_speed_px: 300.0,
            start_snap_px: 2.0,
            scale_snap: 0.01,
            guide_bar_units: GuideBarUnits::default(),
        }
    }
}

impl TimelineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).wrap_err("invalid timeline configuration")
    }
}

/// The view scalars that survive a restart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub time_scale: f64,
    pub start_time: f64,
    pub lowest_start_time: f64,
    pub highest_end_time: f64,
    pub guide_bar_units: GuideBarUnits,
}

impl ViewState {
    /// Four f64 fields plus the units byte.
    pub const ENCODED_LEN: usize = 4 * 8 + 1;

    pub fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_f64_le(self.time_scale);
        buf.put_f64_le(self.start_time);
        buf.put_f64_le(self.lowest_start_time);
        buf.put_f64_le(self.highest_end_time);
        buf.put_u8(self.guide_bar_units.bits());
    }

    pub fn read_from(buf: &mut impl Buf) -> Result<Self> {
        ensure!(
            buf.remaining() >= Self::ENCODED_LEN,
            "view state truncated: need {} bytes, have {}",
            Self::ENCODED_LEN,
            buf.remaining()
        );
        Ok(Self {
            time_scale: buf.get_f64_le(),
            start_time: buf.get_f64_le(),
            lowest_start_time: buf.get_f64_le(),
            highest_end_time: buf.get_f64_le(),
            guide_bar_units: GuideBarUnits::from_bits_truncate(buf.get_u8()),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).wrap_err("failed to serialize view state")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).wrap_err("invalid view state")
    }
}
