use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuideBarStyle {
    #[default]
    Normal,
    Frame,
}

/// A vertical gridline at an absolute time position.
#[derive(Clone, Debug, PartialEq)]
pub struct GuideBar {
    pub time: f64,
    pub label: String,
    pub style: GuideBarStyle,
}

impl GuideBar {
    pub fn new(time: f64, label: impl Into<String>, style: GuideBarStyle) -> Self {
        Self {
            time,
            label: label.into(),
            style,
        }
    }
}

bitflags! {
    /// Controls how guide bar and tooltip numbers are labeled.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(from = "u8", into = "u8")]
    pub struct GuideBarUnits: u8 {
        const MS = 0x1;
        const HZ = 0x2;
        const SHOW_UNITS = 0x4;
    }
}

impl Default for GuideBarUnits {
    fn default() -> Self {
        Self::MS | Self::SHOW_UNITS
    }
}

/// Unknown bits are dropped.
impl From<u8> for GuideBarUnits {
    fn from(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl From<GuideBarUnits> for u8 {
    fn from(units: GuideBarUnits) -> Self {
        units.bits()
    }
}
