//! Adaptive vertical gridlines aligned to frame starts and round intervals.

use tracing::debug;

use crate::data_types::{GuideBar, GuideBarStyle, GuideBarUnits, FRAME_COLLECTOR};
use crate::threads::ThreadRows;
use crate::transform::TimeTransform;
use crate::utils::format::format_number;

/// Rounds a duration onto the 1/2/5 × 10^k sequence.
pub fn guide_interval(target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 {
        return 0.0;
    }

    let k = (3.0 * target.log10()).round() as i64;
    let mut interval = 10f64.powf((k as f64 / 3.0).ceil());
    match k.rem_euclid(3) {
        1 => interval /= 5.0,
        2 => interval /= 2.0,
        _ => {}
    }
    interval
}

/// Spacing and density limits for [`compute_guide_bars`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideBarParams {
    pub spacing_px: f64,
    pub label_collision_px: i32,
    pub pixels_per_frame_guide: i32,
    pub units: GuideBarUnits,
}

/// Computes the guide bars for the window described by `transform`.
///
/// Frame boundaries come from the bars of the first thread's base row, so the
/// result does not depend on how much history the source still holds. When
/// no frame bars are usable, plain absolute-time gridlines are produced.
pub fn compute_guide_bars(
    threads: &ThreadRows,
    transform: &TimeTransform,
    params: &GuideBarParams,
) -> Vec<GuideBar> {
    let start_time = transform.start_time;
    let end_time = transform.end_time();
    let interval = guide_interval(transform.pixel_to_height(params.spacing_px));
    // Labels are always in milliseconds.
    let label_units = if params.units.contains(GuideBarUnits::SHOW_UNITS) {
        GuideBarUnits::MS | GuideBarUnits::SHOW_UNITS
    } else {
        GuideBarUnits::MS
    };

    let mut bars: Vec<GuideBar> = Vec::new();
    if let Some(row) = threads.get(0).and_then(|t| t.rows.first()) {
        let frames = row.bars();
        let max_frames = transform.width / params.pixels_per_frame_guide.max(1);
        let next_frame = |from: usize| {
            frames[from..]
                .iter()
                .position(|b| b.collector == FRAME_COLLECTOR)
                .map(|p| from + p)
        };

        let mut num_frames = 0;
        let mut cursor = next_frame(row.first_ending_at_or_after(start_time));
        while let Some(idx) = cursor {
            let frame = &frames[idx];
            if frame.start > end_time {
                break;
            }
            let frame_start = frame.start;

            if frame_start > start_time {
                if let Some(prev) = bars.last_mut() {
                    if transform.height_to_pixel(frame_start - prev.time)
                        < params.label_collision_px
                    {
                        prev.label.clear();
                    }
                }
                bars.push(GuideBar::new(
                    frame_start,
                    format!("#{}", frame.frame_number),
                    GuideBarStyle::Frame,
                ));

                num_frames += 1;
                if num_frames > max_frames {
                    debug!(num_frames, max_frames, "too many frame guide bars, dropping them");
                    bars.clear();
                    break;
                }
            }

            cursor = next_frame(idx + 1);
            let frame_width = match cursor {
                Some(next) => (frames[next].start - frame_start).min(end_time - frame_start),
                None => end_time - frame_start,
            };

            if interval > 0.0 {
                let first_bar = ((start_time - frame_start) / interval).ceil().max(1.0) as i64;
                let num_bars = (frame_width / interval).round() as i64;
                for i in first_bar..num_bars {
                    let offset = i as f64 * interval;
                    if frame_start + offset > end_time {
                        break;
                    }
                    bars.push(GuideBar::new(
                        frame_start + offset,
                        format!("+{}", format_number(offset, label_units)),
                        GuideBarStyle::Normal,
                    ));
                }
            }
        }
    }

    if bars.is_empty() && interval > 0.0 {
        let first_bar = (start_time / interval).ceil().max(1.0) as i64;
        let num_bars = (end_time / interval).round() as i64;
        for i in first_bar..num_bars {
            let time = i as f64 * interval;
            if time > end_time {
                break;
            }
            bars.push(GuideBar::new(
                time,
                format_number(time, label_units),
                GuideBarStyle::Frame,
            ));
        }
    }

    bars
}
