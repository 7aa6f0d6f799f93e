//! Affine mapping between timestamps and horizontal pixel positions

/// screen_x = (time - start_time) / time_scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeTransform {
    pub start_time: f64,
    /// Seconds per pixel.
    pub time_scale: f64,
    /// Widget width in pixels.
    pub width: i32,
}

impl TimeTransform {
    pub fn new(start_time: f64, time_scale: f64, width: i32) -> Self {
        Self {
            start_time,
            time_scale,
            width,
        }
    }

    pub fn timestamp_to_pixel(&self, time: f64) -> i32 {
        Self::saturate(((time - self.start_time) / self.time_scale).floor())
    }

    pub fn pixel_to_timestamp(&self, x: i32) -> f64 {
        self.start_time + x as f64 * self.time_scale
    }

    /// Converts a duration to a pixel distance.
    pub fn height_to_pixel(&self, duration: f64) -> i32 {
        Self::saturate((duration / self.time_scale).floor())
    }

    pub fn pixel_to_height(&self, pixels: f64) -> f64 {
        pixels * self.time_scale
    }

    /// Visible time span.
    pub fn horizontal_scale(&self) -> f64 {
        self.time_scale * self.width as f64
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.horizontal_scale()
    }

    pub fn clamp_x(&self, x: i32) -> i32 {
        x.clamp(0, self.width.max(0))
    }

    fn saturate(value: f64) -> i32 {
        if value.is_nan() {
            0
        } else {
            value.clamp(i32::MIN as f64, i32::MAX as f64) as i32
        }
    }
}
