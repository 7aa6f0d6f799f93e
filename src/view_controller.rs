use bitflags::bitflags;

use crate::data_types::TimelineConfig;

/// Navigation keys the timeline reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    Left,
    Right,
    A,
    D,
    W,
    S,
}

bitflags! {
    /// Set of currently held navigation keys.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct HeldKeys: u8 {
        const LEFT = 0x01;
        const RIGHT = 0x02;
        const A = 0x04;
        const D = 0x08;
        const W = 0x10;
        const S = 0x20;
    }
}

impl From<NavKey> for HeldKeys {
    fn from(key: NavKey) -> Self {
        match key {
            NavKey::Left => HeldKeys::LEFT,
            NavKey::Right => HeldKeys::RIGHT,
            NavKey::A => HeldKeys::A,
            NavKey::D => HeldKeys::D,
            NavKey::W => HeldKeys::W,
            NavKey::S => HeldKeys::S,
        }
    }
}

impl Default for HeldKeys {
    fn default() -> Self {
        Self::empty()
    }
}

impl HeldKeys {
    pub fn press(&mut self, key: NavKey) {
        self.insert(key.into());
    }

    pub fn release(&mut self, key: NavKey) {
        self.remove(key.into());
    }

    pub fn is_held(&self, key: NavKey) -> bool {
        self.contains(key.into())
    }

    /// +1 scrolls forward in time, -1 backward.
    pub fn horizontal(&self) -> i32 {
        let fwd = self.intersects(HeldKeys::RIGHT | HeldKeys::D);
        let back = self.intersects(HeldKeys::LEFT | HeldKeys::A);
        fwd as i32 - back as i32
    }

    /// +1 zooms in, -1 zooms out.
    pub fn vertical(&self) -> i32 {
        self.contains(HeldKeys::W) as i32 - self.contains(HeldKeys::S) as i32
    }
}

/// Current and target placement of the visible window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewParams {
    pub start_time: f64,
    /// Seconds per pixel.
    pub time_scale: f64,
    pub target_start_time: f64,
    pub target_time_scale: f64,
}

impl ViewParams {
    pub fn new(start_time: f64, time_scale: f64) -> Self {
        Self {
            start_time,
            time_scale,
            target_start_time: start_time,
            target_time_scale: time_scale,
        }
    }

    /// Sets both current and target values, ending any transition.
    pub fn settle(&mut self, start_time: f64, time_scale: f64) {
        *self = Self::new(start_time, time_scale);
    }

    pub fn is_settled(&self) -> bool {
        self.start_time == self.target_start_time && self.time_scale == self.target_time_scale
    }

    /// Shifts the window immediately.
    pub fn scroll_by(&mut self, delta_time: f64) {
        self.start_time += delta_time;
        self.target_start_time = self.start_time;
    }

    /// Sets the visible span to `width_time`, keeping the time under
    /// `center_px` in place.
    pub fn zoom_to(&mut self, width_time: f64, center_px: i32, width: i32) {
        if width <= 0 || width_time.is_nan() || width_time <= 0.0 {
            return;
        }
        let center_time = self.start_time + center_px as f64 * self.time_scale;
        self.time_scale = width_time / width as f64;
        self.start_time = center_time - center_px as f64 * self.time_scale;
        self.target_time_scale = self.time_scale;
        self.target_start_time = self.start_time;
    }

    /// Eases the window start toward `start_time`.
    pub fn jump_to(&mut self, start_time: f64) {
        self.target_start_time = start_time;
    }

    /// Eases the scale toward `time_scale`.
    pub fn zoom_target(&mut self, time_scale: f64) {
        if time_scale > 0.0 {
            self.target_time_scale = time_scale;
        }
    }
}

/// Scroll/zoom velocities and input state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavigationState {
    pub scroll_speed: f64,
    pub zoom_speed: f64,
    pub keys: HeldKeys,
    /// Pixel that stays fixed while zooming.
    pub zoom_center: i32,
}

impl NavigationState {
    pub fn stop(&mut self) {
        self.scroll_speed = 0.0;
        self.zoom_speed = 0.0;
    }
}

/// ViewController advances the view independently of any UI toolkit.
pub struct ViewController;

impl ViewController {
    /// Linear acceleration while a direction is held; reversing restarts at ±1.
    pub fn accelerate(speed: &mut f64, direction: i32) {
        if direction > 0 {
            if *speed < 0.0 {
                *speed = 1.0;
            }
            *speed += 1.0;
        } else if direction < 0 {
            if *speed > 0.0 {
                *speed = -1.0;
            }
            *speed -= 1.0;
        }
    }

    /// Exponential decay toward zero, snapping below `threshold`.
    pub fn apply_decay(speed: &mut f64, rate: f64, threshold: f64, dt: f64) {
        if *speed == 0.0 {
            return;
        }
        *speed *= (-rate * dt).exp();
        if speed.abs() < threshold {
            *speed = 0.0;
        }
    }

    pub fn ease_start(view: &mut ViewParams, rate: f64, snap_px: f64, dt: f64) {
        if view.target_start_time == view.start_time {
            return;
        }
        let dist = view.target_start_time - view.start_time;
        if dist.abs() < view.time_scale * snap_px {
            view.start_time = view.target_start_time;
        } else {
            view.start_time += dist * (1.0 - (-rate * dt).exp());
        }
    }

    /// The scale only snaps once the start has reached its target.
    pub fn ease_scale(view: &mut ViewParams, rate: f64, snap: f64, dt: f64) {
        if view.target_time_scale == view.time_scale {
            return;
        }
        let dist = view.target_time_scale - view.time_scale;
        if view.target_start_time == view.start_time && dist.abs() < snap {
            view.time_scale = view.target_time_scale;
        } else {
            view.time_scale += dist * (1.0 - (-rate * dt).exp());
        }
    }

    /// Advances velocities and transitions by `dt` seconds.
    ///
    /// Returns true while further steps are needed.
    pub fn step(
        view: &mut ViewParams,
        nav: &mut NavigationState,
        width: i32,
        config: &TimelineConfig,
        dt: f64,
    ) -> bool {
        let rate = config.ease_rate;
        let threshold = config.velocity_stop_threshold;

        match nav.keys.horizontal() {
            0 => Self::apply_decay(&mut nav.scroll_speed, rate, threshold, dt),
            dir => Self::accelerate(&mut nav.scroll_speed, dir),
        }
        match nav.keys.vertical() {
            0 => Self::apply_decay(&mut nav.zoom_speed, rate, threshold, dt),
            dir => Self::accelerate(&mut nav.zoom_speed, dir),
        }

        if nav.zoom_speed != 0.0 {
            let width_time = view.time_scale * width as f64;
            view.zoom_to(
                width_time * 0.5f64.powf(nav.zoom_speed * dt),
                nav.zoom_center,
                width,
            );
        }

        if nav.scroll_speed != 0.0 {
            view.scroll_by(nav.scroll_speed * config.scroll_speed_px * view.time_scale * dt);
        }

        Self::ease_start(view, rate, config.start_snap_px, dt);
        Self::ease_scale(view, rate, config.scale_snap, dt);

        !nav.keys.is_empty()
            || nav.scroll_speed != 0.0
            || nav.zoom_speed != 0.0
            || !view.is_settled()
    }
}
