/// Fading full-shape projection drawn after an object drops out of the slice.
///
/// Independent of the live cross-section: opacity snaps to `max_opacity` on
/// the visible-to-hidden transition, then decays linearly to zero over
/// `fade_time` seconds. While the object is visible the ghost stays hidden.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GhostProjection {
    pub enabled: bool,
    pub max_opacity: f64,
    pub fade_time: f64,
    opacity: f64,
    was_visible: bool,
}

impl Default for GhostProjection {
    fn default() -> Self {
        Self::new(0.35, 1.5)
    }
}

impl GhostProjection {
    pub fn new(max_opacity: f64, fade_time: f64) -> Self {
        Self {
            enabled: true,
            max_opacity: max_opacity.clamp(0.0, 1.0),
            fade_time: fade_time.max(0.0),
            opacity: 0.0,
            was_visible: false,
        }
    }

    pub fn opacity(&self) -> f64 {
        if self.enabled {
            self.opacity
        } else {
            0.0
        }
    }

    pub fn is_shown(&self) -> bool {
        self.opacity() > 0.0
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Advance one frame given the object's current slice visibility.
    pub fn update(&mut self, visible: bool, delta: f64) {
        if visible {
            self.opacity = 0.0;
        } else if self.was_visible {
            self.opacity = self.max_opacity;
        } else if self.fade_time <= 0.0 {
            self.opacity = 0.0;
        } else {
            let step = self.max_opacity * delta / self.fade_time;
            self.opacity = (self.opacity - step).max(0.0);
        }
        self.was_visible = visible;
    }
}
