use log::debug;

use crate::geometry4d::{ShapeId, ShapeSet};
use crate::settings::SlicerSettings;

/// Distance below which the smoothed slice snaps onto its target.
const SNAP_DISTANCE: f64 = 1e-6;

/// The w position of the visible 3D slice.
///
/// `slice_w` approaches `target_w` exponentially; every time it moves, the
/// new value is pushed to all registered shapes. The target is kept within
/// bounds derived from where the registered shapes sit in w.
#[derive(Clone, Debug)]
pub struct Slicer {
    settings: SlicerSettings,
    slice_w: f64,
    target_w: f64,
    min_w: f64,
    max_w: f64,
    registered: Vec<ShapeId>,
    scroll_pending: f64,
    scroll_timer: f64,
}

impl Default for Slicer {
    fn default() -> Self {
        Self::new(&SlicerSettings::default())
    }
}

impl Slicer {
    pub fn new(settings: &SlicerSettings) -> Self {
        let settings = settings.clone().sanitized();
        let half = settings.min_half_span;
        Self {
            settings,
            slice_w: 0.0,
            target_w: 0.0,
            min_w: -half,
            max_w: half,
            registered: Vec::new(),
            scroll_pending: 0.0,
            scroll_timer: 0.0,
        }
    }

    pub fn slice_w(&self) -> f64 {
        self.slice_w
    }

    pub fn target_w(&self) -> f64 {
        self.target_w
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_w, self.max_w)
    }

    pub fn registered(&self) -> &[ShapeId] {
        &self.registered
    }

    /// Start slicing `id`. The shape is cut at the current slice right away.
    pub fn register(&mut self, id: ShapeId, shapes: &mut ShapeSet) {
        if self.registered.contains(&id) {
            return;
        }
        self.registered.push(id);
        if let Some(object) = shapes.get_mut(id) {
            object.update_slice(self.slice_w);
        }
        debug!("slicer registered {id}");
        self.refresh_bounds(shapes);
    }

    pub fn unregister(&mut self, id: ShapeId, shapes: &ShapeSet) {
        let before = self.registered.len();
        self.registered.retain(|registered| *registered != id);
        if self.registered.len() != before {
            debug!("slicer unregistered {id}");
            self.refresh_bounds(shapes);
        }
    }

    /// Recompute `[min_w, max_w]` from the registered shapes and re-clamp the
    /// target.
    pub fn refresh_bounds(&mut self, shapes: &ShapeSet) {
        let padding = self.settings.bounds_padding;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for object in self.registered.iter().filter_map(|id| shapes.get(*id)) {
            let w = object.position().w;
            let extent = object.w_extent();
            lo = lo.min(w - extent - padding);
            hi = hi.max(w + extent + padding);
        }

        let half = self.settings.min_half_span;
        if lo > hi {
            lo = -half;
            hi = half;
        } else if hi - lo < 2.0 * half {
            let center = 0.5 * (lo + hi);
            lo = center - half;
            hi = center + half;
        }

        if lo != self.min_w || hi != self.max_w {
            debug!("slice bounds [{:.3}, {:.3}] -> [{:.3}, {:.3}]", self.min_w, self.max_w, lo, hi);
        }
        self.min_w = lo;
        self.max_w = hi;
        self.target_w = self.clamp_w(self.target_w);
    }

    fn clamp_w(&self, w: f64) -> f64 {
        w.clamp(self.min_w, self.max_w)
    }

    /// Smoothly move toward `w`. Drops any scroll still waiting on its window.
    pub fn set_slice_w(&mut self, w: f64) {
        self.target_w = self.clamp_w(w);
        self.scroll_pending = 0.0;
        self.scroll_timer = 0.0;
    }

    /// Jump straight to `w` and push it to every registered shape.
    pub fn teleport_to_w(&mut self, w: f64, shapes: &mut ShapeSet) -> Vec<ShapeId> {
        self.target_w = self.clamp_w(w);
        self.scroll_pending = 0.0;
        self.slice_w = self.target_w;
        self.push_slice(shapes)
    }

    /// Queue scroll-wheel notches. Notches arriving within the scroll window
    /// of each other move the target as one step.
    pub fn scroll(&mut self, notches: f64) {
        self.scroll_pending += notches * self.settings.scroll_step;
        self.scroll_timer = self.settings.scroll_window;
    }

    /// Advance smoothing by `delta` seconds. Returns the shapes whose
    /// visibility flipped.
    pub fn update(&mut self, delta: f64, shapes: &mut ShapeSet) -> Vec<ShapeId> {
        if self.scroll_pending != 0.0 {
            self.scroll_timer -= delta;
            if self.scroll_timer <= 0.0 {
                self.target_w = self.clamp_w(self.target_w + self.scroll_pending);
                self.scroll_pending = 0.0;
                self.scroll_timer = 0.0;
            }
        }

        let previous = self.slice_w;
        if self.settings.smooth_time <= 0.0 {
            self.slice_w = self.target_w;
        } else {
            let t = 1.0 - (-delta / self.settings.smooth_time).exp();
            self.slice_w += (self.target_w - self.slice_w) * t;
            if (self.target_w - self.slice_w).abs() < SNAP_DISTANCE {
                self.slice_w = self.target_w;
            }
        }

        if self.slice_w == previous {
            return Vec::new();
        }
        self.push_slice(shapes)
    }

    fn push_slice(&self, shapes: &mut ShapeSet) -> Vec<ShapeId> {
        let mut flipped = Vec::new();
        for &id in &self.registered {
            if let Some(object) = shapes.get_mut(id) {
                if object.update_slice(self.slice_w) {
                    flipped.push(id);
                }
            }
        }
        flipped
    }
}
