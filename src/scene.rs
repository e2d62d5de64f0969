//! Owned world context: every placed shape, the slicer and the walkers.
//!
//! Spawning and despawning are the only ways the shape registry changes, and
//! both keep the slicer and every walker's tracking list in step.

use std::collections::BTreeMap;
use std::fmt;

use log::info;

use crate::geometry4d::{Object4D, Shape4D, ShapeId, ShapeSet};
use crate::math4d::Vector4;
use crate::physics4d::{SurfaceWalker, WalkerEvent};
use crate::rendering4d::Slicer;
use crate::settings::SimulationSettings;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalkerId(u64);

impl fmt::Display for WalkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "walker#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Scene {
    settings: SimulationSettings,
    shapes: ShapeSet,
    slicer: Slicer,
    walkers: BTreeMap<WalkerId, SurfaceWalker>,
    next_walker: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SimulationSettings::default())
    }
}

impl Scene {
    pub fn new(settings: SimulationSettings) -> Self {
        let settings = settings.sanitized();
        let slicer = Slicer::new(&settings.slicer);
        Self {
            settings,
            shapes: ShapeSet::new(),
            slicer,
            walkers: BTreeMap::new(),
            next_walker: 0,
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    pub fn slicer(&self) -> &Slicer {
        &self.slicer
    }

    pub fn spawn_shape(&mut self, position: Vector4, shape: impl Shape4D + 'static) -> ShapeId {
        self.spawn_boxed(position, Box::new(shape))
    }

    pub fn spawn_boxed(&mut self, position: Vector4, shape: Box<dyn Shape4D>) -> ShapeId {
        let kind = shape.kind();
        let id = self.shapes.insert(Object4D::from_boxed(position, shape));
        self.slicer.register(id, &mut self.shapes);
        for walker in self.walkers.values_mut() {
            walker.track(id);
        }
        info!("spawned {} {} at {:?}", kind.label(), id, position);
        id
    }

    pub fn despawn_shape(&mut self, id: ShapeId) -> Option<Object4D> {
        let object = self.shapes.remove(id)?;
        self.slicer.unregister(id, &self.shapes);
        for walker in self.walkers.values_mut() {
            walker.untrack(id);
        }
        info!("despawned {} {}", object.kind().label(), id);
        Some(object)
    }

    /// Move a shape in 4D. Returns false if `id` is gone.
    pub fn move_shape(&mut self, id: ShapeId, position: Vector4) -> bool {
        let Some(object) = self.shapes.get_mut(id) else {
            return false;
        };
        object.set_position(position);
        self.slicer.refresh_bounds(&self.shapes);
        true
    }

    /// Add a walker that tracks every live shape.
    pub fn spawn_walker(&mut self, position: Vector4) -> WalkerId {
        let id = WalkerId(self.next_walker);
        self.next_walker += 1;
        let mut walker =
            SurfaceWalker::new(position, &self.settings.walker, &self.settings.physics);
        for shape in self.shapes.ids() {
            walker.track(shape);
        }
        self.walkers.insert(id, walker);
        info!("spawned {} at {:?}", id, position);
        id
    }

    pub fn despawn_walker(&mut self, id: WalkerId) -> Option<SurfaceWalker> {
        let walker = self.walkers.remove(&id)?;
        info!("despawned {}", id);
        Some(walker)
    }

    pub fn walker(&self, id: WalkerId) -> Option<&SurfaceWalker> {
        self.walkers.get(&id)
    }

    pub fn walker_mut(&mut self, id: WalkerId) -> Option<&mut SurfaceWalker> {
        self.walkers.get_mut(&id)
    }

    pub fn walker_ids(&self) -> impl Iterator<Item = WalkerId> + '_ {
        self.walkers.keys().copied()
    }

    /// One physics step for every walker.
    pub fn physics_tick(&mut self, delta: f64) -> Vec<(WalkerId, WalkerEvent)> {
        let mut events = Vec::new();
        for (&id, walker) in &mut self.walkers {
            events.extend(walker.tick(delta, &self.shapes).into_iter().map(|e| (id, e)));
        }
        events
    }

    /// One displayed frame: advance the slice and fade ghosts. Returns the
    /// shapes whose visibility flipped.
    pub fn frame(&mut self, delta: f64) -> Vec<ShapeId> {
        let flipped = self.slicer.update(delta, &mut self.shapes);
        for (_, object) in self.shapes.iter_mut() {
            object.update_ghost(delta);
        }
        flipped
    }

    pub fn set_slice_w(&mut self, w: f64) {
        self.slicer.set_slice_w(w);
    }

    pub fn teleport_to_w(&mut self, w: f64) -> Vec<ShapeId> {
        self.slicer.teleport_to_w(w, &mut self.shapes)
    }

    pub fn scroll(&mut self, notches: f64) {
        self.slicer.scroll(notches);
    }
}
