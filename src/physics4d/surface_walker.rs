use cgmath::{InnerSpace, Vector3};
use log::trace;

use super::physical::Physical4D;
use crate::geometry4d::{ShapeId, ShapeSet};
use crate::math4d::Vector4;
use crate::settings::{PhysicsSettings, WalkerSettings};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum WalkerEvent {
    GroundedChanged(bool),
    PositionChanged(Vector4),
}

/// Local frame on the surface under a walker: `up` is against gravity,
/// `right` and `forward` span the walkable tangent directions seen from the
/// current slice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceBasis {
    pub up: Vector4,
    pub right: Vector4,
    pub forward: Vector4,
}

impl SurfaceBasis {
    pub fn from_up(up: Vector4) -> Self {
        let up = up.normalize();
        let up = if up.is_near_zero() { Vector4::Y } else { up };
        let right = up.perpendicular_in_slice();
        let mut forward = Vector4::make_normal(up, right, Vector4::W).normalize();
        if forward.is_near_zero() {
            // `up` is along W.
            forward = Vector4::make_normal(up, right, Vector4::Z).normalize();
        }
        Self { up, right, forward }
    }

    /// Map 3D controller input (x right, -z forward) onto the tangent space.
    pub fn movement(&self, input: Vector3<f64>) -> Vector4 {
        self.right * input.x + self.forward * (-input.z)
    }
}

/// Entity that walks on whatever tracked surface is nearest.
#[derive(Clone, Debug)]
pub struct SurfaceWalker {
    pub physical: Physical4D,
    pub move_speed: f64,
    pub jump_velocity: f64,
    position: Vector4,
    input: Vector3<f64>,
    jump_requested: bool,
}

impl SurfaceWalker {
    pub fn new(position: Vector4, walker: &WalkerSettings, physics: &PhysicsSettings) -> Self {
        let walker = walker.clone().sanitized();
        Self {
            physical: Physical4D::from_settings(physics),
            move_speed: walker.move_speed,
            jump_velocity: walker.jump_velocity,
            position,
            input: Vector3::new(0.0, 0.0, 0.0),
            jump_requested: false,
        }
    }

    pub fn get_position_4d(&self) -> Vector4 {
        self.position
    }

    pub fn set_position_4d(&mut self, position: Vector4) {
        self.position = position;
    }

    /// Movement input for the next tick; longer than unit is scaled down.
    pub fn set_input(&mut self, direction: Vector3<f64>) {
        let len = direction.magnitude();
        self.input = if len > 1.0 { direction / len } else { direction };
    }

    pub fn input(&self) -> Vector3<f64> {
        self.input
    }

    /// Request a jump; honored on the next tick if grounded.
    pub fn jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn is_grounded(&self) -> bool {
        self.physical.is_grounded
    }

    pub fn track(&mut self, id: ShapeId) {
        self.physical.track(id);
    }

    pub fn untrack(&mut self, id: ShapeId) {
        self.physical.untrack(id);
    }

    pub fn surface_basis(&self) -> SurfaceBasis {
        SurfaceBasis::from_up(-self.physical.gravity_direction)
    }

    /// Tangent-space direction for `input` under the current gravity.
    pub fn surface_relative_movement(&self, input: Vector3<f64>) -> Vector4 {
        self.surface_basis().movement(input)
    }

    pub fn tick(&mut self, delta: f64, shapes: &ShapeSet) -> Vec<WalkerEvent> {
        let was_grounded = self.physical.is_grounded;
        let start = self.position;

        self.physical.update_sticky_gravity(self.position, shapes);

        if std::mem::take(&mut self.jump_requested) && self.physical.is_grounded {
            let up = -self.physical.gravity_direction;
            self.physical.velocity += up * self.jump_velocity;
            trace!("jump from {:?}", self.position);
        }

        let movement = self.surface_relative_movement(self.input);
        self.physical.velocity += movement * (self.move_speed * delta);

        self.position = self.physical.update(self.position, delta, shapes);

        let mut events = Vec::new();
        if was_grounded != self.physical.is_grounded {
            events.push(WalkerEvent::GroundedChanged(self.physical.is_grounded));
        }
        if self.position != start {
            events.push(WalkerEvent::PositionChanged(self.position));
        }
        events
    }
}
