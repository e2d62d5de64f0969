use log::trace;

use crate::geometry4d::{ShapeId, ShapeSet};
use crate::math4d::Vector4;
use crate::settings::PhysicsSettings;

/// World down, used when no tracked shape is available for sticky gravity.
pub const WORLD_DOWN: Vector4 = Vector4::new(0.0, -1.0, 0.0, 0.0);
/// Upward speed a grounded body may keep. Anything faster is clamped so
/// slopes don't launch it.
pub const MAX_UP_VELOCITY_GROUNDED: f64 = 1.0;
/// Distance beyond `collider_radius` that still counts as touching.
pub const CONTACT_SKIN: f64 = 0.01;

const LOW_SPEED_DRAG: f64 = 10.0;
const LOW_SPEED_DRAG_FALLOFF: f64 = 1.8;

/// Point body integrated against a set of tracked shapes.
///
/// Walking mode is `limit_slope > 0`: gravity is then applied only while
/// airborne, contacts whose normal faces up by more than `limit_slope` count
/// as floor, and extra drag kicks in at low speed.
#[derive(Clone, Debug)]
pub struct Physical4D {
    pub velocity: Vector4,
    /// Unit vector, recomputed by [`Physical4D::update_sticky_gravity`].
    pub gravity_direction: Vector4,
    pub gravity_strength: f64,
    pub is_grounded: bool,
    pub collider_radius: f64,
    /// Half-life of velocity in seconds.
    pub velocity_decay: f64,
    pub limit_slope: f64,
    pub use_gravity: bool,
    pub collisions: bool,
    pub elastic: bool,
    pub restitution: f64,
    /// Speed cap, 0 for none.
    pub max_speed: f64,
    tracked: Vec<ShapeId>,
}

impl Default for Physical4D {
    fn default() -> Self {
        Self::from_settings(&PhysicsSettings::default())
    }
}

impl Physical4D {
    pub fn from_settings(settings: &PhysicsSettings) -> Self {
        let settings = settings.clone().sanitized();
        Self {
            velocity: Vector4::ZERO,
            gravity_direction: WORLD_DOWN,
            gravity_strength: settings.gravity_strength,
            is_grounded: false,
            collider_radius: settings.collider_radius,
            velocity_decay: settings.velocity_decay,
            limit_slope: settings.limit_slope,
            use_gravity: settings.use_gravity,
            collisions: settings.collisions,
            elastic: settings.elastic,
            restitution: settings.restitution,
            max_speed: settings.max_speed,
            tracked: Vec::new(),
        }
    }

    pub fn is_walking(&self) -> bool {
        self.limit_slope > 0.0
    }

    pub fn track(&mut self, id: ShapeId) {
        if !self.tracked.contains(&id) {
            self.tracked.push(id);
        }
    }

    pub fn untrack(&mut self, id: ShapeId) {
        self.tracked.retain(|tracked| *tracked != id);
    }

    pub fn tracked(&self) -> &[ShapeId] {
        &self.tracked
    }

    /// Point gravity at the surface of the nearest tracked shape, by
    /// `|signed_distance|`. Falls back to [`WORLD_DOWN`] when nothing tracked
    /// resolves. Returns the shape that won.
    pub fn update_sticky_gravity(
        &mut self,
        position: Vector4,
        shapes: &ShapeSet,
    ) -> Option<ShapeId> {
        let mut nearest: Option<(ShapeId, f64)> = None;
        for &id in &self.tracked {
            let Some(object) = shapes.get(id) else {
                continue;
            };
            let distance = object.get_signed_distance(position).abs();
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((id, distance));
            }
        }

        let Some((id, _)) = nearest else {
            self.gravity_direction = WORLD_DOWN;
            return None;
        };
        let down = shapes
            .get(id)
            .map(|object| -object.get_surface_normal(position).normalize())
            .unwrap_or(WORLD_DOWN);
        if !down.is_near_zero() {
            self.gravity_direction = down;
        }
        Some(id)
    }

    fn apply_gravity(&mut self, delta: f64) {
        self.velocity += self.gravity_direction * (self.gravity_strength * delta);
    }

    fn decay_velocity(&mut self, delta: f64) {
        let mut rate = if self.velocity_decay > 0.0 {
            1.0 / self.velocity_decay
        } else {
            0.0
        };
        if self.is_walking() {
            rate += LOW_SPEED_DRAG * (-LOW_SPEED_DRAG_FALLOFF * self.velocity.length()).exp();
        }
        let factor = (-delta * rate).exp2();

        if self.use_gravity {
            // Falling and jumping speed is left to gravity and contacts.
            let axial = self.velocity.project_onto_line(self.gravity_direction);
            self.velocity = (self.velocity - axial) * factor + axial;
        } else {
            self.velocity *= factor;
        }
    }

    fn clamp_speed(&mut self) {
        if self.max_speed <= 0.0 {
            return;
        }
        let speed = self.velocity.length();
        if speed > self.max_speed {
            self.velocity *= self.max_speed / speed;
        }
    }

    /// Advance one tick from `position` and return the resolved position.
    pub fn update(&mut self, position: Vector4, delta: f64, shapes: &ShapeSet) -> Vector4 {
        let walking = self.is_walking();

        self.decay_velocity(delta);
        if self.use_gravity && (!walking || !self.collisions) {
            self.apply_gravity(delta);
        }
        self.clamp_speed();

        let mut new_pos = position + self.velocity * delta;
        if !self.collisions {
            self.is_grounded = false;
            return new_pos;
        }

        let up = -self.gravity_direction;
        let mut max_sin_up = -1.0_f64;
        let mut pushed = Vector4::ZERO;
        let mut contact = Vector4::ZERO;
        for &id in &self.tracked {
            let Some(object) = shapes.get(id) else {
                continue;
            };
            let distance = object.get_signed_distance(new_pos);
            if distance >= self.collider_radius + CONTACT_SKIN {
                continue;
            }
            let normal = object.get_surface_normal(new_pos);
            let push = self.collider_radius - distance;
            if push > 0.0 {
                new_pos += normal * push;
                pushed += normal * push;
            } else if walking {
                // Settle resting contact back onto the surface.
                new_pos += normal * push;
            }
            contact += normal;
            max_sin_up = max_sin_up.max(normal.dot(up));
        }

        let axis = if pushed.is_near_zero() {
            contact.normalize()
        } else {
            pushed.normalize()
        };
        if !axis.is_near_zero() {
            let into = self.velocity.dot(axis);
            if into < 0.0 {
                if self.elastic {
                    self.velocity -= axis * (into * (1.0 + self.restitution));
                } else {
                    self.velocity -= axis * into;
                    if walking && max_sin_up > self.limit_slope {
                        let down = self.velocity.dot(self.gravity_direction);
                        if down > 0.0 {
                            self.velocity -= self.gravity_direction * down;
                        }
                    }
                }
            }
        }

        if walking {
            let was_grounded = self.is_grounded;
            self.is_grounded = max_sin_up > self.limit_slope;
            if self.is_grounded {
                let up_speed = self.velocity.dot(up);
                if up_speed > MAX_UP_VELOCITY_GROUNDED {
                    self.velocity -= up * (up_speed - MAX_UP_VELOCITY_GROUNDED);
                }
            } else if self.use_gravity {
                self.apply_gravity(delta);
            }
            if was_grounded != self.is_grounded {
                trace!(
                    "grounded {} -> {} (max_sin_up {:.3})",
                    was_grounded,
                    self.is_grounded,
                    max_sin_up
                );
            }
        } else {
            self.is_grounded = false;
        }

        new_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry4d::{Hypersphere, Object4D, RoomSphere};

    const DT: f64 = 1.0 / 60.0;

    fn sphere_world(radius: f64) -> (ShapeSet, ShapeId) {
        let mut shapes = ShapeSet::new();
        let id = shapes.insert(Object4D::new(Vector4::ZERO, Hypersphere::new(radius)));
        (shapes, id)
    }

    #[test]
    fn decay_halves_per_half_life_without_gravity() {
        let shapes = ShapeSet::new();
        let mut body = Physical4D {
            velocity: Vector4::new(0.0, -5.0, 0.0, 0.0),
            velocity_decay: 0.5,
            limit_slope: 0.0,
            use_gravity: false,
            collisions: false,
            ..Physical4D::default()
        };
        let pos = body.update(Vector4::ZERO, 1.0, &shapes);
        assert!(body.velocity.approx_eq(Vector4::new(0.0, -1.25, 0.0, 0.0), 1e-12));
        assert!(pos.approx_eq(Vector4::new(0.0, -1.25, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn decay_keeps_fall_speed_under_gravity() {
        let shapes = ShapeSet::new();
        let mut body = Physical4D {
            velocity: Vector4::new(4.0, -5.0, 0.0, 0.0),
            velocity_decay: 0.5,
            limit_slope: 0.0,
            gravity_strength: 0.0,
            collisions: false,
            ..Physical4D::default()
        };
        body.update(Vector4::ZERO, 1.0, &shapes);
        assert!(body.velocity.approx_eq(Vector4::new(1.0, -5.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn lands_and_stays_on_hypersphere() {
        let (shapes, id) = sphere_world(10.0);
        let mut body = Physical4D {
            limit_slope: 0.7,
            ..Physical4D::default()
        };
        body.track(id);
        let mut pos = Vector4::new(0.0, 11.0, 0.0, 0.0);

        let mut landed_at = None;
        for tick in 0..200 {
            body.update_sticky_gravity(pos, &shapes);
            pos = body.update(pos, DT, &shapes);
            if body.is_grounded {
                landed_at = Some(tick);
                break;
            }
        }
        assert!(landed_at.is_some(), "never grounded");

        for _ in 0..100 {
            body.update_sticky_gravity(pos, &shapes);
            pos = body.update(pos, DT, &shapes);
            assert!(body.is_grounded);
            let clearance = shapes.get(id).unwrap().get_signed_distance(pos);
            assert!(clearance > body.collider_radius - 1e-6, "sank to {clearance}");
        }
    }

    #[test]
    fn grounded_within_two_ticks_of_contact() {
        let (shapes, id) = sphere_world(10.0);
        let mut body = Physical4D {
            limit_slope: 0.7,
            velocity: Vector4::new(0.0, -3.0, 0.0, 0.0),
            ..Physical4D::default()
        };
        body.track(id);
        let mut pos = Vector4::new(0.0, 10.52, 0.0, 0.0);
        for _ in 0..2 {
            body.update_sticky_gravity(pos, &shapes);
            pos = body.update(pos, DT, &shapes);
        }
        assert!(body.is_grounded);
        assert!(body.velocity.dot(Vector4::Y).abs() < 1e-9);
    }

    #[test]
    fn steep_contact_is_not_ground() {
        let (shapes, id) = sphere_world(10.0);
        let mut body = Physical4D {
            limit_slope: 0.7,
            use_gravity: false,
            ..Physical4D::default()
        };
        body.track(id);
        // Gravity stays world down while the body touches the sphere's side.
        let pos = body.update(Vector4::new(10.4, 0.0, 0.0, 0.0), DT, &shapes);
        assert!(!body.is_grounded);
        assert!((pos.x - 10.5).abs() < 1e-9);
    }

    #[test]
    fn elastic_body_bounces() {
        let (shapes, id) = sphere_world(10.0);
        let mut body = Physical4D {
            velocity: Vector4::new(0.0, -6.0, 0.0, 0.0),
            limit_slope: 0.0,
            use_gravity: false,
            velocity_decay: 0.0,
            elastic: true,
            restitution: 1.0,
            ..Physical4D::default()
        };
        body.track(id);
        body.update(Vector4::new(0.0, 10.55, 0.0, 0.0), DT, &shapes);
        assert!(body.velocity.approx_eq(Vector4::new(0.0, 6.0, 0.0, 0.0), 1e-9));
    }

    #[test]
    fn sticky_gravity_points_at_nearest_shape() {
        let mut shapes = ShapeSet::new();
        let a = shapes.insert(Object4D::new(
            Vector4::new(-10.0, 0.0, 0.0, 0.0),
            Hypersphere::new(2.0),
        ));
        let b = shapes.insert(Object4D::new(
            Vector4::new(10.0, 0.0, 0.0, 0.0),
            Hypersphere::new(2.0),
        ));
        let mut body = Physical4D::default();
        body.track(a);
        body.track(b);

        assert_eq!(body.update_sticky_gravity(Vector4::new(1.0, 0.0, 0.0, 0.0), &shapes), Some(b));
        assert!(body.gravity_direction.approx_eq(Vector4::X, 1e-12));

        let near_a = Vector4::new(-0.01, 0.0, 0.0, 0.0);
        assert_eq!(body.update_sticky_gravity(near_a, &shapes), Some(a));
        assert!(body.gravity_direction.approx_eq(-Vector4::X, 1e-12));
    }

    #[test]
    fn sticky_gravity_inside_room_points_at_wall() {
        let mut shapes = ShapeSet::new();
        let room = shapes.insert(Object4D::new(Vector4::ZERO, RoomSphere::new(20.0)));
        let mut body = Physical4D::default();
        body.track(room);
        body.update_sticky_gravity(Vector4::new(0.0, 0.0, 0.0, -15.0), &shapes);
        assert!(body.gravity_direction.approx_eq(-Vector4::W, 1e-12));
    }

    #[test]
    fn no_tracked_shapes_means_world_down() {
        let (shapes, id) = sphere_world(1.0);
        let mut body = Physical4D::default();
        body.gravity_direction = Vector4::X;
        assert_eq!(body.update_sticky_gravity(Vector4::new(0.0, 5.0, 0.0, 0.0), &shapes), None);
        assert_eq!(body.gravity_direction, WORLD_DOWN);

        body.track(id);
        body.track(id);
        assert_eq!(body.tracked().len(), 1);
        body.untrack(id);
        assert!(body.tracked().is_empty());
    }

    #[test]
    fn speed_is_capped() {
        let shapes = ShapeSet::new();
        let mut body = Physical4D {
            velocity: Vector4::new(500.0, 0.0, 0.0, 0.0),
            max_speed: 50.0,
            velocity_decay: 0.0,
            limit_slope: 0.0,
            use_gravity: false,
            ..Physical4D::default()
        };
        body.update(Vector4::ZERO, DT, &shapes);
        assert!((body.velocity.length() - 50.0).abs() < 1e-9);
    }
}
