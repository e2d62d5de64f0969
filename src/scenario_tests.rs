use cgmath::Vector3;

use crate::geometry4d::{Hypersphere, KleinBottle, RoomSphere, SliceSection};
use crate::math4d::{IsoclinicRotation, Vector4};
use crate::physics4d::{Physical4D, WalkerEvent};
use crate::scene::Scene;
use crate::settings::{PhysicsSettings, SimulationSettings};

const DT: f64 = 1.0 / 60.0;

fn settle(scene: &mut Scene, ticks: usize) {
    for _ in 0..ticks {
        scene.physics_tick(DT);
    }
}

#[test]
fn hypersphere_slice_at_six_has_radius_eight() {
    let mut scene = Scene::default();
    let id = scene.spawn_shape(Vector4::ZERO, Hypersphere::new(10.0));
    scene.teleport_to_w(6.0);
    let object = scene.shapes().get(id).unwrap();
    assert!(object.is_visible());
    let radius = object.cross_section_radius().unwrap();
    assert!((radius - 8.0).abs() < 1e-12);
}

#[test]
fn hypersphere_slice_past_radius_is_hidden() {
    let mut scene = Scene::default();
    let id = scene.spawn_shape(Vector4::ZERO, Hypersphere::new(10.0));
    let flipped = scene.teleport_to_w(12.0);
    assert_eq!(scene.slicer().slice_w(), 12.0);
    assert_eq!(flipped, vec![id]);
    let object = scene.shapes().get(id).unwrap();
    assert!(!object.is_visible());
    assert_eq!(object.section(), &SliceSection::Hidden);
}

#[test]
fn velocity_decays_by_a_quarter_over_one_second() {
    let mut scene = Scene::default();
    scene.spawn_shape(Vector4::new(0.0, -50.0, 0.0, 0.0), Hypersphere::new(1.0));
    let mut body = Physical4D::from_settings(&PhysicsSettings {
        velocity_decay: 0.5,
        limit_slope: 0.0,
        use_gravity: false,
        collisions: false,
        ..Default::default()
    });
    body.velocity = Vector4::new(0.0, -5.0, 0.0, 0.0);
    body.update(Vector4::ZERO, 1.0, scene.shapes());
    assert!(body.velocity.approx_eq(Vector4::new(0.0, -1.25, 0.0, 0.0), 1e-12));
}

#[test]
fn forward_input_on_hypersphere_moves_horizontally() {
    let mut scene = Scene::default();
    scene.spawn_shape(Vector4::ZERO, Hypersphere::new(10.0));
    let walker = scene.spawn_walker(Vector4::new(0.0, 10.5, 0.0, 0.0));
    settle(&mut scene, 5);

    let w = scene.walker_mut(walker).unwrap();
    assert!(w.is_grounded());
    assert!(w.physical.gravity_direction.approx_eq(-Vector4::Y, 1e-9));

    let movement = w.surface_relative_movement(Vector3::new(0.0, 0.0, -1.0));
    assert!(movement.y.abs() < 1e-9);
    assert!(movement.approx_eq(Vector4::make_normal(Vector4::Y, Vector4::X, Vector4::W), 1e-9));
    assert!(movement.xyz().z > 0.9);

    w.set_input(Vector3::new(0.0, 0.0, -1.0));
    let start = w.get_position_4d();
    settle(&mut scene, 10);
    let end = scene.walker(walker).unwrap().get_position_4d();
    assert!(end.z - start.z > 0.1);
    assert!(end.w.abs() < 1e-9);
}

#[test]
fn strafing_off_axis_on_hypersphere_stays_in_slice() {
    let mut scene = Scene::default();
    scene.spawn_shape(Vector4::ZERO, Hypersphere::new(10.0));
    let start = Vector4::new(3.0, 10.0, 2.0, 0.0).normalize() * 10.5;
    let walker = scene.spawn_walker(start);
    settle(&mut scene, 5);

    let w = scene.walker_mut(walker).unwrap();
    assert_eq!(w.surface_basis().right.w, 0.0);
    w.set_input(Vector3::new(1.0, 0.0, 0.0));
    for _ in 0..60 {
        scene.physics_tick(DT);
        let pos = scene.walker(walker).unwrap().get_position_4d();
        assert!(pos.w.abs() < 1e-9, "walker left the slice at {pos:?}");
    }
    let end = scene.walker(walker).unwrap().get_position_4d();
    assert!(end.distance(start) > 0.5);
}

#[test]
fn walker_circles_inside_room_sphere() {
    let mut scene = Scene::default();
    let room = scene.spawn_shape(Vector4::ZERO, RoomSphere::new(20.0));
    let walker = scene.spawn_walker(Vector4::new(0.0, -19.0, 0.0, 0.0));
    settle(&mut scene, 60);
    assert!(scene.walker(walker).unwrap().is_grounded());

    let start = scene.walker(walker).unwrap().get_position_4d();
    scene
        .walker_mut(walker)
        .unwrap()
        .set_input(Vector3::new(1.0, 0.0, 0.0));
    for _ in 0..120 {
        scene.physics_tick(DT);
        let pos = scene.walker(walker).unwrap().get_position_4d();
        let clearance = scene.shapes().get(room).unwrap().get_signed_distance(pos);
        assert!(clearance > 0.45 && clearance < 0.55, "clearance {clearance}");
    }
    let w = scene.walker(walker).unwrap();
    assert!(w.is_grounded());
    assert!(w.get_position_4d().distance(start) > 1.0);
}

#[test]
fn rotated_walker_lands_along_w() {
    let mut scene = Scene::default();
    scene.spawn_shape(Vector4::ZERO, Hypersphere::new(10.0));
    let walker = scene.spawn_walker(Vector4::new(0.0, 10.5, 0.0, 0.0));
    settle(&mut scene, 5);

    let turn = IsoclinicRotation::from_to(Vector4::Y, Vector4::W);
    let w = scene.walker_mut(walker).unwrap();
    let moved = turn.apply(Vector4::new(0.0, 10.6, 0.0, 0.0));
    assert!(moved.approx_eq(Vector4::new(0.0, 0.0, 0.0, 10.6), 1e-9));
    w.set_position_4d(moved);

    let mut events = Vec::new();
    for _ in 0..60 {
        events.extend(scene.physics_tick(DT));
    }
    let w = scene.walker(walker).unwrap();
    assert!(w.is_grounded());
    assert!(w.physical.gravity_direction.approx_eq(-Vector4::W, 1e-6));
    assert!((w.get_position_4d().w - 10.5).abs() < 1e-3);
    assert!(events.contains(&(walker, WalkerEvent::GroundedChanged(true))));

    let basis = w.surface_basis();
    let movement = basis.movement(Vector3::new(0.7, 0.0, -0.7));
    assert!(movement.dot(basis.up).abs() < 1e-9);
    assert!((movement.length() - (0.98f64).sqrt()).abs() < 1e-9);
}

#[test]
fn klein_bottle_cross_section_tracks_slice() {
    let mut scene = Scene::default();
    let id = scene.spawn_shape(
        Vector4::new(0.0, 0.0, 0.0, 2.0),
        KleinBottle {
            mesh_resolution: 24,
            ..KleinBottle::new(3.0, 1.0)
        },
    );
    assert!(!scene.shapes().get(id).unwrap().is_visible());
    assert_eq!(scene.slicer().bounds(), (-3.0, 7.0));

    scene.teleport_to_w(2.0);
    let object = scene.shapes().get(id).unwrap();
    match object.section() {
        SliceSection::Mesh(mesh) => assert!(mesh.triangle_count() > 0),
        other => panic!("expected mesh, got {other:?}"),
    }
    assert_eq!(object.cross_section_radius(), None);
}

#[test]
fn settings_flow_into_spawned_walkers() {
    let mut settings = SimulationSettings::default();
    settings.physics.collider_radius = 1.25;
    settings.walker.jump_velocity = 7.0;
    let mut scene = Scene::new(settings);
    let walker = scene.spawn_walker(Vector4::ZERO);
    let w = scene.walker(walker).unwrap();
    assert_eq!(w.physical.collider_radius, 1.25);
    assert_eq!(w.jump_velocity, 7.0);
}
