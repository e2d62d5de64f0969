use std::path::PathBuf;

use cgmath::Vector3;
use clap::{Parser, ValueEnum};
use log::info;
use web_time::Instant;

use hyperslice::geometry4d::{Hypersphere, KleinBottle, RoomSphere, Torus};
use hyperslice::settings::{load_settings, save_settings};
use hyperslice::{Scene, SimulationSettings, Vector4, WalkerEvent, WalkerId};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    Sphere,
    Room,
    Klein,
    Torus,
    Mixed,
}

#[derive(Parser, Debug)]
#[command(name = "hyperslice", about = "Headless 4D surface-walking simulation")]
struct Args {
    /// Scene to simulate
    #[arg(long, value_enum, default_value_t = PresetArg::Sphere)]
    preset: PresetArg,

    /// Number of physics ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Move the slice toward this W at startup
    #[arg(long, allow_hyphen_values = true)]
    slice_w: Option<f64>,

    /// JSON settings file to load
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings to this path
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// Jump every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    jump_every: u32,
}

fn build_preset(scene: &mut Scene, preset: PresetArg) -> WalkerId {
    match preset {
        PresetArg::Sphere => {
            scene.spawn_shape(Vector4::ZERO, Hypersphere::new(10.0));
            scene.spawn_walker(Vector4::new(0.0, 11.0, 0.0, 0.0))
        }
        PresetArg::Room => {
            scene.spawn_shape(Vector4::ZERO, RoomSphere::new(20.0));
            scene.spawn_walker(Vector4::new(0.0, -19.0, 0.0, 0.0))
        }
        PresetArg::Klein => {
            scene.spawn_shape(Vector4::ZERO, KleinBottle::new(6.0, 2.0));
            scene.spawn_walker(Vector4::new(9.0, 0.0, 0.0, 0.0))
        }
        PresetArg::Torus => {
            scene.spawn_shape(Vector4::ZERO, Torus::new(6.0, 2.0));
            scene.spawn_walker(Vector4::new(0.0, 3.0, 6.0, 0.0))
        }
        PresetArg::Mixed => {
            scene.spawn_shape(Vector4::ZERO, Hypersphere::new(10.0));
            scene.spawn_shape(Vector4::new(0.0, 0.0, 0.0, 4.0), Torus::new(14.0, 1.0));
            scene.spawn_shape(Vector4::new(30.0, 0.0, 0.0, -3.0), KleinBottle::new(4.0, 1.5));
            scene.spawn_shape(Vector4::new(0.0, 0.0, 0.0, 12.0), RoomSphere::new(3.0));
            scene.spawn_walker(Vector4::new(0.0, 11.0, 0.0, 0.0))
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let settings = args
        .settings
        .as_deref()
        .and_then(load_settings)
        .unwrap_or_else(SimulationSettings::default);
    if let Some(path) = &args.save_settings {
        match save_settings(path, &settings) {
            Ok(()) => info!("Wrote settings to {}", path.display()),
            Err(error) => log::error!("Failed to save settings {}: {}", path.display(), error),
        }
    }

    let dt = if args.dt > 0.0 { args.dt } else { 1.0 / 60.0 };
    let mut scene = Scene::new(settings);
    let walker = build_preset(&mut scene, args.preset);
    if let Some(w) = args.slice_w {
        scene.set_slice_w(w);
    }

    let started = Instant::now();
    let mut landings = 0u32;
    for tick in 0..args.ticks {
        if let Some(w) = scene.walker_mut(walker) {
            w.set_input(Vector3::new(0.0, 0.0, -1.0));
            if args.jump_every > 0 && tick % args.jump_every == 0 {
                w.jump();
            }
        }

        for (id, event) in scene.physics_tick(dt) {
            if let WalkerEvent::GroundedChanged(grounded) = event {
                if grounded {
                    landings += 1;
                }
                info!("tick {tick}: {id} grounded={grounded}");
            }
        }
        for shape in scene.frame(dt) {
            if let Some(object) = scene.shapes().get(shape) {
                info!(
                    "tick {tick}: {shape} ({}) visible={} at slice w={:.3}",
                    object.kind().label(),
                    object.is_visible(),
                    scene.slicer().slice_w()
                );
            }
        }
    }
    let elapsed = started.elapsed();

    println!(
        "Simulated {} ticks ({:.2}s of world time) in {:.1}ms",
        args.ticks,
        args.ticks as f64 * dt,
        elapsed.as_secs_f64() * 1000.0
    );
    if let Some(w) = scene.walker(walker) {
        let p = w.get_position_4d();
        let g = w.physical.gravity_direction;
        println!(
            "Walker at ({:.3}, {:.3}, {:.3}, {:.3}), gravity ({:.3}, {:.3}, {:.3}, {:.3})",
            p.x, p.y, p.z, p.w, g.x, g.y, g.z, g.w
        );
        println!("  grounded={}, landings={}", w.is_grounded(), landings);
    }
    let (min_w, max_w) = scene.slicer().bounds();
    println!(
        "Slice w={:.3} in [{:.3}, {:.3}]",
        scene.slicer().slice_w(),
        min_w,
        max_w
    );
    for (id, object) in scene.shapes().iter() {
        let section = match object.cross_section_radius() {
            Some(radius) => format!("ball r={radius:.3}"),
            None if object.is_visible() => "mesh".to_string(),
            None => "hidden".to_string(),
        };
        println!("  {id} {}: {section}", object.kind().label());
    }
}
