//! Tunables for the integrator, the walker and the slicer, persisted as JSON.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

const SETTINGS_SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity_strength: f64,
    pub collider_radius: f64,
    pub velocity_decay: f64,
    pub limit_slope: f64,
    pub use_gravity: bool,
    pub collisions: bool,
    pub elastic: bool,
    pub restitution: f64,
    pub max_speed: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity_strength: 9.8,
            collider_radius: 0.5,
            velocity_decay: 0.1,
            limit_slope: 0.7,
            use_gravity: true,
            collisions: true,
            elastic: false,
            restitution: 0.5,
            max_speed: 50.0,
        }
    }
}

impl PhysicsSettings {
    pub fn sanitized(mut self) -> Self {
        self.gravity_strength = self.gravity_strength.clamp(0.0, 200.0);
        self.collider_radius = self.collider_radius.clamp(0.01, 100.0);
        self.velocity_decay = self.velocity_decay.max(0.0);
        self.limit_slope = self.limit_slope.clamp(0.0, 1.0);
        self.restitution = self.restitution.clamp(0.0, 1.0);
        self.max_speed = self.max_speed.max(0.0);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalkerSettings {
    pub move_speed: f64,
    pub jump_velocity: f64,
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self {
            move_speed: 30.0,
            jump_velocity: 5.0,
        }
    }
}

impl WalkerSettings {
    pub fn sanitized(mut self) -> Self {
        self.move_speed = self.move_speed.clamp(0.0, 1000.0);
        self.jump_velocity = self.jump_velocity.clamp(0.0, 100.0);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlicerSettings {
    /// Time constant of the exponential approach to the target, in seconds.
    pub smooth_time: f64,
    /// W moved per scroll notch.
    pub scroll_step: f64,
    /// Window over which scroll notches are merged before they move the
    /// target, in seconds.
    pub scroll_window: f64,
    /// Extra room past the outermost shape on either side.
    pub bounds_padding: f64,
    /// Half-width of the smallest allowed bounds span.
    pub min_half_span: f64,
}

impl Default for SlicerSettings {
    fn default() -> Self {
        Self {
            smooth_time: 0.15,
            scroll_step: 0.5,
            scroll_window: 0.08,
            bounds_padding: 2.0,
            min_half_span: 5.0,
        }
    }
}

impl SlicerSettings {
    pub fn sanitized(mut self) -> Self {
        self.smooth_time = self.smooth_time.clamp(0.0, 10.0);
        self.scroll_step = self.scroll_step.clamp(0.0, 100.0);
        self.scroll_window = self.scroll_window.clamp(0.0, 2.0);
        self.bounds_padding = self.bounds_padding.clamp(0.0, 1000.0);
        self.min_half_span = self.min_half_span.clamp(0.0, 1000.0);
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub schema_version: u32,
    pub physics: PhysicsSettings,
    pub walker: WalkerSettings,
    pub slicer: SlicerSettings,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            physics: PhysicsSettings::default(),
            walker: WalkerSettings::default(),
            slicer: SlicerSettings::default(),
        }
    }
}

impl SimulationSettings {
    pub fn sanitized(mut self) -> Self {
        self.schema_version = SETTINGS_SCHEMA_VERSION;
        self.physics = self.physics.sanitized();
        self.walker = self.walker.sanitized();
        self.slicer = self.slicer.sanitized();
        self
    }
}

pub fn load_settings(path: &Path) -> Option<SimulationSettings> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            if error.kind() != io::ErrorKind::NotFound {
                log::warn!("Failed to read settings {}: {}", path.display(), error);
            }
            return None;
        }
    };

    match serde_json::from_str::<SimulationSettings>(&raw) {
        Ok(settings) => Some(settings.sanitized()),
        Err(error) => {
            log::warn!(
                "Failed to parse settings {}: {} (ignoring file)",
                path.display(),
                error
            );
            None
        }
    }
}

pub fn save_settings(path: &Path, settings: &SimulationSettings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(settings)
        .map_err(|error| io::Error::new(io::ErrorKind::Other, error))?;
    std::fs::write(path, bytes)
}
