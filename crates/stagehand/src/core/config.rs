//! # Session Configuration
//!
//! Defaults mirror the behaviour callers expect from a fresh session:
//! Earth-like gravity, a ten-iteration solver stepping at 60 Hz and a
//! 75° perspective camera five units back from the origin.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// # Physics Configuration
///
/// Parameters used when the physics world is first created. Later
/// gravity changes go through the session, not through this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Initial gravity vector
    pub gravity: [f32; 3],
    /// Fixed solver iteration count
    pub solver_iterations: usize,
    /// Fixed simulation step in seconds, independent of wall time
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.82, 0.0],
            solver_iterations: 10,
            timestep: 1.0 / 60.0,
        }
    }
}

/// # Camera Configuration
///
/// Lens and starting pose of the camera created by scene initialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Starting position
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 2000.0,
            position: [0.0, 0.0, 5.0],
        }
    }
}

/// # Surface Configuration
///
/// Size of the overlay drawing surface, used for the camera aspect ratio
/// when the surface itself does not report one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { width: 480, height: 360 }
    }
}

/// One element of a lens flare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlareElementConfig {
    /// Texture URL
    pub texture: String,
    /// Size in pixels
    pub size: f32,
    /// Position along the light-to-center line (0 = at the light)
    pub distance: f32,
    /// Whether the element takes the light's color
    #[serde(default)]
    pub tinted: bool,
}

impl FlareElementConfig {
    fn new(texture: &str, size: f32, distance: f32, tinted: bool) -> Self {
        Self { texture: texture.to_string(), size, distance, tinted }
    }
}

/// # Flare Configuration
///
/// Element list used for every point light that asks for a lens flare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlareConfig {
    /// Flare elements, drawn in order
    pub elements: Vec<FlareElementConfig>,
}

impl Default for FlareConfig {
    fn default() -> Self {
        const GLOW: &str = "https://threejs.org/examples/textures/lensflare/lensflare0.png";
        const RING: &str = "https://threejs.org/examples/textures/lensflare/lensflare3.png";
        Self {
            elements: vec![
                FlareElementConfig::new(GLOW, 700.0, 0.0, true),
                FlareElementConfig::new(RING, 60.0, 0.6, false),
                FlareElementConfig::new(RING, 70.0, 0.7, false),
                FlareElementConfig::new(RING, 120.0, 0.9, false),
                FlareElementConfig::new(RING, 70.0, 1.0, false),
            ],
        }
    }
}

/// # Complete Session Configuration
///
/// Top-level configuration that encompasses all session subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Physics world defaults
    pub physics: PhysicsConfig,
    /// Camera defaults
    pub camera: CameraConfig,
    /// Drawing surface defaults
    pub surface: SurfaceConfig,
    /// Lens flare layout
    pub flare: FlareConfig,
}

impl SessionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.physics.solver_iterations == 0 {
            return Err("Solver iterations must be at least 1".to_string());
        }
        if !(self.physics.timestep > 0.0) {
            return Err("Physics timestep must be positive".to_string());
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err("Camera clip planes must satisfy 0 < near < far".to_string());
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err("Surface size must be non-zero".to_string());
        }
        Ok(())
    }
}

impl Config for SessionConfig {}
