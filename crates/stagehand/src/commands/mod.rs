//! # Command Surface
//!
//! Every session operation as a serde value, so a host can queue, log or
//! script them. Shape, light and texture-slot names are kept as text and
//! parsed at dispatch: an unknown shape falls back to a box, an unknown
//! light kind to a point light and an unknown slot makes the command a
//! no-op.
//!
//! ```rust
//! use stagehand::prelude::*;
//!
//! let script = r##"[
//!     InitializeEngine,
//!     InitializeScene(transparent: false, background: "#000000"),
//!     CreatePrimitive(id: "cube1", shape: "box", color: "#ff0000"),
//!     AddToScene(id: "cube1"),
//! ]"##;
//! let commands: Vec<Command> = ron::from_str(script).unwrap();
//!
//! let mut session = Session::new(SessionConfig::default(), Box::new(HeadlessSurface::new(64, 64)));
//! for command in commands {
//!     session.execute(command);
//! }
//! assert!(session.resolve("cube1").is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::properties::Reading;
use crate::scene::{LightKind, ShapeKind, TextureSlot};
use crate::session::Session;

fn default_intensity() -> f32 {
    1.0
}

/// One session command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Bring up the engine
    InitializeEngine,
    /// Create root and camera
    InitializeScene {
        /// Clear to transparent
        #[serde(default)]
        transparent: bool,
        /// Opaque background color
        #[serde(default)]
        background: String,
    },
    /// Empty the scene
    ClearScene,
    /// Request an equirectangular skybox
    SetSkybox {
        /// Texture URL
        url: String,
    },
    /// Register a primitive mesh
    CreatePrimitive {
        /// Id to register
        id: String,
        /// `box`, `sphere`, `plane`, `torus` or `cylinder`
        shape: String,
        /// Base color
        color: String,
    },
    /// Request an OBJ model
    LoadModel {
        /// Id to register once loaded
        id: String,
        /// OBJ URL
        model_url: String,
        /// Optional MTL URL
        #[serde(default)]
        material_url: Option<String>,
    },
    /// Register a light
    CreateLight {
        /// Id to register
        id: String,
        /// `point`, `spot`, `directional` or `hemisphere`
        kind: String,
        /// Light color
        color: String,
        /// Intensity
        #[serde(default = "default_intensity")]
        intensity: f32,
        /// Add a lens flare (point lights only)
        #[serde(default)]
        wants_flare: bool,
    },
    /// Texture every material under an object
    SetTexture {
        /// Target id
        id: String,
        /// `skin`, `bumps`, `roughness` or `reflection`
        slot: String,
        /// Texture URL; empty clears
        url: String,
    },
    /// Texture one material of an object
    SetTextureAtIndex {
        /// Target id
        id: String,
        /// Material index
        index: usize,
        /// Texture slot name
        slot: String,
        /// Texture URL; empty clears
        url: String,
    },
    /// Face an object toward another
    LookAt {
        /// Object to turn
        id: String,
        /// Object to face
        target: String,
    },
    /// Parent an object to the scene root
    AddToScene {
        /// Object id
        id: String,
    },
    /// Remove an object from the scene root
    RemoveFromScene {
        /// Object id
        id: String,
    },
    /// Attach `child` to `parent`, `distance` units ahead of it
    Attach {
        /// Child id
        child: String,
        /// Parent id; `camera` glues the child to the camera
        parent: String,
        /// Offset along the parent's facing axis
        #[serde(default)]
        distance: f32,
    },
    /// Detach an object, keeping its world pose
    Detach {
        /// Object id
        id: String,
    },
    /// Turn the camera about world Y
    CameraYaw(f32),
    /// Turn the camera about its X axis
    CameraPitch(f32),
    /// Turn the camera about its Z axis
    CameraRoll(f32),
    /// Move the camera along its Z axis
    CameraMoveForward(f32),
    /// Move the camera along its X axis
    CameraMoveRight(f32),
    /// Move the camera along its Y axis
    CameraMoveUp(f32),
    /// Enable or pause physics
    EnablePhysics(bool),
    /// Replace gravity
    SetGravity(f32, f32, f32),
    /// Add to gravity
    ChangeGravity(f32, f32, f32),
    /// Read gravity
    GetGravity,
    /// Bind a box body to a mesh
    AddBody {
        /// Body id
        id: String,
        /// Immovable body
        #[serde(default)]
        is_static: bool,
        /// Mass; ignored for static bodies
        #[serde(default)]
        mass: f32,
        /// Mesh id
        mesh: String,
    },
    /// Overwrite a body's velocity
    SetVelocity {
        /// Body id
        id: String,
        /// Velocity
        velocity: (f32, f32, f32),
    },
    /// Assign a property from a raw argument
    SetProperty {
        /// Object id
        id: String,
        /// Dotted property path
        path: String,
        /// Raw value: `@id`, `#hex`, JSON or text
        value: String,
    },
    /// Add to a numeric property
    ChangeProperty {
        /// Object id
        id: String,
        /// Dotted property path
        path: String,
        /// Amount to add
        delta: f64,
    },
    /// Read a property
    GetProperty {
        /// Object id
        id: String,
        /// Dotted property path
        path: String,
    },
    /// Apply finished asset loads
    PumpAssets,
    /// Run one frame
    Tick,
}

impl Command {
    /// Short name for traces
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeEngine => "initialize-engine",
            Self::InitializeScene { .. } => "initialize-scene",
            Self::ClearScene => "clear-scene",
            Self::SetSkybox { .. } => "set-skybox",
            Self::CreatePrimitive { .. } => "create-primitive",
            Self::LoadModel { .. } => "load-model",
            Self::CreateLight { .. } => "create-light",
            Self::SetTexture { .. } => "set-texture",
            Self::SetTextureAtIndex { .. } => "set-texture-at-index",
            Self::LookAt { .. } => "look-at",
            Self::AddToScene { .. } => "add-to-scene",
            Self::RemoveFromScene { .. } => "remove-from-scene",
            Self::Attach { .. } => "attach",
            Self::Detach { .. } => "detach",
            Self::CameraYaw(_) => "camera-yaw",
            Self::CameraPitch(_) => "camera-pitch",
            Self::CameraRoll(_) => "camera-roll",
            Self::CameraMoveForward(_) => "camera-move-forward",
            Self::CameraMoveRight(_) => "camera-move-right",
            Self::CameraMoveUp(_) => "camera-move-up",
            Self::EnablePhysics(_) => "enable-physics",
            Self::SetGravity(..) => "set-gravity",
            Self::ChangeGravity(..) => "change-gravity",
            Self::GetGravity => "get-gravity",
            Self::AddBody { .. } => "add-body",
            Self::SetVelocity { .. } => "set-velocity",
            Self::SetProperty { .. } => "set-property",
            Self::ChangeProperty { .. } => "change-property",
            Self::GetProperty { .. } => "get-property",
            Self::PumpAssets => "pump-assets",
            Self::Tick => "tick",
        }
    }
}

fn texture_slot(name: &str) -> Option<TextureSlot> {
    let slot = name.parse().ok();
    if slot.is_none() {
        log::debug!("Unknown texture slot '{}'", name);
    }
    slot
}

impl Session {
    /// Run one command. Queries return their reading; everything else
    /// returns `None`.
    pub fn execute(&mut self, command: Command) -> Option<Reading> {
        log::debug!("> {}", command.name());

        match command {
            Command::InitializeEngine => self.initialize_engine(),
            Command::InitializeScene { transparent, background } => self.initialize_scene(transparent, &background),
            Command::ClearScene => self.clear_scene(),
            Command::SetSkybox { url } => self.set_skybox(&url),
            Command::CreatePrimitive { id, shape, color } => {
                let shape = shape.parse().unwrap_or(ShapeKind::Box);
                self.create_primitive(&id, shape, &color);
            }
            Command::LoadModel { id, model_url, material_url } => {
                self.load_model(&id, &model_url, material_url.as_deref());
            }
            Command::CreateLight { id, kind, color, intensity, wants_flare } => {
                let kind = kind.parse().unwrap_or(LightKind::Point);
                self.create_light(&id, kind, &color, intensity, wants_flare);
            }
            Command::SetTexture { id, slot, url } => {
                if let Some(slot) = texture_slot(&slot) {
                    self.set_texture(&id, slot, &url);
                }
            }
            Command::SetTextureAtIndex { id, index, slot, url } => {
                if let Some(slot) = texture_slot(&slot) {
                    self.set_texture_at_index(&id, index, slot, &url);
                }
            }
            Command::LookAt { id, target } => self.look_at(&id, &target),
            Command::AddToScene { id } => self.add_to_scene(&id),
            Command::RemoveFromScene { id } => self.remove_from_scene(&id),
            Command::Attach { child, parent, distance } => self.attach(&child, &parent, distance),
            Command::Detach { id } => self.detach(&id),
            Command::CameraYaw(degrees) => self.camera_yaw(degrees),
            Command::CameraPitch(degrees) => self.camera_pitch(degrees),
            Command::CameraRoll(degrees) => self.camera_roll(degrees),
            Command::CameraMoveForward(distance) => self.camera_move_forward(distance),
            Command::CameraMoveRight(distance) => self.camera_move_right(distance),
            Command::CameraMoveUp(distance) => self.camera_move_up(distance),
            Command::EnablePhysics(enabled) => self.enable_physics(enabled),
            Command::SetGravity(x, y, z) => self.set_gravity(x, y, z),
            Command::ChangeGravity(x, y, z) => self.change_gravity(x, y, z),
            Command::GetGravity => return Some(self.get_gravity()),
            Command::AddBody { id, is_static, mass, mesh } => self.add_body(&id, is_static, mass, &mesh),
            Command::SetVelocity { id, velocity: (x, y, z) } => self.set_velocity(&id, x, y, z),
            Command::SetProperty { id, path, value } => self.set_property(&id, &path, &value),
            Command::ChangeProperty { id, path, delta } => self.change_property(&id, &path, delta),
            Command::GetProperty { id, path } => return Some(self.get_property(&id, &path)),
            Command::PumpAssets => self.pump_assets(),
            Command::Tick => self.tick(),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SessionConfig;
    use crate::render::HeadlessSurface;
    use crate::scene::ObjectKind;

    fn run(session: &mut Session, script: &str) -> Vec<Reading> {
        let commands: Vec<Command> = ron::from_str(script).expect("script parses");
        commands.into_iter().filter_map(|c| session.execute(c)).collect()
    }

    fn fresh() -> Session {
        Session::new(SessionConfig::default(), Box::new(HeadlessSurface::new(320, 240)))
    }

    #[test]
    fn test_script_round_trip() {
        let mut session = fresh();
        let readings = run(&mut session, r##"[
            InitializeEngine,
            InitializeScene(transparent: false, background: "#202020"),
            CreatePrimitive(id: "cube1", shape: "BoxGeometry", color: "#ff0000"),
            AddToScene(id: "cube1"),
            SetProperty(id: "cube1", path: "rotation.x", value: "90"),
            ChangeProperty(id: "cube1", path: "position.y", delta: 2.5),
            GetProperty(id: "cube1", path: "rotation.x"),
            GetProperty(id: "cube1", path: "position.y"),
            Tick,
        ]"##);

        assert_eq!(readings.len(), 2);
        approx::assert_relative_eq!(readings[0].as_number().unwrap(), 90.0, epsilon = 1e-4);
        assert_eq!(readings[1], Reading::Number(2.5));
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let mut session = fresh();
        run(&mut session, r##"[
            InitializeEngine,
            InitializeScene(transparent: false, background: "#000000"),
            CreatePrimitive(id: "thing", shape: "teapot", color: "white"),
            CreateLight(id: "lamp", kind: "lava", color: "#ffffff"),
            SetTexture(id: "thing", slot: "sparkles", url: "x.png"),
        ]"##);

        assert_eq!(session.get_property("thing", "material.length"), Reading::Number(6.0));
        let lamp = session.resolve("lamp").unwrap();
        let Some(ObjectKind::Light(light)) = session.graph().get(lamp).map(|n| &n.kind) else {
            panic!("lamp is a light");
        };
        assert_eq!(light.kind, LightKind::Point);
        assert_eq!(session.get_property("lamp", "intensity"), Reading::Number(1.0));
        assert_eq!(session.get_property("thing", "material.map"), Reading::Empty);
    }

    #[test]
    fn test_physics_commands() {
        let mut session = fresh();
        let readings = run(&mut session, r##"[
            InitializeEngine,
            InitializeScene(transparent: false, background: "#000000"),
            GetGravity,
            EnablePhysics(true),
            SetGravity(0.0, -10.0, 0.0),
            ChangeGravity(0.0, -1.0, 0.0),
            GetGravity,
            CreatePrimitive(id: "ball", shape: "sphere", color: "#00ff00"),
            AddBody(id: "ball", mass: 1.0, mesh: "ball"),
            SetVelocity(id: "ball", velocity: (1.0, 0.0, 0.0)),
            Tick,
        ]"##);

        assert_eq!(readings, vec![Reading::Text("0,0,0".into()), Reading::Text("0,-11,0".into())]);
        assert!(session.physics().is_bound("ball"));
    }

    #[test]
    fn test_camera_commands() {
        let mut session = fresh();
        run(&mut session, r##"[
            InitializeEngine,
            InitializeScene(transparent: false, background: "#000000"),
            CameraYaw(90.0),
            CameraMoveForward(1.0),
        ]"##);

        let position = session.world_position("camera").unwrap();
        approx::assert_relative_eq!(position.x, 1.0, epsilon = 1e-5);
        approx::assert_relative_eq!(position.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Tick.name(), "tick");
        assert_eq!(Command::SetGravity(0.0, 0.0, 0.0).name(), "set-gravity");
        assert_eq!(Command::Detach { id: "a".into() }.name(), "detach");
    }
}
