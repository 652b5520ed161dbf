//! Scene object variants
//!
//! Every node in the scene graph carries exactly one [`ObjectKind`], fixed
//! when the factory creates it. Callers never probe an object to discover
//! what it is; they match on the kind.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::scene_graph::AABB;
use crate::foundation::math::Vec3;

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Pure white
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };
    
    /// Build from a packed `0xRRGGBB` integer
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self { r: channel(16), g: channel(8), b: channel(0) }
    }
    
    /// Pack into `0xRRGGBB`
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
    
    /// Six lowercase hex digits, no prefix
    pub fn hex_string(self) -> String {
        format!("{:06x}", self.to_hex())
    }
    
    /// Parse `#rrggbb`, `#rgb`, `0xrrggbb` or a basic color name
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .or_else(|| text.strip_prefix("0X"));
        
        if let Some(digits) = digits {
            return match digits.len() {
                6 => u32::from_str_radix(digits, 16).ok().map(Self::from_hex),
                3 => {
                    let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                    u32::from_str_radix(&expanded, 16).ok().map(Self::from_hex)
                }
                _ => None,
            };
        }
        
        let hex = match text.to_ascii_lowercase().as_str() {
            "black" => 0x000000,
            "white" => 0xffffff,
            "red" => 0xff0000,
            "lime" => 0x00ff00,
            "green" => 0x008000,
            "blue" => 0x0000ff,
            "yellow" => 0xffff00,
            "cyan" | "aqua" => 0x00ffff,
            "magenta" | "fuchsia" => 0xff00ff,
            "orange" => 0xffa500,
            "purple" => 0x800080,
            "gray" | "grey" => 0x808080,
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Built-in primitive shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// 1×1×1 box, one material per face
    Box,
    /// Sphere of radius 1
    Sphere,
    /// 1×1 plane in the XY plane
    Plane,
    /// Torus of radius 1 with tube radius 0.4
    Torus,
    /// Cylinder of radius 1 and height 1
    Cylinder,
}

impl ShapeKind {
    /// Local-space bounds of the shape's geometry
    pub fn bounds(self) -> AABB {
        let half = match self {
            Self::Box => Vec3::new(0.5, 0.5, 0.5),
            Self::Sphere => Vec3::new(1.0, 1.0, 1.0),
            Self::Plane => Vec3::new(0.5, 0.5, 0.0),
            Self::Torus => Vec3::new(1.4, 1.4, 0.4),
            Self::Cylinder => Vec3::new(1.0, 0.5, 1.0),
        };
        AABB::from_center_extents(Vec3::zeros(), half)
    }
    
    /// Number of material slots the shape is built with
    pub fn material_slots(self) -> usize {
        match self {
            Self::Box => 6,
            _ => 1,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ();
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches("Geometry").to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box),
            "sphere" => Ok(Self::Sphere),
            "plane" => Ok(Self::Plane),
            "torus" => Ok(Self::Torus),
            "cylinder" => Ok(Self::Cylinder),
            _ => Err(()),
        }
    }
}

/// Geometry reference held by a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Primitive the geometry was generated from, `None` for loaded models
    pub shape: Option<ShapeKind>,
    /// Local-space bounds
    pub bounds: AABB,
}

impl Geometry {
    /// Geometry of a built-in primitive
    pub fn primitive(shape: ShapeKind) -> Self {
        Self { shape: Some(shape), bounds: shape.bounds() }
    }
}

/// How a texture is sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureMapping {
    /// Regular UV mapping
    Uv,
    /// Equirectangular environment lookup
    EquirectangularReflection,
}

/// A texture by URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    /// Source URL
    pub url: String,
    /// Sampling mode
    pub mapping: TextureMapping,
}

/// Texture slots addressable from the command surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSlot {
    /// Base color map
    Skin,
    /// Normal map
    Bumps,
    /// Roughness map
    Roughness,
    /// Environment reflection map
    Reflection,
}

impl FromStr for TextureSlot {
    type Err = ();
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skin" => Ok(Self::Skin),
            "bumps" => Ok(Self::Bumps),
            "roughness" => Ok(Self::Roughness),
            "reflection" => Ok(Self::Reflection),
            _ => Err(()),
        }
    }
}

/// Standard (metal/rough) surface material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Optional name from a material library
    pub name: String,
    /// Base color
    pub color: Color,
    /// Emissive color
    pub emissive: Color,
    /// Opacity, only honoured when `transparent` is set
    pub opacity: f32,
    /// Blend instead of write depth
    pub transparent: bool,
    /// Surface roughness
    pub roughness: f32,
    /// Surface metalness
    pub metalness: f32,
    /// Draw edges only
    pub wireframe: bool,
    /// Base color map
    pub map: Option<TextureRef>,
    /// Normal map
    pub normal_map: Option<TextureRef>,
    /// Roughness map
    pub roughness_map: Option<TextureRef>,
    /// Environment map
    pub env_map: Option<TextureRef>,
    /// Bumped whenever a texture slot changes, so a backend can re-upload
    pub version: u32,
}

impl Material {
    /// Standard material with the given base color
    pub fn standard(color: Color) -> Self {
        Self {
            name: String::new(),
            color,
            emissive: Color { r: 0.0, g: 0.0, b: 0.0 },
            opacity: 1.0,
            transparent: false,
            roughness: 1.0,
            metalness: 0.0,
            wireframe: false,
            map: None,
            normal_map: None,
            roughness_map: None,
            env_map: None,
            version: 0,
        }
    }
    
    /// Set or clear (empty `url`) a texture slot
    pub fn apply_texture(&mut self, slot: TextureSlot, url: &str) {
        let texture = (!url.is_empty()).then(|| TextureRef {
            url: url.to_string(),
            mapping: TextureMapping::Uv,
        });
        
        match slot {
            TextureSlot::Skin => {
                if texture.is_some() {
                    self.color = Color::WHITE;
                }
                self.map = texture;
            }
            TextureSlot::Bumps => self.normal_map = texture,
            TextureSlot::Roughness => self.roughness_map = texture,
            TextureSlot::Reflection => {
                self.env_map = texture.map(|t| TextureRef {
                    mapping: TextureMapping::EquirectangularReflection,
                    ..t
                });
            }
        }
        self.version += 1;
    }
}

/// A mesh's material binding: one material or one per geometry group
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSet {
    /// Single material for the whole mesh
    Single(Material),
    /// One material per face group, indexed from zero
    PerFace(Vec<Material>),
}

impl MaterialSet {
    /// `count` copies of `material`; a single material when `count <= 1`
    pub fn uniform(material: Material, count: usize) -> Self {
        if count <= 1 {
            Self::Single(material)
        } else {
            Self::PerFace(vec![material; count])
        }
    }
    
    /// Material at `index`; a single material answers for any index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Material> {
        match self {
            Self::Single(material) => Some(material),
            Self::PerFace(materials) => materials.get_mut(index),
        }
    }
    
    /// All materials
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Material> {
        match self {
            Self::Single(material) => std::slice::from_mut(material).iter_mut(),
            Self::PerFace(materials) => materials.iter_mut(),
        }
    }
}

/// Renderable geometry plus its materials
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Geometry
    pub geometry: Geometry,
    /// Materials
    pub materials: MaterialSet,
}

/// Supported light types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    /// Omni light with optional range falloff
    Point,
    /// Cone light
    Spot,
    /// Parallel rays toward a target
    Directional,
    /// Sky/ground ambient gradient
    Hemisphere,
}

impl FromStr for LightKind {
    type Err = ();
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches("Light").to_ascii_lowercase().as_str() {
            "point" => Ok(Self::Point),
            "spot" => Ok(Self::Spot),
            "directional" => Ok(Self::Directional),
            "hemisphere" => Ok(Self::Hemisphere),
            _ => Err(()),
        }
    }
}

/// Light parameters; fields that do not apply to the kind are ignored
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type
    pub kind: LightKind,
    /// Light (sky) color
    pub color: Color,
    /// Intensity multiplier
    pub intensity: f32,
    /// Range for point/spot lights, 0 = unlimited
    pub distance: f32,
    /// Falloff exponent for point/spot lights
    pub decay: f32,
    /// Cone half-angle in radians (spot)
    pub angle: f32,
    /// Cone edge softness in `[0, 1]` (spot)
    pub penumbra: f32,
    /// Ground color (hemisphere)
    pub ground_color: Color,
    /// Registered id the light aims at (spot/directional)
    pub target: Option<String>,
}

impl Light {
    /// Light of `kind` with the usual defaults for the kind-specific fields
    pub fn new(kind: LightKind, color: Color, intensity: f32) -> Self {
        Self {
            kind,
            color,
            intensity,
            distance: 0.0,
            decay: 1.0,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            ground_color: Color::from_hex(0x444444),
            target: None,
        }
    }
}

/// Perspective camera lens
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Zoom factor
    pub zoom: f32,
}

/// One sprite of a lens flare
#[derive(Debug, Clone, PartialEq)]
pub struct FlareElement {
    /// Texture URL
    pub texture: String,
    /// Size in pixels
    pub size: f32,
    /// Position along the light-to-center line
    pub distance: f32,
    /// Tint, usually the light's color
    pub color: Option<Color>,
}

/// Lens flare tracking a light
#[derive(Debug, Clone, PartialEq)]
pub struct Flare {
    /// Elements in draw order
    pub elements: Vec<FlareElement>,
}

/// What a scene background shows
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Nothing; the surface stays see-through
    Transparent,
    /// Flat clear color
    Color(Color),
    /// Equirectangular sky texture
    Skybox(TextureRef),
}

/// Scene root data
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRoot {
    /// Background
    pub background: Background,
    /// Environment map used for reflections
    pub environment: Option<TextureRef>,
}

/// The variant of a scene object, resolved once at creation
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// Scene root
    Scene(SceneRoot),
    /// Renderable mesh
    Mesh(Mesh),
    /// Light source
    Light(Light),
    /// Camera
    Camera(Camera),
    /// Transform-only group, e.g. a loaded model root
    Group,
    /// Lens flare (internal, never registered)
    Flare(Flare),
}

impl ObjectKind {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scene(_) => "scene",
            Self::Mesh(_) => "mesh",
            Self::Light(_) => "light",
            Self::Camera(_) => "camera",
            Self::Group => "group",
            Self::Flare(_) => "flare",
        }
    }
}
