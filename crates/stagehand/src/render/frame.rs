//! Frame snapshots
//!
//! A [`Frame`] is what one draw call sees: the camera, the background and
//! every visible drawable under the scene root, in draw order.

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::scene::{Background, Color, Flare, Light, Material, MaterialSet, NodeKey, ObjectKind, SceneGraph};

/// Surface setup chosen at scene initialisation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Clear to transparent instead of `clear_color`
    pub transparent: bool,
    /// Opaque clear color
    pub clear_color: Color,
}

/// Camera pose and lens for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Camera world matrix
    pub world: Mat4,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
}

impl CameraView {
    /// World-space eye position
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.world[(0, 3)], self.world[(1, 3)], self.world[(2, 3)])
    }
    
    /// World-space viewing direction (local -Z)
    pub fn forward(&self) -> Vec3 {
        (self.world * Vec4::new(0.0, 0.0, -1.0, 0.0)).xyz().normalize()
    }
    
    /// View matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.world.try_inverse().unwrap_or_else(Mat4::identity)
    }
    
    /// Perspective projection
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov.to_radians(), self.near, self.far)
    }
}

/// What gets drawn for a node
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    /// Mesh with its materials, one per face group
    Mesh(Vec<Material>),
    /// Light source
    Light(Light),
    /// Lens flare
    Flare(Flare),
}

/// One visible node
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// Source node
    pub node: NodeKey,
    /// Node name
    pub name: String,
    /// World matrix at capture time
    pub world: Mat4,
    /// Draw order; higher draws later
    pub render_order: i32,
    /// Payload
    pub item: DrawItem,
}

/// Everything one draw call needs
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Monotonic frame number within a session
    pub sequence: u64,
    /// Camera
    pub camera: CameraView,
    /// Background of the scene root
    pub background: Background,
    /// Visible drawables in draw order
    pub drawables: Vec<Drawable>,
}

impl Frame {
    /// Snapshot the subtree under `root` as seen from `camera`.
    ///
    /// Uses cached world matrices, so they must be current. Invisible nodes
    /// hide their whole subtree. `None` if `root` is not a scene or
    /// `camera` is not a camera.
    pub fn capture(graph: &SceneGraph, root: NodeKey, camera: NodeKey, sequence: u64) -> Option<Self> {
        let Some(ObjectKind::Scene(scene)) = graph.get(root).map(|n| &n.kind) else {
            return None;
        };
        let camera_node = graph.get(camera)?;
        let ObjectKind::Camera(lens) = &camera_node.kind else {
            return None;
        };
        
        let view = CameraView {
            world: *camera_node.matrix_world(),
            fov: lens.fov,
            aspect: lens.aspect,
            near: lens.near,
            far: lens.far,
        };
        
        let mut drawables = Vec::new();
        let mut stack: Vec<NodeKey> = graph.children(root).iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = graph.get(key) else { continue };
            if !node.visible {
                continue;
            }
            
            let item = match &node.kind {
                ObjectKind::Mesh(mesh) => Some(DrawItem::Mesh(match &mesh.materials {
                    MaterialSet::Single(material) => vec![material.clone()],
                    MaterialSet::PerFace(materials) => materials.clone(),
                })),
                ObjectKind::Light(light) => Some(DrawItem::Light(light.clone())),
                ObjectKind::Flare(flare) => Some(DrawItem::Flare(flare.clone())),
                _ => None,
            };
            if let Some(item) = item {
                drawables.push(Drawable {
                    node: key,
                    name: node.name.clone(),
                    world: *node.matrix_world(),
                    render_order: node.render_order,
                    item,
                });
            }
            stack.extend(node.children().iter().rev().copied());
        }
        drawables.sort_by_key(|d| d.render_order);
        
        Some(Self {
            sequence,
            camera: view,
            background: scene.background.clone(),
            drawables,
        })
    }
    
    /// Whether `node` was drawn
    pub fn contains(&self, node: NodeKey) -> bool {
        self.drawables.iter().any(|d| d.node == node)
    }
    
    /// Drawable for `node`
    pub fn drawable(&self, node: NodeKey) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.node == node)
    }
    
    /// Number of meshes drawn
    pub fn mesh_count(&self) -> usize {
        self.drawables
            .iter()
            .filter(|d| matches!(d.item, DrawItem::Mesh(_)))
            .count()
    }
}
