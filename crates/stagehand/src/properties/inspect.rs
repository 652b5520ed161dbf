//! The attribute graph behind dotted paths
//!
//! Each inspectable type names its attributes by string key. Containers
//! hand out a nested [`Inspect`] through `child_mut`; leaves are read and
//! written as [`Attr`] values.

use serde_json::json;

use super::value::Attr;
use crate::foundation::math::{Euler, Quat, Vec3};
use crate::scene::{Camera, Color, Light, LightKind, Material, MaterialSet, Node, ObjectKind, TextureRef};

/// Something whose attributes can be addressed by key
pub trait Inspect {
    /// Nested container under `key`
    fn child_mut(&mut self, key: &str) -> Option<&mut dyn Inspect>;
    
    /// Current value of the attribute under `key`
    fn read(&self, key: &str) -> Option<Attr>;
    
    /// Assign the attribute under `key`; `false` when the key is unknown or
    /// the value does not fit
    fn write(&mut self, key: &str, value: Attr) -> bool;
    
    /// Color slot under `key`, assigned through [`Color::assign`]
    fn color_mut(&mut self, _key: &str) -> Option<&mut Color> {
        None
    }
    
    /// Add `delta` to the numeric attribute under `key`; `false` when it is
    /// not a number
    fn add(&mut self, key: &str, delta: f64) -> bool {
        match self.read(key) {
            Some(Attr::Number(current)) => self.write(key, Attr::Number(current + delta)),
            _ => false,
        }
    }
}

fn number(value: f32) -> Attr {
    Attr::Number(f64::from(value))
}

fn set_f32(slot: &mut f32, value: &Attr) -> bool {
    match value.as_f32() {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

fn set_bool(slot: &mut bool, value: &Attr) -> bool {
    match value.as_bool() {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

/// Apply the numeric fields of a JSON object onto named slots
fn set_fields(value: &Attr, slots: &mut [(&str, &mut f32)]) -> bool {
    let Attr::Composite(serde_json::Value::Object(map)) = value else {
        return false;
    };
    let mut touched = false;
    for (name, slot) in slots.iter_mut() {
        if let Some(v) = map.get(*name).and_then(serde_json::Value::as_f64) {
            **slot = v as f32;
            touched = true;
        }
    }
    touched
}

fn vec3_json(v: &Vec3) -> serde_json::Value {
    json!({ "x": v.x, "y": v.y, "z": v.z })
}

fn texture_url(texture: Option<&TextureRef>) -> Option<Attr> {
    texture.map(|t| Attr::Text(t.url.clone()))
}

/// Partial assignment of a vector from `{"x": .., "y": .., "z": ..}`
fn set_vec3(target: &mut Vec3, value: &Attr) -> bool {
    let (mut x, mut y, mut z) = (target.x, target.y, target.z);
    if !set_fields(value, &mut [("x", &mut x), ("y", &mut y), ("z", &mut z)]) {
        return false;
    }
    *target = Vec3::new(x, y, z);
    true
}

impl Inspect for Vec3 {
    fn child_mut(&mut self, _key: &str) -> Option<&mut dyn Inspect> {
        None
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match key {
            "x" => Some(number(self.x)),
            "y" => Some(number(self.y)),
            "z" => Some(number(self.z)),
            _ => None,
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        match key {
            "x" => set_f32(&mut self.x, &value),
            "y" => set_f32(&mut self.y, &value),
            "z" => set_f32(&mut self.z, &value),
            _ => false,
        }
    }
}

impl Inspect for Euler {
    fn child_mut(&mut self, _key: &str) -> Option<&mut dyn Inspect> {
        None
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match key {
            "x" => Some(number(self.x)),
            "y" => Some(number(self.y)),
            "z" => Some(number(self.z)),
            _ => None,
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        match key {
            "x" => set_f32(&mut self.x, &value),
            "y" => set_f32(&mut self.y, &value),
            "z" => set_f32(&mut self.z, &value),
            _ => false,
        }
    }
}

impl Inspect for Color {
    fn child_mut(&mut self, _key: &str) -> Option<&mut dyn Inspect> {
        None
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match key {
            "r" => Some(number(self.r)),
            "g" => Some(number(self.g)),
            "b" => Some(number(self.b)),
            _ => None,
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        match key {
            "r" => set_f32(&mut self.r, &value),
            "g" => set_f32(&mut self.g, &value),
            "b" => set_f32(&mut self.b, &value),
            _ => false,
        }
    }
}

impl Material {
    /// JSON summary used when the whole material is read
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "color": self.color.to_hex(),
            "emissive": self.emissive.to_hex(),
            "opacity": self.opacity,
            "transparent": self.transparent,
            "roughness": self.roughness,
            "metalness": self.metalness,
            "wireframe": self.wireframe,
        })
    }
}

impl Inspect for Material {
    fn child_mut(&mut self, key: &str) -> Option<&mut dyn Inspect> {
        match key {
            "color" => Some(&mut self.color),
            "emissive" => Some(&mut self.emissive),
            _ => None,
        }
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match key {
            "name" => Some(Attr::Text(self.name.clone())),
            "color" => Some(Attr::Color(self.color)),
            "emissive" => Some(Attr::Color(self.emissive)),
            "opacity" => Some(number(self.opacity)),
            "transparent" => Some(Attr::Bool(self.transparent)),
            "roughness" => Some(number(self.roughness)),
            "metalness" => Some(number(self.metalness)),
            "wireframe" => Some(Attr::Bool(self.wireframe)),
            "map" => texture_url(self.map.as_ref()),
            "normalMap" => texture_url(self.normal_map.as_ref()),
            "roughnessMap" => texture_url(self.roughness_map.as_ref()),
            "envMap" => texture_url(self.env_map.as_ref()),
            "version" => Some(Attr::Number(f64::from(self.version))),
            _ => None,
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        let written = match key {
            "name" => {
                self.name = value.as_text();
                true
            }
            "color" => self.color.assign(&value),
            "emissive" => self.emissive.assign(&value),
            "opacity" => set_f32(&mut self.opacity, &value),
            "transparent" => set_bool(&mut self.transparent, &value),
            "roughness" => set_f32(&mut self.roughness, &value),
            "metalness" => set_f32(&mut self.metalness, &value),
            "wireframe" => set_bool(&mut self.wireframe, &value),
            _ => false,
        };
        if written {
            self.version += 1;
        }
        written
    }
    
    fn color_mut(&mut self, key: &str) -> Option<&mut Color> {
        match key {
            "color" => Some(&mut self.color),
            "emissive" => Some(&mut self.emissive),
            _ => None,
        }
    }
}

/// A single material behaves as that material. A per-face list is indexed
/// by `"0"`, `"1"`, ...; other keys read the first face, and writes and
/// numeric adds apply to every face on its own value.
impl Inspect for MaterialSet {
    fn child_mut(&mut self, key: &str) -> Option<&mut dyn Inspect> {
        match self {
            Self::Single(material) => material.child_mut(key),
            Self::PerFace(materials) => {
                let index: usize = key.parse().ok()?;
                materials.get_mut(index).map(|m| m as &mut dyn Inspect)
            }
        }
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match self {
            Self::Single(material) => material.read(key),
            Self::PerFace(materials) => {
                if key == "length" {
                    return Some(Attr::Number(materials.len() as f64));
                }
                if let Ok(index) = key.parse::<usize>() {
                    return materials.get(index).map(|m| Attr::Composite(m.summary()));
                }
                materials.first().and_then(|m| m.read(key))
            }
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        match self {
            Self::Single(material) => material.write(key, value),
            Self::PerFace(materials) => {
                if key.parse::<usize>().is_ok() {
                    return false;
                }
                let mut written = false;
                for material in materials.iter_mut() {
                    written |= material.write(key, value.clone());
                }
                written
            }
        }
    }
    
    fn color_mut(&mut self, key: &str) -> Option<&mut Color> {
        match self {
            Self::Single(material) => material.color_mut(key),
            // Per-face colors go through `write` so every face is updated
            Self::PerFace(_) => None,
        }
    }
    
    fn add(&mut self, key: &str, delta: f64) -> bool {
        match self {
            Self::Single(material) => material.add(key, delta),
            Self::PerFace(materials) => {
                if key.parse::<usize>().is_ok() {
                    return false;
                }
                let mut changed = false;
                for material in materials.iter_mut() {
                    changed |= material.add(key, delta);
                }
                changed
            }
        }
    }
}

impl Light {
    fn has_range(&self) -> bool {
        matches!(self.kind, LightKind::Point | LightKind::Spot)
    }
    
    fn has_target(&self) -> bool {
        matches!(self.kind, LightKind::Spot | LightKind::Directional)
    }
}

impl Inspect for Light {
    fn child_mut(&mut self, key: &str) -> Option<&mut dyn Inspect> {
        match key {
            "color" => Some(&mut self.color),
            "groundColor" if self.kind == LightKind::Hemisphere => Some(&mut self.ground_color),
            _ => None,
        }
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match key {
            "color" => Some(Attr::Color(self.color)),
            "intensity" => Some(number(self.intensity)),
            "distance" if self.has_range() => Some(number(self.distance)),
            "decay" if self.has_range() => Some(number(self.decay)),
            "angle" if self.kind == LightKind::Spot => Some(number(self.angle)),
            "penumbra" if self.kind == LightKind::Spot => Some(number(self.penumbra)),
            "groundColor" if self.kind == LightKind::Hemisphere => Some(Attr::Color(self.ground_color)),
            "target" if self.has_target() => self.target.clone().map(Attr::Object),
            _ => None,
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        match key {
            "color" => self.color.assign(&value),
            "intensity" => set_f32(&mut self.intensity, &value),
            "distance" if self.has_range() => set_f32(&mut self.distance, &value),
            "decay" if self.has_range() => set_f32(&mut self.decay, &value),
            "angle" if self.kind == LightKind::Spot => set_f32(&mut self.angle, &value),
            "penumbra" if self.kind == LightKind::Spot => set_f32(&mut self.penumbra, &value),
            "groundColor" if self.kind == LightKind::Hemisphere => self.ground_color.assign(&value),
            "target" if self.has_target() => match value {
                Attr::Object(id) => {
                    self.target = Some(id);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
    
    fn color_mut(&mut self, key: &str) -> Option<&mut Color> {
        match key {
            "color" => Some(&mut self.color),
            "groundColor" if self.kind == LightKind::Hemisphere => Some(&mut self.ground_color),
            _ => None,
        }
    }
}

impl Inspect for Camera {
    fn child_mut(&mut self, _key: &str) -> Option<&mut dyn Inspect> {
        None
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match key {
            "fov" => Some(number(self.fov)),
            "aspect" => Some(number(self.aspect)),
            "near" => Some(number(self.near)),
            "far" => Some(number(self.far)),
            "zoom" => Some(number(self.zoom)),
            _ => None,
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        match key {
            "fov" => set_f32(&mut self.fov, &value),
            "aspect" => set_f32(&mut self.aspect, &value),
            "near" => set_f32(&mut self.near, &value),
            "far" => set_f32(&mut self.far, &value),
            "zoom" => set_f32(&mut self.zoom, &value),
            _ => false,
        }
    }
}

impl Inspect for Node {
    fn child_mut(&mut self, key: &str) -> Option<&mut dyn Inspect> {
        match key {
            "position" => Some(&mut self.position),
            "rotation" => Some(&mut self.rotation),
            "scale" => Some(&mut self.scale),
            _ => match &mut self.kind {
                ObjectKind::Mesh(mesh) if key == "material" => Some(&mut mesh.materials),
                ObjectKind::Light(light) => light.child_mut(key),
                _ => None,
            },
        }
    }
    
    fn read(&self, key: &str) -> Option<Attr> {
        match key {
            "name" => Some(Attr::Text(self.name.clone())),
            "type" => Some(Attr::Text(self.kind.label().to_string())),
            "position" => Some(Attr::Composite(vec3_json(&self.position))),
            "scale" => Some(Attr::Composite(vec3_json(&self.scale))),
            "rotation" => Some(Attr::Composite(json!({
                "x": self.rotation.x,
                "y": self.rotation.y,
                "z": self.rotation.z,
            }))),
            "quaternion" => {
                let q = self.quaternion();
                Some(Attr::Composite(json!({ "x": q.i, "y": q.j, "z": q.k, "w": q.w })))
            }
            "visible" => Some(Attr::Bool(self.visible)),
            "castShadow" => Some(Attr::Bool(self.cast_shadow)),
            "receiveShadow" => Some(Attr::Bool(self.receive_shadow)),
            "frustumCulled" => Some(Attr::Bool(self.frustum_culled)),
            "renderOrder" => Some(Attr::Number(f64::from(self.render_order))),
            _ => match &self.kind {
                ObjectKind::Mesh(mesh) if key == "material" => Some(match &mesh.materials {
                    MaterialSet::Single(material) => Attr::Composite(material.summary()),
                    MaterialSet::PerFace(materials) => Attr::Composite(serde_json::Value::Array(
                        materials.iter().map(Material::summary).collect(),
                    )),
                }),
                ObjectKind::Light(light) => light.read(key),
                ObjectKind::Camera(camera) => camera.read(key),
                _ => None,
            },
        }
    }
    
    fn write(&mut self, key: &str, value: Attr) -> bool {
        match key {
            "name" => {
                self.name = value.as_text();
                true
            }
            "type" => false,
            "position" => set_vec3(&mut self.position, &value),
            "scale" => set_vec3(&mut self.scale, &value),
            "rotation" => {
                let r = &mut self.rotation;
                set_fields(&value, &mut [("x", &mut r.x), ("y", &mut r.y), ("z", &mut r.z)])
            }
            "quaternion" => {
                let current = self.quaternion();
                let (mut x, mut y, mut z, mut w) = (current.i, current.j, current.k, current.w);
                if !set_fields(&value, &mut [("x", &mut x), ("y", &mut y), ("z", &mut z), ("w", &mut w)]) {
                    return false;
                }
                let raw = nalgebra::Quaternion::new(w, x, y, z);
                if raw.norm() <= f32::EPSILON {
                    return false;
                }
                self.set_quaternion(&Quat::from_quaternion(raw));
                true
            }
            "visible" => set_bool(&mut self.visible, &value),
            "castShadow" => set_bool(&mut self.cast_shadow, &value),
            "receiveShadow" => set_bool(&mut self.receive_shadow, &value),
            "frustumCulled" => set_bool(&mut self.frustum_culled, &value),
            "renderOrder" => match value.as_f32() {
                Some(order) => {
                    self.render_order = order as i32;
                    true
                }
                None => false,
            },
            _ => match &mut self.kind {
                ObjectKind::Light(light) => light.write(key, value),
                ObjectKind::Camera(camera) => camera.write(key, value),
                _ => false,
            },
        }
    }
    
    fn color_mut(&mut self, key: &str) -> Option<&mut Color> {
        match &mut self.kind {
            ObjectKind::Light(light) => light.color_mut(key),
            _ => None,
        }
    }
}
