//! Dotted-path property access
//!
//! `resolve` walks every segment but the last through containers and
//! returns the owning container plus the final key. `get`, `set` and
//! `change` all go through it, so an unresolved path behaves the same
//! way for each: reads are empty and writes do nothing.

use super::inspect::Inspect;
use super::value::{Attr, Reading, Value};
use crate::scene::{ObjectRegistry, SceneGraph};

/// Paths naming a rotation are exchanged in degrees
fn is_rotation_path(path: &str) -> bool {
    path.contains("rotation")
}

/// Apply `f` to every number in a composite, recursively
fn map_numbers(value: serde_json::Value, f: &impl Fn(f64) -> f64) -> serde_json::Value {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .and_then(|v| serde_json::Number::from_f64(f(v)))
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter().map(|(k, v)| (k, map_numbers(v, f))).collect(),
        ),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(|v| map_numbers(v, f)).collect())
        }
        other => other,
    }
}

/// A resolved container and the attribute key inside it
pub struct PropertyContext<'a> {
    target: &'a mut dyn Inspect,
    key: String,
    rotation: bool,
}

impl PropertyContext<'_> {
    /// Final path segment
    pub fn key(&self) -> &str {
        &self.key
    }
    
    /// Whether values at this path are exchanged in degrees
    pub fn is_rotation(&self) -> bool {
        self.rotation
    }
    
    /// Raw (internal unit) value
    pub fn read(&self) -> Option<Attr> {
        self.target.read(&self.key)
    }
    
    /// Assign a raw (internal unit) value. Color slots go through the
    /// color's setter instead of being replaced.
    pub fn write(&mut self, value: Attr) -> bool {
        if let Some(color) = self.target.color_mut(&self.key) {
            return color.assign(&value);
        }
        self.target.write(&self.key, value)
    }
    
    /// Add a raw (internal unit) amount to a numeric value
    pub fn add(&mut self, delta: f64) -> bool {
        self.target.add(&self.key, delta)
    }
}

/// Property access over one session's graph and registry
pub struct PropertyAccessor<'s> {
    graph: &'s mut SceneGraph,
    registry: &'s ObjectRegistry,
}

impl<'s> PropertyAccessor<'s> {
    /// Borrow a graph and the registry naming its objects
    pub fn new(graph: &'s mut SceneGraph, registry: &'s ObjectRegistry) -> Self {
        Self { graph, registry }
    }
    
    /// Walk `path` from the object registered as `id`
    pub fn resolve(&mut self, id: &str, path: &str) -> Option<PropertyContext<'_>> {
        let key = self.registry.resolve(id)?;
        let node = self.graph.get_mut(key)?;
        
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = segments.pop()?;
        
        let mut current: &mut dyn Inspect = node;
        for segment in segments {
            current = current.child_mut(segment)?;
        }
        
        Some(PropertyContext {
            target: current,
            key: last.to_string(),
            rotation: is_rotation_path(path),
        })
    }
    
    /// Read a property in external units
    pub fn get(&mut self, id: &str, path: &str) -> Reading {
        let Some(context) = self.resolve(id, path) else {
            return Reading::Empty;
        };
        let rotation = context.is_rotation();
        
        match context.read() {
            None => Reading::Empty,
            Some(Attr::Number(n)) if rotation => Reading::Number(n.to_degrees()),
            Some(Attr::Number(n)) => Reading::Number(n),
            Some(Attr::Bool(b)) => Reading::Bool(b),
            Some(Attr::Text(s) | Attr::Object(s)) => Reading::Text(s),
            Some(Attr::Color(c)) => Reading::Text(format!("#{}", c.hex_string())),
            Some(Attr::Composite(v)) if rotation => {
                Reading::Text(map_numbers(v, &f64::to_degrees).to_string())
            }
            Some(Attr::Composite(v)) => Reading::Text(v.to_string()),
        }
    }
    
    /// Assign a property from a raw command argument
    pub fn set(&mut self, id: &str, path: &str, raw: &str) {
        let attr = match Value::decode(raw) {
            Value::Reference(target) => {
                let alive = self.registry.resolve(&target).is_some_and(|k| self.graph.contains(k));
                if !alive {
                    log::debug!("set {}.{}: unknown reference '@{}'", id, path, target);
                    return;
                }
                Attr::Object(target)
            }
            Value::Integer(i) => Attr::Number(i as f64),
            Value::Structured(json) => Attr::from(json),
            Value::Text(text) => Attr::Text(text),
        };
        
        let attr = if is_rotation_path(path) {
            match attr {
                Attr::Number(n) => Attr::Number(n.to_radians()),
                Attr::Composite(v) => Attr::Composite(map_numbers(v, &f64::to_radians)),
                _ => return,
            }
        } else {
            attr
        };
        
        match self.resolve(id, path) {
            Some(mut context) => {
                if !context.write(attr) {
                    log::trace!("set {}.{}: attribute not written", id, path);
                }
            }
            None => log::trace!("set {}.{}: unresolved", id, path),
        }
    }
    
    /// Add `delta` (external units) to a numeric property
    pub fn change(&mut self, id: &str, path: &str, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let Some(mut context) = self.resolve(id, path) else {
            return;
        };
        let delta = if context.is_rotation() { delta.to_radians() } else { delta };
        
        if !context.add(delta) {
            log::trace!("change {}.{}: not a number", id, path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Color, Geometry, Light, LightKind, Material, MaterialSet, Mesh, Node, ObjectKind, ShapeKind};
    use approx::assert_relative_eq;
    
    const EPSILON: f64 = 1e-4;
    
    fn fixture() -> (SceneGraph, ObjectRegistry) {
        let mut graph = SceneGraph::new();
        let mut registry = ObjectRegistry::new();
        
        let cube = graph.insert(Node::new(ObjectKind::Mesh(Mesh {
            geometry: Geometry::primitive(ShapeKind::Box),
            materials: MaterialSet::uniform(Material::standard(Color::from_hex(0xff0000)), 6),
        })));
        registry.register("cube1", cube);
        
        let ball = graph.insert(Node::new(ObjectKind::Mesh(Mesh {
            geometry: Geometry::primitive(ShapeKind::Sphere),
            materials: MaterialSet::uniform(Material::standard(Color::WHITE), 1),
        })));
        registry.register("ball", ball);
        
        let light = graph.insert(Node::new(ObjectKind::Light(Light::new(
            LightKind::Spot,
            Color::WHITE,
            1.0,
        ))));
        registry.register("spot", light);
        
        (graph, registry)
    }
    
    #[test]
    fn test_rotation_in_degrees() {
        let (mut graph, registry) = fixture();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        accessor.set("cube1", "rotation.y", "90");
        let stored = accessor
            .resolve("cube1", "rotation.y")
            .and_then(|context| context.read())
            .and_then(|attr| attr.as_f32())
            .unwrap();
        assert_relative_eq!(stored, std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
        
        let degrees = accessor.get("cube1", "rotation.y").as_number().unwrap();
        assert_relative_eq!(degrees, 90.0, epsilon = EPSILON);
        
        accessor.change("cube1", "rotation.y", 45.0);
        let degrees = accessor.get("cube1", "rotation.y").as_number().unwrap();
        assert_relative_eq!(degrees, 135.0, epsilon = EPSILON);
    }
    
    #[test]
    fn test_set_get_change_position() {
        let (mut graph, registry) = fixture();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        accessor.set("cube1", "position.x", "2.5");
        accessor.change("cube1", "position.x", 1.0);
        assert_relative_eq!(accessor.get("cube1", "position.x").as_number().unwrap(), 3.5, epsilon = EPSILON);
        
        accessor.set("cube1", "position", "{\"y\": -1}");
        assert_relative_eq!(accessor.get("cube1", "position.y").as_number().unwrap(), -1.0, epsilon = EPSILON);
        assert_relative_eq!(accessor.get("cube1", "position.x").as_number().unwrap(), 3.5, epsilon = EPSILON);
    }
    
    #[test]
    fn test_unresolved_paths_are_silent() {
        let (mut graph, registry) = fixture();
        let before = graph.len();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        assert_eq!(accessor.get("nope", "position.x"), Reading::Empty);
        assert_eq!(accessor.get("cube1", "position.w"), Reading::Empty);
        assert_eq!(accessor.get("cube1", "foo.bar.baz"), Reading::Empty);
        
        accessor.set("nope", "position.x", "1");
        accessor.set("cube1", "foo.bar", "1");
        accessor.set("cube1", "position.w", "1");
        accessor.change("cube1", "visible", 1.0);
        accessor.change("cube1", "position.x", f64::NAN);
        
        assert_eq!(accessor.get("cube1", "position.x"), Reading::Number(0.0));
        assert_eq!(accessor.get("cube1", "visible"), Reading::Bool(true));
        assert_eq!(graph.len(), before);
    }
    
    #[test]
    fn test_color_through_setter() {
        let (mut graph, registry) = fixture();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        accessor.set("ball", "material.color", "#00ff00");
        assert_eq!(accessor.get("ball", "material.color"), Reading::Text("#00ff00".into()));
        
        accessor.set("ball", "material.color", "\"blue\"");
        assert_eq!(accessor.get("ball", "material.color"), Reading::Text("#0000ff".into()));
        
        accessor.set("spot", "color", "#123456");
        assert_eq!(accessor.get("spot", "color"), Reading::Text("#123456".into()));
        
        accessor.set("ball", "material.color.r", "0");
        assert_eq!(accessor.get("ball", "material.color"), Reading::Text("#0000ff".into()));
    }
    
    #[test]
    fn test_per_face_materials() {
        let (mut graph, registry) = fixture();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        assert_eq!(accessor.get("cube1", "material.length"), Reading::Number(6.0));
        
        accessor.set("cube1", "material.2.opacity", "0.5");
        assert_relative_eq!(accessor.get("cube1", "material.2.opacity").as_number().unwrap(), 0.5, epsilon = EPSILON);
        assert_relative_eq!(accessor.get("cube1", "material.0.opacity").as_number().unwrap(), 1.0, epsilon = EPSILON);
        
        accessor.set("cube1", "material.color", "#0000ff");
        assert_eq!(accessor.get("cube1", "material.5.color"), Reading::Text("#0000ff".into()));
    }
    
    #[test]
    fn test_change_fans_out_per_face() {
        fn opacity(accessor: &mut PropertyAccessor<'_>, face: usize) -> f64 {
            accessor.get("cube1", &format!("material.{}.opacity", face)).as_number().unwrap()
        }
        
        let (mut graph, registry) = fixture();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        accessor.set("cube1", "material.2.opacity", "0.5");
        accessor.change("cube1", "material.opacity", -0.1);
        
        assert_relative_eq!(opacity(&mut accessor, 2), 0.4, epsilon = EPSILON);
        assert_relative_eq!(opacity(&mut accessor, 0), 0.9, epsilon = EPSILON);
        assert_relative_eq!(opacity(&mut accessor, 5), 0.9, epsilon = EPSILON);
        
        // Non-numeric keys are left alone
        accessor.change("cube1", "material.color", 1.0);
        assert_eq!(accessor.get("cube1", "material.0.color"), Reading::Text("#ff0000".into()));
    }
    
    #[test]
    fn test_reference_values() {
        let (mut graph, registry) = fixture();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        accessor.set("spot", "target", "@cube1");
        assert_eq!(accessor.get("spot", "target"), Reading::Text("cube1".into()));
        
        accessor.set("spot", "target", "@missing");
        assert_eq!(accessor.get("spot", "target"), Reading::Text("cube1".into()));
    }
    
    #[test]
    fn test_flags_and_composites() {
        let (mut graph, registry) = fixture();
        let mut accessor = PropertyAccessor::new(&mut graph, &registry);
        
        accessor.set("cube1", "visible", "false");
        assert_eq!(accessor.get("cube1", "visible"), Reading::Bool(false));
        
        accessor.set("cube1", "scale", "{\"x\":2,\"y\":2,\"z\":2}");
        let scale = accessor.get("cube1", "scale").to_string();
        let parsed: serde_json::Value = serde_json::from_str(&scale).unwrap();
        assert_eq!(parsed["x"].as_f64(), Some(2.0));
        
        accessor.set("cube1", "rotation", "{\"x\":0,\"y\":180,\"z\":0}");
        let rotation: serde_json::Value =
            serde_json::from_str(&accessor.get("cube1", "rotation").to_string()).unwrap();
        assert_relative_eq!(rotation["y"].as_f64().unwrap(), 180.0, epsilon = 1e-3);
        
        accessor.set("cube1", "quaternion", "{\"x\":0,\"y\":0,\"z\":0,\"w\":1}");
        assert_relative_eq!(accessor.get("cube1", "rotation.y").as_number().unwrap(), 0.0, epsilon = EPSILON);
    }
}
