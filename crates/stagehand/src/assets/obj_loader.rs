//! Wavefront OBJ parsing
//!
//! Models are placed in the scene as one mesh per `o`/`g` group, so the
//! parser keeps only what that needs: group names, the material each
//! group asks for, face counts and bounds.

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::scene::AABB;

/// OBJ parse errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// Malformed number or index
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line
        line: usize,
        /// What went wrong
        message: String,
    },
    /// Structurally valid text with nothing to show
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// One `o`/`g` group
#[derive(Debug, Clone, PartialEq)]
pub struct ObjGroup {
    /// Group name, empty for faces before any `o`/`g`
    pub name: String,
    /// Material named by `usemtl`
    pub material: Option<String>,
    /// Triangles after fan triangulation
    pub triangle_count: usize,
    /// Bounds of the vertices the faces reference
    pub bounds: AABB,
}

impl ObjGroup {
    fn named(name: &str, material: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            material,
            triangle_count: 0,
            bounds: AABB::empty(),
        }
    }
}

/// Parsed OBJ file
#[derive(Debug, Clone, PartialEq)]
pub struct ObjModel {
    /// Material libraries named by `mtllib`
    pub material_libraries: Vec<String>,
    /// Groups with at least one face, in file order
    pub groups: Vec<ObjGroup>,
}

/// OBJ text parser
pub struct ObjLoader;

impl ObjLoader {
    /// Parse OBJ text
    pub fn parse(contents: &str) -> Result<ObjModel, ObjError> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut libraries = Vec::new();
        let mut groups: Vec<ObjGroup> = Vec::new();
        let mut current = ObjGroup::named("", None);
        
        for (index, line) in contents.lines().enumerate() {
            let line_num = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            
            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    if parts.len() < 4 {
                        return Err(Self::error(line_num, "vertex needs three coordinates"));
                    }
                    let x = Self::parse_f32(parts[1], line_num)?;
                    let y = Self::parse_f32(parts[2], line_num)?;
                    let z = Self::parse_f32(parts[3], line_num)?;
                    positions.push(Vec3::new(x, y, z));
                }
                "o" | "g" => {
                    let name = parts[1..].join(" ");
                    let material = current.material.clone();
                    let previous = std::mem::replace(&mut current, ObjGroup::named(&name, material));
                    Self::finish(previous, &mut groups);
                }
                "usemtl" => {
                    let material = Some(parts[1..].join(" "));
                    if current.triangle_count == 0 {
                        current.material = material;
                    } else {
                        let name = current.name.clone();
                        let previous = std::mem::replace(&mut current, ObjGroup::named(&name, material));
                        Self::finish(previous, &mut groups);
                    }
                }
                "mtllib" => libraries.push(parts[1..].join(" ")),
                "f" => {
                    if parts.len() < 4 {
                        return Err(Self::error(line_num, "face needs at least three vertices"));
                    }
                    for vertex in &parts[1..] {
                        let position = Self::resolve_index(vertex, positions.len(), line_num)?;
                        current.bounds.expand_by_point(positions[position]);
                    }
                    current.triangle_count += parts.len() - 3;
                }
                // Normals, texture coordinates, smoothing groups and the rest
                // do not affect placement
                _ => {}
            }
        }
        Self::finish(current, &mut groups);
        
        if groups.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }
        
        Ok(ObjModel { material_libraries: libraries, groups })
    }
    
    fn finish(group: ObjGroup, groups: &mut Vec<ObjGroup>) {
        if group.triangle_count > 0 {
            groups.push(group);
        }
    }
    
    /// Position index of a `v/vt/vn` triple; OBJ indices are 1-based and
    /// negative values count back from the last vertex
    fn resolve_index(vertex: &str, count: usize, line_num: usize) -> Result<usize, ObjError> {
        let raw = vertex.split('/').next().unwrap_or_default();
        let index: i64 = raw
            .parse()
            .map_err(|_| Self::error(line_num, &format!("invalid position index '{}'", raw)))?;
        
        let resolved = match index {
            i if i > 0 => i - 1,
            i if i < 0 => count as i64 + i,
            _ => -1,
        };
        usize::try_from(resolved)
            .ok()
            .filter(|i| *i < count)
            .ok_or_else(|| Self::error(line_num, &format!("position index {} out of bounds", index)))
    }
    
    fn parse_f32(token: &str, line_num: usize) -> Result<f32, ObjError> {
        token
            .parse()
            .map_err(|_| Self::error(line_num, &format!("invalid float '{}'", token)))
    }
    
    fn error(line: usize, message: &str) -> ObjError {
        ObjError::ParseError { line, message: message.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    const TWO_GROUPS: &str = r#"
mtllib ship.mtl
o Hull
v 0 0 0
v 2 0 0
v 2 1 0
v 0 1 0
usemtl Steel
f 1 2 3 4
o Mast
v 1 1 0
v 1 3 0
v 1.5 3 0
usemtl Wood
f 5/1/1 6/2/1 7/3/1
"#;
    
    #[test]
    fn test_parse_groups_and_bounds() {
        let model = ObjLoader::parse(TWO_GROUPS).unwrap();
        assert_eq!(model.material_libraries, vec!["ship.mtl".to_string()]);
        assert_eq!(model.groups.len(), 2);
        
        let hull = &model.groups[0];
        assert_eq!(hull.name, "Hull");
        assert_eq!(hull.material.as_deref(), Some("Steel"));
        assert_eq!(hull.triangle_count, 2);
        assert_relative_eq!(hull.bounds.max, Vec3::new(2.0, 1.0, 0.0));
        
        let mast = &model.groups[1];
        assert_eq!(mast.material.as_deref(), Some("Wood"));
        assert_relative_eq!(mast.bounds.min, Vec3::new(1.0, 1.0, 0.0));
    }
    
    #[test]
    fn test_negative_indices() {
        let model = ObjLoader::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(model.groups.len(), 1);
        assert_eq!(model.groups[0].name, "");
    }
    
    #[test]
    fn test_errors() {
        assert!(matches!(ObjLoader::parse("v 0 0 0\n"), Err(ObjError::InvalidFormat(_))));
        assert!(matches!(
            ObjLoader::parse("v 0 0 0\nf 1 2 3\n"),
            Err(ObjError::ParseError { line: 2, .. })
        ));
        assert!(matches!(ObjLoader::parse("v 0 x 0\n"), Err(ObjError::ParseError { line: 1, .. })));
    }
}
