//! Wavefront MTL parsing
//!
//! Phong-style MTL entries are mapped onto the standard material: `Kd` is
//! the base color, `Ke` the emissive color, `d`/`Tr` the opacity and `Ns`
//! drives roughness. `map_Kd` and `map_Bump` become the color and normal
//! maps.

use std::collections::HashMap;

use crate::scene::{Color, Material, TextureSlot};

/// Highest specular exponent MTL files use
const MAX_SPECULAR_EXPONENT: f32 = 1000.0;

/// MTL text parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL text into materials keyed by name
    pub fn parse(contents: &str) -> Result<HashMap<String, Material>, String> {
        let mut materials = HashMap::new();
        let mut current: Option<Material> = None;
        
        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            
            let mut tokens = line.split_whitespace();
            let Some(command) = tokens.next() else { continue };
            
            if command == "newmtl" {
                if let Some(material) = current.take() {
                    materials.insert(material.name.clone(), material);
                }
                let name = tokens
                    .next()
                    .ok_or_else(|| format!("Line {}: newmtl missing material name", line_num + 1))?;
                let mut material = Material::standard(Color { r: 0.8, g: 0.8, b: 0.8 });
                material.name = name.to_string();
                current = Some(material);
                continue;
            }
            
            let Some(material) = current.as_mut() else { continue };
            match command {
                "Kd" => material.color = Self::parse_color(&mut tokens, line_num, command)?,
                "Ke" => material.emissive = Self::parse_color(&mut tokens, line_num, command)?,
                "Ns" => {
                    let exponent = Self::parse_f32(&mut tokens, line_num, command)?;
                    let shininess = (exponent / MAX_SPECULAR_EXPONENT).clamp(0.0, 1.0);
                    material.roughness = 1.0 - shininess.sqrt();
                }
                "d" => {
                    material.opacity = Self::parse_f32(&mut tokens, line_num, command)?;
                    material.transparent = material.opacity < 1.0;
                }
                "Tr" => {
                    material.opacity = 1.0 - Self::parse_f32(&mut tokens, line_num, command)?;
                    material.transparent = material.opacity < 1.0;
                }
                "map_Kd" => {
                    let path = Self::parse_texture_path(&mut tokens, line_num, command)?;
                    let color = material.color;
                    material.apply_texture(TextureSlot::Skin, &path);
                    // A diffuse map tints with Kd rather than replacing it
                    material.color = color;
                }
                "map_Bump" | "bump" | "norm" => {
                    let path = Self::parse_texture_path(&mut tokens, line_num, command)?;
                    material.apply_texture(TextureSlot::Bumps, &path);
                }
                _ => {}
            }
        }
        
        if let Some(material) = current {
            materials.insert(material.name.clone(), material);
        }
        Ok(materials)
    }
    
    fn parse_color<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<Color, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let r = Self::parse_f32(tokens, line_num, command)?;
        let g = Self::parse_f32(tokens, line_num, command)?;
        let b = Self::parse_f32(tokens, line_num, command)?;
        Ok(Color { r, g, b })
    }
    
    fn parse_f32<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<f32, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let token = tokens
            .next()
            .ok_or_else(|| format!("Line {}: {} missing value", line_num + 1, command))?;
        token
            .parse::<f32>()
            .map_err(|_| format!("Line {}: {} invalid float value '{}'", line_num + 1, command, token))
    }
    
    /// Texture paths may contain spaces; options before the path are not supported
    fn parse_texture_path<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<String, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let path: Vec<&str> = tokens.collect();
        if path.is_empty() {
            return Err(format!("Line {}: {} missing texture path", line_num + 1, command));
        }
        Ok(path.join(" "))
    }
}
