//! Filesystem-backed fetcher
//!
//! Resolves `file://` URLs and plain paths (relative ones against a base
//! directory). Loading happens inside `request`; results are handed out on
//! the next `poll`. Network URLs fail with [`AssetError::Unsupported`].

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{
    AssetCompletion, AssetError, AssetFetcher, AssetPayload, AssetRequest, ModelData, ModelPart, MtlParser,
    ObjLoader,
};
use crate::scene::{Color, Material, TextureMapping, TextureRef};

/// Fetcher reading from the local filesystem
#[derive(Debug, Default)]
pub struct LocalFileFetcher {
    base: PathBuf,
    ready: Vec<AssetCompletion>,
}

impl LocalFileFetcher {
    /// Resolve relative paths against `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into(), ready: Vec::new() }
    }
    
    /// Map a URL to a path
    pub fn resolve(&self, url: &str) -> Result<PathBuf, AssetError> {
        let path = match url.strip_prefix("file://") {
            Some(path) => path,
            None if url.contains("://") => return Err(AssetError::Unsupported(url.to_string())),
            None => url,
        };
        let path = Path::new(path);
        Ok(if path.is_absolute() { path.to_path_buf() } else { self.base.join(path) })
    }
    
    fn read(&self, url: &str) -> Result<String, AssetError> {
        let path = self.resolve(url)?;
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound(url.to_string())
            } else {
                AssetError::Io { path: path.display().to_string(), source }
            }
        })
    }
    
    /// Load an OBJ model with an optional MTL library
    pub fn load_model(&self, model_url: &str, material_url: Option<&str>) -> Result<ModelData, AssetError> {
        let materials = match material_url {
            Some(url) => MtlParser::parse(&self.read(url)?).map_err(AssetError::Mtl)?,
            None => HashMap::new(),
        };
        let model = ObjLoader::parse(&self.read(model_url)?)?;
        
        let parts = model
            .groups
            .into_iter()
            .map(|group| {
                let material = group
                    .material
                    .as_ref()
                    .and_then(|name| materials.get(name))
                    .cloned()
                    .unwrap_or_else(|| Material::standard(Color::WHITE));
                ModelPart { name: group.name, bounds: group.bounds, material }
            })
            .collect();
        
        Ok(ModelData { parts })
    }
    
    /// Check a texture exists and describe it as an equirectangular map
    pub fn load_texture(&self, url: &str) -> Result<TextureRef, AssetError> {
        let path = self.resolve(url)?;
        if !path.is_file() {
            return Err(AssetError::NotFound(url.to_string()));
        }
        Ok(TextureRef { url: url.to_string(), mapping: TextureMapping::EquirectangularReflection })
    }
}

impl AssetFetcher for LocalFileFetcher {
    fn request(&mut self, request: AssetRequest) {
        let result = match &request {
            AssetRequest::Model { model_url, material_url, .. } => {
                self.load_model(model_url, material_url.as_deref()).map(AssetPayload::Model)
            }
            AssetRequest::Skybox { url } => self.load_texture(url).map(AssetPayload::Texture),
        };
        self.ready.push(AssetCompletion { request, result });
    }
    
    fn poll(&mut self) -> Vec<AssetCompletion> {
        std::mem::take(&mut self.ready)
    }
    
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
