//! Deferred asset fetching
//!
//! Models and skybox textures arrive asynchronously: the session files an
//! [`AssetRequest`] with an [`AssetFetcher`] and applies whatever
//! completions `poll` returns on a later `pump_assets`. Completions may
//! arrive in any order relative to other commands.

mod obj_loader;
mod mtl_parser;
mod local;

use std::any::Any;
use std::collections::VecDeque;

use thiserror::Error;

use crate::scene::{Material, TextureRef, AABB};

pub use obj_loader::{ObjError, ObjGroup, ObjLoader, ObjModel};
pub use mtl_parser::MtlParser;
pub use local::LocalFileFetcher;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Reading the file failed
    #[error("IO error reading '{path}': {source}")]
    Io {
        /// Resolved path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    
    /// Model text could not be parsed
    #[error("Model parse error: {0}")]
    Obj(#[from] ObjError),
    
    /// Material text could not be parsed
    #[error("Material parse error: {0}")]
    Mtl(String),
    
    /// The fetcher cannot reach this kind of URL
    #[error("Unsupported URL: {0}")]
    Unsupported(String),
    
    /// Nothing at the URL
    #[error("Asset not found: {0}")]
    NotFound(String),
}

/// Something the session wants fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRequest {
    /// OBJ model, optionally with an MTL library, to register as `id`
    Model {
        /// Id to register the model under
        id: String,
        /// OBJ URL
        model_url: String,
        /// MTL URL
        material_url: Option<String>,
    },
    /// Equirectangular background/environment texture
    Skybox {
        /// Image URL
        url: String,
    },
}

impl AssetRequest {
    /// Primary URL of the request
    pub fn url(&self) -> &str {
        match self {
            Self::Model { model_url, .. } => model_url,
            Self::Skybox { url } => url,
        }
    }
}

/// One mesh of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPart {
    /// Group name from the model file
    pub name: String,
    /// Local-space bounds
    pub bounds: AABB,
    /// Resolved material
    pub material: Material,
}

/// A loaded model, one part per group
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    /// Parts in file order
    pub parts: Vec<ModelPart>,
}

/// Successful fetch result
#[derive(Debug, Clone, PartialEq)]
pub enum AssetPayload {
    /// Model geometry and materials
    Model(ModelData),
    /// Texture reference
    Texture(TextureRef),
}

/// A finished request
#[derive(Debug)]
pub struct AssetCompletion {
    /// What was asked for
    pub request: AssetRequest,
    /// What came back
    pub result: Result<AssetPayload, AssetError>,
}

/// Source of deferred assets
pub trait AssetFetcher {
    /// Start fetching
    fn request(&mut self, request: AssetRequest);
    
    /// Completions since the last poll
    fn poll(&mut self) -> Vec<AssetCompletion>;
    
    /// Downcast to the concrete fetcher
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Fetcher that completes requests only when told to
#[derive(Debug, Default)]
pub struct QueuedFetcher {
    pending: Vec<AssetRequest>,
    ready: VecDeque<AssetCompletion>,
}

impl QueuedFetcher {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Requests not yet completed, oldest first
    pub fn pending(&self) -> &[AssetRequest] {
        &self.pending
    }
    
    /// Complete the oldest pending request for `url`
    pub fn complete(&mut self, url: &str, result: Result<AssetPayload, AssetError>) -> bool {
        let Some(index) = self.pending.iter().position(|r| r.url() == url) else {
            return false;
        };
        let request = self.pending.remove(index);
        self.ready.push_back(AssetCompletion { request, result });
        true
    }
}

impl AssetFetcher for QueuedFetcher {
    fn request(&mut self, request: AssetRequest) {
        self.pending.push(request);
    }
    
    fn poll(&mut self) -> Vec<AssetCompletion> {
        self.ready.drain(..).collect()
    }
    
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TextureMapping;
    
    #[test]
    fn test_queued_out_of_order() {
        let mut fetcher = QueuedFetcher::new();
        fetcher.request(AssetRequest::Skybox { url: "a.jpg".into() });
        fetcher.request(AssetRequest::Model { id: "m".into(), model_url: "m.obj".into(), material_url: None });
        assert!(fetcher.poll().is_empty());
        
        assert!(fetcher.complete("m.obj", Err(AssetError::NotFound("m.obj".into()))));
        assert!(!fetcher.complete("m.obj", Err(AssetError::NotFound("m.obj".into()))));
        let texture = TextureRef { url: "a.jpg".into(), mapping: TextureMapping::EquirectangularReflection };
        assert!(fetcher.complete("a.jpg", Ok(AssetPayload::Texture(texture))));
        
        let done = fetcher.poll();
        assert_eq!(done.len(), 2);
        assert_eq!(done[0].request.url(), "m.obj");
        assert!(done[1].result.is_ok());
        assert!(fetcher.pending().is_empty());
    }
}
