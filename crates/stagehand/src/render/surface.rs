//! Render surface abstraction
//!
//! The session draws by handing a [`Frame`] to whatever implements
//! [`RenderSurface`]. [`HeadlessSurface`] keeps recent frames in memory.

use std::any::Any;
use std::collections::VecDeque;

use thiserror::Error;

use super::frame::{Frame, SurfaceSettings};

/// Frames a headless surface keeps by default
const DEFAULT_HISTORY: usize = 64;

/// Errors raised while presenting
#[derive(Error, Debug)]
pub enum RenderError {
    /// `present` called before `configure`
    #[error("Surface has not been configured")]
    NotConfigured,
    
    /// The surface could not show the frame
    #[error("Presentation failed: {0}")]
    PresentFailed(String),
}

/// Result type for surface operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Something frames can be drawn onto
pub trait RenderSurface {
    /// Apply size, transparency and clear color
    fn configure(&mut self, settings: &SurfaceSettings);
    
    /// Current size in pixels
    fn size(&self) -> (u32, u32);
    
    /// Draw one frame
    fn present(&mut self, frame: Frame) -> RenderResult<()>;
    
    /// Downcast to the concrete surface
    fn as_any(&self) -> &dyn Any;
}

/// In-memory surface that records what it was asked to draw
#[derive(Debug)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    settings: Option<SurfaceSettings>,
    frames: VecDeque<Frame>,
    history: usize,
    presented: u64,
}

impl HeadlessSurface {
    /// Surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            settings: None,
            frames: VecDeque::new(),
            history: DEFAULT_HISTORY,
            presented: 0,
        }
    }
    
    /// Keep at most `history` frames (at least one)
    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history.max(1);
        self
    }
    
    /// Settings from the last `configure`
    pub fn settings(&self) -> Option<&SurfaceSettings> {
        self.settings.as_ref()
    }
    
    /// Retained frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
    
    /// Most recent frame
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.back()
    }
    
    /// Total frames presented, retained or not
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl RenderSurface for HeadlessSurface {
    fn configure(&mut self, settings: &SurfaceSettings) {
        self.width = settings.width;
        self.height = settings.height;
        self.settings = Some(*settings);
    }
    
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    
    fn present(&mut self, frame: Frame) -> RenderResult<()> {
        if self.settings.is_none() {
            return Err(RenderError::NotConfigured);
        }
        if self.frames.len() == self.history {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
        self.presented += 1;
        Ok(())
    }
    
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use crate::render::frame::CameraView;
    use crate::scene::{Background, Color};
    
    fn empty_frame(sequence: u64) -> Frame {
        Frame {
            sequence,
            camera: CameraView { world: Mat4::identity(), fov: 75.0, aspect: 1.0, near: 0.1, far: 100.0 },
            background: Background::Transparent,
            drawables: Vec::new(),
        }
    }
    
    fn settings() -> SurfaceSettings {
        SurfaceSettings { width: 320, height: 240, transparent: true, clear_color: Color::WHITE }
    }
    
    #[test]
    fn test_present_requires_configure() {
        let mut surface = HeadlessSurface::new(10, 10);
        assert!(matches!(surface.present(empty_frame(0)), Err(RenderError::NotConfigured)));
        
        surface.configure(&settings());
        assert_eq!(surface.size(), (320, 240));
        assert!(surface.present(empty_frame(1)).is_ok());
        assert_eq!(surface.presented(), 1);
    }
    
    #[test]
    fn test_history_is_bounded() {
        let mut surface = HeadlessSurface::new(10, 10).with_history(2);
        surface.configure(&settings());
        for i in 0..5 {
            surface.present(empty_frame(i)).unwrap();
        }
        let kept: Vec<u64> = surface.frames().map(|f| f.sequence).collect();
        assert_eq!(kept, vec![3, 4]);
        assert_eq!(surface.presented(), 5);
        assert!(surface.as_any().downcast_ref::<HeadlessSurface>().is_some());
    }
}
