//! Rendering seam
//!
//! The session never draws itself. Once per tick it captures a [`Frame`]
//! from the scene graph and presents it on a [`RenderSurface`].

mod frame;
mod surface;

pub use frame::{CameraView, DrawItem, Drawable, Frame, SurfaceSettings};
pub use surface::{HeadlessSurface, RenderError, RenderResult, RenderSurface};
