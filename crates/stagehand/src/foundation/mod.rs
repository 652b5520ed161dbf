//! Foundation module
//!
//! Math types shared by the scene graph, physics and property layers, and
//! logger initialisation.

pub mod math;
pub mod logging;
