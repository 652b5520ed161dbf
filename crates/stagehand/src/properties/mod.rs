//! Dotted-path property access
//!
//! Commands address object attributes with paths such as `position.x`,
//! `material.color` or `material.2.opacity`. Raw string arguments are
//! decoded once into a [`Value`] and applied through the [`Inspect`]
//! attribute graph.
//!
//! Rotation paths are exchanged in degrees and stored in radians. Color
//! slots are assigned through the color's own setter. Anything that does
//! not resolve is a silent no-op.

mod value;
mod inspect;
mod accessor;

pub use value::{Attr, Reading, Value};
pub use inspect::Inspect;
pub use accessor::{PropertyAccessor, PropertyContext};
