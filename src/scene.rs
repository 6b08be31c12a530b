//! The retained scene graph and the procedural builder for the story's
//! primitives.

pub mod builder;
pub mod grid;
pub mod model;
