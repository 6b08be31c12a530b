//! Per-frame driving: scroll input in, evaluated scene and pixels out.

pub mod script;
pub mod story;
