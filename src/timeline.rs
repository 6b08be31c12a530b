//! Tweens, the bound timeline that evaluates them, and the authored story
//! phases.

pub mod phases;
#[allow(clippy::module_inception)]
pub mod timeline;
pub mod tween;
