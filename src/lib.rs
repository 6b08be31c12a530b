#![forbid(unsafe_code)]
//! Scroll-synchronized narrative animation.
//!
//! A [`Story`] owns a procedurally built scene, a scrubbable tween timeline
//! bound to it, a smoothed scroll position and a decorative background field.
//! Each frame maps scroll progress to timeline time, evaluates the timeline
//! into the scene and rasterizes the result on the CPU.

pub mod animation;
pub mod config;
pub mod driver;
pub mod encode;
pub mod field;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod timeline;

pub use animation::ease::Ease;
pub use config::StoryConfig;
pub use driver::{
    script::{RunStats, ScrollScript, run_script},
    story::{FrameUpdate, Story},
};
pub use encode::{FrameSink, ffmpeg::FfmpegEncoder, png::PngSequence};
pub use field::MotionField;
pub use foundation::{
    core::{Rgba8, Viewport},
    error::{ScrollreelError, ScrollreelResult},
};
pub use render::{FrameRGBA, RenderBackend, RenderSettings, cpu::CpuBackend, text::TextEngine};
pub use scene::{
    builder::{Palette, Stage, Variant},
    model::{Attr, NodeId, Scene},
};
pub use scroll::normalizer::{ScrollInput, Smoothing};
pub use timeline::timeline::{BoundTimeline, Phase, Timeline};
