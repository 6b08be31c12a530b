//! Rasterization of the scene and background into RGBA frames.

pub mod blur;
pub mod composite;
pub mod cpu;
pub mod geometry;
pub mod text;

use crate::{
    field::MotionField,
    foundation::{
        core::{Rgba8, Viewport},
        error::ScrollreelResult,
    },
    scene::{builder::Palette, model::Scene},
};

#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Everything a backend reads to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub viewport: Viewport,
    pub scene: &'a Scene,
    pub field: &'a MotionField,
    pub palette: &'a Palette,
    pub clear: Rgba8,
}

pub trait RenderBackend {
    fn render(&mut self, view: &FrameView<'_>) -> ScrollreelResult<FrameRGBA>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Additive strength of the point-cloud bloom; 0 disables it.
    pub bloom_strength: f32,
    /// Bloom blur standard deviation in pixels.
    pub bloom_sigma: f64,
    /// Scale applied to each dash's glow radius before blurring.
    pub glow_scale: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            bloom_strength: 1.2,
            bloom_sigma: 6.0,
            glow_scale: 0.5,
        }
    }
}

pub fn create_backend(
    settings: RenderSettings,
    text: Option<text::TextEngine>,
) -> Box<dyn RenderBackend> {
    let backend = cpu::CpuBackend::new(settings);
    match text {
        Some(engine) => Box::new(backend.with_text(engine)),
        None => Box::new(backend),
    }
}
