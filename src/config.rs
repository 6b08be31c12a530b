use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    field::{cloud::DEFAULT_CLOUD_POINTS, dashes::DEFAULT_DASH_COUNT},
    foundation::{
        core::{Rgba8, Viewport},
        error::{ScrollreelError, ScrollreelResult},
    },
    scene::builder::{Palette, Variant},
    scroll::normalizer::Smoothing,
};

/// Everything needed to build and drive a [`crate::Story`]. Every field has a
/// default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoryConfig {
    /// Output surface in pixels.
    pub viewport: Viewport,
    /// Height of the scrollable document in pixels. The scroll range is
    /// `document_height - viewport.height`.
    pub document_height: f64,
    pub variant: Variant,
    /// Seed for particle placement and random tween values.
    pub seed: u64,
    pub dash_count: usize,
    pub cloud_points: usize,
    pub smoothing: Smoothing,
    /// Smooth touch positions instead of applying them directly.
    pub smooth_touch: bool,
    /// Seconds the timeline playhead lags behind scroll; 0 follows exactly.
    pub scrub_secs: f64,
    pub palette: Palette,
    pub clear_rgba: Rgba8,
    /// Font for text nodes. Relative paths in a config file resolve against
    /// the file's directory. Text is skipped when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width: 1280,
                height: 800,
            },
            document_height: 8000.0,
            variant: Variant::Flat,
            seed: 1,
            dash_count: DEFAULT_DASH_COUNT,
            cloud_points: DEFAULT_CLOUD_POINTS,
            smoothing: Smoothing::default(),
            smooth_touch: false,
            scrub_secs: 0.5,
            palette: Palette::default(),
            clear_rgba: Rgba8 {
                r: 4,
                g: 8,
                b: 18,
                a: 255,
            },
            font_path: None,
        }
    }
}

impl StoryConfig {
    pub fn validate(&self) -> ScrollreelResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)?;
        if !self.document_height.is_finite() {
            return Err(ScrollreelError::validation("document_height must be finite"));
        }
        if self.document_height < f64::from(self.viewport.height) {
            return Err(ScrollreelError::validation(
                "document_height must be >= viewport height",
            ));
        }
        self.smoothing.validate()?;
        if !self.scrub_secs.is_finite() || self.scrub_secs < 0.0 {
            return Err(ScrollreelError::validation(
                "scrub_secs must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Scroll distance available to the story.
    pub fn scroll_limit(&self) -> f64 {
        (self.document_height - f64::from(self.viewport.height)).max(0.0)
    }

    pub fn from_json_str(s: &str) -> ScrollreelResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> ScrollreelResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&s)?;
        if let Some(font) = cfg.font_path.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            cfg.font_path = Some(base.join(font));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
