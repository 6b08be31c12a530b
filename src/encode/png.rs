use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::{FrameSink, ensure_parent_dir, flatten_to_opaque_rgba8},
    foundation::{
        core::Rgba8,
        error::{ScrollreelError, ScrollreelResult},
    },
    render::FrameRGBA,
};

/// Write one frame as an opaque PNG, flattening any transparency over `bg`.
pub fn write_png(frame: &FrameRGBA, path: &Path, bg: Rgba8) -> ScrollreelResult<()> {
    ensure_parent_dir(path)?;
    let mut rgba = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(&mut rgba, &frame.data, frame.premultiplied, bg)?;
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Numbered `frame_00000.png` files in one directory.
pub struct PngSequence {
    dir: PathBuf,
    bg: Rgba8,
    next: u32,
    finished: bool,
}

impl PngSequence {
    pub fn new(dir: impl Into<PathBuf>, bg: Rgba8) -> ScrollreelResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create frame directory '{}'", dir.display()))?;
        Ok(Self {
            dir,
            bg,
            next: 0,
            finished: false,
        })
    }

    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }

    pub fn frames_written(&self) -> u32 {
        self.next
    }
}

impl FrameSink for PngSequence {
    fn push(&mut self, frame: &FrameRGBA) -> ScrollreelResult<()> {
        if self.finished {
            return Err(ScrollreelError::evaluation("png sequence is already finalized"));
        }
        write_png(frame, &self.frame_path(self.next), self.bg)?;
        self.next += 1;
        Ok(())
    }

    fn finish(&mut self) -> ScrollreelResult<()> {
        self.finished = true;
        tracing::debug!(dir = %self.dir.display(), frames = self.next, "png sequence finished");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
