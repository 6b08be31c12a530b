//! Frame sinks: MP4 through the system `ffmpeg`, or numbered PNG files.

pub mod ffmpeg;
pub mod png;

use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Rgba8,
        error::{ScrollreelError, ScrollreelResult},
    },
    render::FrameRGBA,
};

/// Consumes rendered frames in order.
pub trait FrameSink {
    fn push(&mut self, frame: &FrameRGBA) -> ScrollreelResult<()>;

    /// Flush and close. Frames pushed afterwards are an error.
    fn finish(&mut self) -> ScrollreelResult<()>;
}

pub fn ensure_parent_dir(path: &Path) -> ScrollreelResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Composite a frame over an opaque background, producing straight RGBA8
/// with alpha 255.
pub fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> ScrollreelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ScrollreelError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../tests/unit/encode/flatten.rs"]
mod tests;
