use std::{
    ffi::OsString,
    io::Write as _,
    path::PathBuf,
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    encode::{FrameSink, ensure_parent_dir, flatten_to_opaque_rgba8},
    foundation::{
        core::{Rgba8, Viewport},
        error::{ScrollreelError, ScrollreelResult},
    },
    render::FrameRGBA,
};

/// Output of an MP4 run: one story viewport at a fixed frame rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Mp4Target {
    pub out_path: PathBuf,
    pub viewport: Viewport,
    pub fps: u32,
}

impl Mp4Target {
    pub fn new(out_path: impl Into<PathBuf>, viewport: Viewport, fps: u32) -> ScrollreelResult<Self> {
        Viewport::new(viewport.width, viewport.height)?;
        if fps == 0 {
            return Err(ScrollreelError::validation("encode fps must be non-zero"));
        }
        // yuv420p subsamples chroma 2x2
        if !viewport.width.is_multiple_of(2) || !viewport.height.is_multiple_of(2) {
            return Err(ScrollreelError::validation(format!(
                "mp4 output needs an even viewport, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        Ok(Self {
            out_path: out_path.into(),
            viewport,
            fps,
        })
    }

    /// Arguments for an `ffmpeg` reading raw RGBA from stdin. Existing output
    /// is replaced.
    pub fn ffmpeg_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .map(OsString::from)
        .to_vec();
        args.push(format!("{}x{}", self.viewport.width, self.viewport.height).into());
        args.push("-r".into());
        args.push(self.fps.to_string().into());
        args.extend(
            [
                "-i",
                "pipe:0",
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ]
            .map(OsString::from),
        );
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Pipes raw RGBA frames into a system `ffmpeg` producing H.264 MP4.
pub struct FfmpegEncoder {
    target: Mp4Target,
    bg: Rgba8,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
    frames: u64,
}

impl FfmpegEncoder {
    pub fn new(target: Mp4Target, bg: Rgba8) -> ScrollreelResult<Self> {
        ensure_parent_dir(&target.out_path)?;
        if !is_ffmpeg_on_path() {
            return Err(ScrollreelError::evaluation(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(target.ffmpeg_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScrollreelError::evaluation(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ScrollreelError::evaluation("failed to open ffmpeg stdin"))?;
        tracing::debug!(out = %target.out_path.display(), fps = target.fps, "ffmpeg started");

        let Viewport { width, height } = target.viewport;
        Ok(Self {
            scratch: vec![0u8; width as usize * height as usize * 4],
            target,
            bg,
            child: Some(child),
            stdin: Some(stdin),
            frames: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for FfmpegEncoder {
    fn push(&mut self, frame: &FrameRGBA) -> ScrollreelResult<()> {
        let vp = self.target.viewport;
        if (frame.width, frame.height) != (vp.width, vp.height) {
            return Err(ScrollreelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, vp.width, vp.height
            )));
        }
        flatten_to_opaque_rgba8(&mut self.scratch, &frame.data, frame.premultiplied, self.bg)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ScrollreelError::evaluation(
                "ffmpeg encoder is already finalized",
            ));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            ScrollreelError::evaluation(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> ScrollreelResult<()> {
        drop(self.stdin.take());
        let Some(child) = self.child.take() else {
            return Ok(());
        };
        let output = child.wait_with_output().map_err(|e| {
            ScrollreelError::evaluation(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScrollreelError::evaluation(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        tracing::debug!(frames = self.frames, "ffmpeg finished");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
