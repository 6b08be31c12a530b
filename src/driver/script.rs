use crate::{
    driver::story::Story,
    encode::FrameSink,
    foundation::error::{ScrollreelError, ScrollreelResult},
    render::RenderBackend,
    scroll::normalizer::ScrollInput,
};

/// Scroll input for a run of frames: `frames[i]` is delivered before frame
/// `i` is stepped.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ScrollScript {
    frames: Vec<Vec<ScrollInput>>,
}

impl ScrollScript {
    /// `frames` frames without input.
    pub fn idle(frames: usize) -> Self {
        Self {
            frames: vec![Vec::new(); frames],
        }
    }

    /// Scroll `distance` pixels in equal wheel steps, one per frame.
    pub fn sweep(distance: f64, frames: usize) -> Self {
        if frames == 0 {
            return Self::default();
        }
        let step = distance / frames as f64;
        Self {
            frames: vec![vec![ScrollInput::Wheel(step)]; frames],
        }
    }

    /// This script followed by `next`.
    pub fn then(mut self, next: ScrollScript) -> Self {
        self.frames.extend(next.frames);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn inputs(&self, frame: usize) -> &[ScrollInput] {
        self.frames.get(frame).map_or(&[], Vec::as_slice)
    }

    /// A JSON array with one array of inputs per frame, e.g.
    /// `[[{"wheel": 120}], [], [{"jump": 0}]]`.
    pub fn from_json_str(s: &str) -> ScrollreelResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    /// Frames on which the timeline was evaluated.
    pub seeks: u64,
    pub writes: u64,
}

/// Play `script` through `story` at `fps`, pushing every rendered frame to
/// `sink`. The sink is finished on success.
#[tracing::instrument(skip(story, script, backend, sink), fields(frames = script.len()))]
pub fn run_script(
    story: &mut Story,
    script: &ScrollScript,
    fps: u32,
    backend: &mut dyn RenderBackend,
    sink: &mut dyn FrameSink,
) -> ScrollreelResult<RunStats> {
    if fps == 0 {
        return Err(ScrollreelError::validation("fps must be non-zero"));
    }
    let dt = 1.0 / f64::from(fps);
    let mut stats = RunStats::default();

    for i in 0..script.len() {
        for &input in script.inputs(i) {
            story.input(input);
        }
        let update = story.step(dt);
        let frame = story.render(backend)?;
        sink.push(&frame)?;

        stats.frames += 1;
        if update.seeked {
            stats.seeks += 1;
            stats.writes += update.writes as u64;
        }
    }
    sink.finish()?;

    tracing::debug!(
        frames = stats.frames,
        seeks = stats.seeks,
        writes = stats.writes,
        "script finished"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/driver/script.rs"]
mod tests;
