use crate::{
    config::StoryConfig,
    field::{MotionField, cloud::PointCloud, dashes::DashField},
    foundation::{
        core::Viewport,
        error::{ScrollreelError, ScrollreelResult},
    },
    render::{FrameRGBA, FrameView, RenderBackend},
    scene::{
        builder::{Stage, Variant, build_stage},
        model::{Scene, Shape},
    },
    scroll::{
        normalizer::{ScrollInput, ScrollNormalizer},
        scrub::Playhead,
    },
    timeline::{
        phases::author_timeline,
        timeline::{BoundTimeline, Phase},
    },
};

/// What one [`Story::step`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUpdate {
    /// The smoothed scroll position moved this frame.
    pub scrolled: bool,
    /// The timeline was evaluated this frame.
    pub seeked: bool,
    /// Attribute writes performed by the seek (0 when not seeked).
    pub writes: usize,
    pub progress: f64,
    pub time: f64,
    pub phase: Option<Phase>,
}

/// The whole running narrative: stage, bound timeline, scroll smoothing,
/// scrub playhead and background field. Built once by [`Story::new`].
pub struct Story {
    config: StoryConfig,
    stage: Stage,
    timeline: BoundTimeline,
    normalizer: ScrollNormalizer,
    playhead: Playhead,
    field: MotionField,
    dirty: bool,
    frames: u64,
}

impl std::fmt::Debug for Story {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Story")
            .field("variant", &self.stage.variant)
            .field("viewport", &self.config.viewport)
            .field("frames", &self.frames)
            .field("time", &self.timeline.time())
            .finish_non_exhaustive()
    }
}

impl Story {
    #[tracing::instrument(skip(config), fields(variant = ?config.variant, seed = config.seed))]
    pub fn new(config: StoryConfig) -> ScrollreelResult<Self> {
        config.validate()?;

        let stage = build_stage(config.variant, &config.palette);
        let timeline = author_timeline(&stage, config.seed).bind(&stage.scene)?;
        let normalizer = ScrollNormalizer::new(
            config.document_height,
            f64::from(config.viewport.height),
            config.smoothing,
        )?
        .with_smooth_touch(config.smooth_touch);
        let playhead = Playhead::new(config.scrub_secs);

        let (w, h) = surface(config.viewport);
        let field = match config.variant {
            Variant::Flat => MotionField::Dashes(DashField::new(config.dash_count, w, h, config.seed)),
            Variant::Depth => {
                MotionField::Cloud(PointCloud::new(config.cloud_points, w, h, config.seed))
            }
        };

        tracing::debug!(
            nodes = stage.scene.len(),
            channels = timeline.channel_count(),
            limit = normalizer.limit(),
            "story ready"
        );

        let mut story = Self {
            config,
            stage,
            timeline,
            normalizer,
            playhead,
            field,
            dirty: true,
            frames: 0,
        };
        story.sync_camera();
        Ok(story)
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    pub fn timeline(&self) -> &BoundTimeline {
        &self.timeline
    }

    pub fn normalizer(&self) -> &ScrollNormalizer {
        &self.normalizer
    }

    pub fn field(&self) -> &MotionField {
        &self.field
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    /// Frames stepped so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Label active at the current playhead.
    pub fn phase(&self) -> Option<Phase> {
        self.timeline.phase_at(self.timeline.time().unwrap_or(0.0))
    }

    pub fn input(&mut self, input: ScrollInput) {
        self.normalizer.input(input);
    }

    /// Resize the output surface and the scrollable document. The scene is
    /// kept; the next frame re-evaluates the timeline.
    pub fn resize(&mut self, viewport: Viewport, document_height: f64) -> ScrollreelResult<()> {
        let viewport = Viewport::new(viewport.width, viewport.height)?;
        if !document_height.is_finite() || document_height < f64::from(viewport.height) {
            return Err(ScrollreelError::validation(
                "document_height must be finite and >= viewport height",
            ));
        }
        self.config.viewport = viewport;
        self.config.document_height = document_height;
        self.normalizer
            .resize(document_height, f64::from(viewport.height));
        let (w, h) = surface(viewport);
        self.field.resize(w, h);
        self.dirty = true;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            document_height,
            "story resized"
        );
        Ok(())
    }

    /// Advance one animation frame: smooth scroll, trail the playhead, seek
    /// the timeline when the playhead moved, then advance the background.
    pub fn step(&mut self, dt: f64) -> FrameUpdate {
        let scrolled = self.normalizer.tick(dt);
        let progress = self.normalizer.progress();
        self.playhead
            .set_target(self.timeline.progress_to_time(progress));
        let moved = self.playhead.tick(dt);
        let time = self.playhead.time().unwrap_or(0.0);

        let seeked = moved || self.dirty;
        let writes = if seeked {
            let writes = self.timeline.seek(time, &mut self.stage.scene);
            self.sync_camera();
            self.dirty = false;
            writes
        } else {
            0
        };

        self.field.advance();
        self.frames += 1;

        FrameUpdate {
            scrolled,
            seeked,
            writes,
            progress,
            time,
            phase: self.timeline.phase_at(time),
        }
    }

    /// Jump scroll and playhead to `progress` (clamped to `[0, 1]`) and
    /// evaluate the timeline there. Returns the number of attribute writes.
    pub fn seek_progress(&mut self, progress: f64) -> usize {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.normalizer
            .input(ScrollInput::Jump(progress * self.normalizer.limit()));
        self.playhead
            .set_target(self.timeline.progress_to_time(progress));
        self.playhead.snap();

        let time = self.playhead.time().unwrap_or(0.0);
        let writes = self.timeline.seek(time, &mut self.stage.scene);
        self.sync_camera();
        self.dirty = false;
        writes
    }

    /// Rasterize the current state without advancing time.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> ScrollreelResult<FrameRGBA> {
        backend.render(&FrameView {
            viewport: self.config.viewport,
            scene: &self.stage.scene,
            field: &self.field,
            palette: &self.config.palette,
            clear: self.config.clear_rgba,
        })
    }

    /// [`Story::step`] followed by [`Story::render`].
    pub fn frame(
        &mut self,
        dt: f64,
        backend: &mut dyn RenderBackend,
    ) -> ScrollreelResult<FrameRGBA> {
        self.step(dt);
        self.render(backend)
    }

    /// Copy the timeline-driven camera node into the point cloud.
    fn sync_camera(&mut self) {
        let MotionField::Cloud(cloud) = &mut self.field else {
            return;
        };
        let Some(node) = self.stage.handles.camera.and_then(|id| self.stage.scene.get(id)) else {
            return;
        };
        if let Shape::Camera { z, fov_deg } = &node.shape {
            cloud.set_camera(*z, node.transform.translate.y, *fov_deg);
        }
    }
}

fn surface(viewport: Viewport) -> (f64, f64) {
    (f64::from(viewport.width), f64::from(viewport.height))
}

#[cfg(test)]
#[path = "../../tests/unit/driver/story.rs"]
mod tests;
