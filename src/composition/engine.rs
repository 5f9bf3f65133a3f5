use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{
    config::{Config, Section, SectionKind},
    error::{EncodeError, Result},
    slides::SlideRenderer,
    video::{collect_pictures, Canvas, EncodedVideo, EncoderSettings, StagingArea, VideoEncoder},
};

/// Where and how a run keeps its files
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Base directory for staging directories (system temp dir if `None`)
    pub temp_base: Option<PathBuf>,

    /// Leave staging directories on disk after the run
    pub keep_temp: bool,

    /// Directory the finished movie is moved into
    pub output_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            temp_base: None,
            keep_temp: false,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Main engine that turns a configuration into a movie
///
/// The engine follows a linear pipeline:
/// 1. Slides - Typeset and rasterize every slide section
/// 2. Pictures - Collect picture folders in natural order and composite them
/// 3. Staging - Copy composites into a flat numbered frame sequence
/// 4. Encoding - Run the external encoder over the sequence
/// 5. Delivery - Move the movie to the output directory and clean up
pub struct SlideshowEngine {
    config: Config,
    renderer: Box<dyn SlideRenderer>,
    options: RunOptions,
}

impl SlideshowEngine {
    /// Create a new engine with the given configuration and slide renderer
    pub fn new(config: Config, renderer: Box<dyn SlideRenderer>) -> Self {
        Self {
            config,
            renderer,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    fn canvas(&self) -> Canvas {
        let movie = &self.config.movie;
        Canvas::new(movie.width, movie.height, movie.background)
    }

    /// Whether any section is typeset, so the slide tools are needed at all
    fn needs_slides(&self) -> bool {
        self.config
            .sections()
            .iter()
            .any(|(_, section)| section.kind == SectionKind::Slide)
    }

    fn encoder(&self) -> VideoEncoder {
        VideoEncoder::new(EncoderSettings::from_config(&self.config.movie, &self.config.tools))
    }

    /// Run the whole pipeline and return the delivered movie
    pub async fn render(&self) -> Result<EncodedVideo> {
        info!("🎬 Starting VideoMaker run");
        info!("   Sections: {}", self.config.sections().len());
        info!("   Output: {:?}", self.options.output_dir.join(&self.config.movie.output));
        info!("   Slides: {}", self.renderer.name());

        if self.needs_slides() {
            self.renderer.check_tools()?;
        }
        let encoder = self.encoder();
        if !encoder.check_available().await {
            return Err(EncodeError::NotFound {
                program: encoder.settings().program.clone(),
            }
            .into());
        }

        let mut staging = StagingArea::new(self.options.temp_base.as_deref())?;
        let result = self.run_staged(&encoder, &mut staging).await;

        if self.options.keep_temp {
            staging.keep();
        } else if let Err(e) = staging.close() {
            warn!("Failed to clean up staging directories: {}", e);
        }

        let video = result?;
        info!("🎉 Movie complete! Saved to: {:?}", video.path);
        Ok(video)
    }

    async fn run_staged(&self, encoder: &VideoEncoder, staging: &mut StagingArea) -> Result<EncodedVideo> {
        let timeline = self.build_timeline(staging)?;
        self.stage_timeline(&timeline, staging)?;

        info!("📼 Step 4: Encoding {} frames...", staging.frame_count());
        let encoded_path = staging.work_dir().join(&self.config.movie.output);
        let encoded = encoder
            .encode(staging.frames_dir(), staging.frame_count(), &encoded_path)
            .await?;

        info!("📦 Step 5: Delivering movie...");
        std::fs::create_dir_all(&self.options.output_dir)?;
        let destination = self.options.output_dir.join(&self.config.movie.output);
        move_file(&encoded.path, &destination)?;

        info!("   Duration: {:.1}s", encoded.duration);
        info!("   Frame count: {}", encoded.frame_count);
        info!("   File size: {:.1} MB", encoded.file_size as f64 / 1024.0 / 1024.0);

        Ok(EncodedVideo {
            path: destination,
            ..encoded
        })
    }

    // ==========================================
    // STEPS 1-2: SLIDES AND PICTURES
    // ==========================================

    /// Render slides and composite pictures into the work directory
    ///
    /// Returns the ordered timeline of composited images with their frame
    /// counts. Nothing is copied into the frame sequence yet.
    pub fn build_timeline(&self, staging: &StagingArea) -> Result<Timeline> {
        let fps = self.config.movie.fps;
        let canvas = self.canvas();
        let composites = staging.work_dir().join("composites");
        std::fs::create_dir_all(&composites)?;

        let mut timeline = Timeline::new();
        let mut composite_index = 0usize;
        let mut next_composite = || {
            let path = composites.join(format!("{:05}.png", composite_index));
            composite_index += 1;
            path
        };

        for (index, (label, section)) in self.config.sections().into_iter().enumerate() {
            match section.kind {
                SectionKind::Slide => {
                    info!("📝 Step 1: Rendering {} slide from {:?}", label, section.path);
                    let slide_dir = staging.work_dir().join(format!("slide-{:02}", index));
                    std::fs::create_dir_all(&slide_dir)?;

                    let slide = self.renderer.render(&section.path, &slide_dir)?;
                    let composite = next_composite();
                    canvas.composite_file(&slide, &composite)?;

                    let frames = section_frame_count(section, fps, 1);
                    timeline.add(composite, frames, &label);
                    debug!("{}: slide held for {} frames", label, frames);
                }
                SectionKind::Images => {
                    info!("🖼️  Step 2: Compositing {} pictures from {:?}", label, section.path);
                    let pictures = collect_pictures(&section.path)?;

                    let mut composited = Vec::with_capacity(pictures.len());
                    for picture in &pictures {
                        let composite = next_composite();
                        canvas.composite_file(picture, &composite)?;
                        composited.push(composite);
                    }

                    let per_image = section.frames_per_image(fps) as u64;
                    for _ in 0..section.repeat {
                        for composite in &composited {
                            timeline.add(composite.clone(), per_image, &label);
                        }
                    }
                    debug!("{}: {} pictures x {} frames x {} plays = {} frames",
                           label, composited.len(), per_image, section.repeat,
                           section_frame_count(section, fps, composited.len()));
                }
            }
        }

        info!("   ✅ Timeline built:");
        info!("      Entries: {}", timeline.len());
        info!("      Frames: {}", timeline.total_frames());
        info!("      Duration: {:.1}s", timeline.duration(fps));

        Ok(timeline)
    }

    // ==========================================
    // STEP 3: STAGING
    // ==========================================

    /// Copy every timeline entry into the numbered frame sequence
    pub fn stage_timeline(&self, timeline: &Timeline, staging: &mut StagingArea) -> Result<()> {
        info!("🗂️  Step 3: Staging frames...");
        if timeline.is_empty() {
            return Err(EncodeError::NoFrames.into());
        }
        for entry in timeline.entries() {
            staging.append(&entry.source, entry.frames)?;
        }
        info!("   ✅ Staged {} frames", staging.frame_count());
        Ok(())
    }
}

/// Move a file, falling back to copy + remove across filesystems
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    debug!("Rename failed, copying {:?} to {:?}", from, to);
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)?;
    Ok(())
}

// ==========================================
// TIMELINE DATA STRUCTURES
// ==========================================

/// One image held on screen for a number of frames
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub source: PathBuf,
    pub frames: u64,
    /// Label of the section the entry came from
    pub section: String,
}

/// Ordered, append-only list of images and their frame counts
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<P: Into<PathBuf>>(&mut self, source: P, frames: u64, section: &str) {
        self.entries.push(TimelineEntry {
            source: source.into(),
            frames,
            section: section.to_string(),
        });
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_frames(&self) -> u64 {
        self.entries.iter().map(|e| e.frames).sum()
    }

    /// Playback length in seconds at `fps`
    pub fn duration(&self, fps: u32) -> f64 {
        self.total_frames() as f64 / fps.max(1) as f64
    }

    /// Frames contributed by one section
    pub fn section_frames(&self, section: &str) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.section == section)
            .map(|e| e.frames)
            .sum()
    }
}

/// Frames a section contributes once rendered, given its picture count
pub fn section_frame_count(section: &Section, fps: u32, pictures: usize) -> u64 {
    match section.kind {
        SectionKind::Slide => section.slide_frames(fps) as u64 * section.repeat as u64,
        SectionKind::Images => {
            section.frames_per_image(fps) as u64 * pictures as u64 * section.repeat as u64
        }
    }
}
