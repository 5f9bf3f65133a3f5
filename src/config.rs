use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// The only configuration document version this build understands
pub const CONFIG_VERSION: u32 = 1;

/// Main configuration for a VideoMaker run
///
/// ```toml
/// version = 1
///
/// [movie]
/// fps = 25
///
/// [opening]
/// type = "slide"
/// path = "intro/"
/// duration = 4.0
///
/// [[body]]
/// type = "images"
/// path = "pictures/"
///
/// [ending]
/// type = "slide"
/// path = "credits/"
/// duration = 3.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document format version
    pub version: u32,

    /// Output movie settings
    #[serde(default)]
    pub movie: MovieConfig,

    /// Title slide rasterization settings
    #[serde(default)]
    pub slides: SlideConfig,

    /// External programs
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Section played first
    pub opening: Section,

    /// Sections played between opening and ending
    #[serde(default)]
    pub body: Vec<Section>,

    /// Section played last
    pub ending: Section,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            movie: MovieConfig::default(),
            slides: SlideConfig::default(),
            tools: ToolsConfig::default(),
            opening: Section::slide("intro", 4.0),
            body: vec![Section::images("pictures")],
            ending: Section::slide("credits", 4.0),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::ParseFailed {
                path: origin.to_string(),
                reason: e.message().to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            }
            .into()
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                expected: CONFIG_VERSION,
            }
            .into());
        }

        self.movie.validate()?;
        self.slides.validate()?;
        self.opening.validate("opening")?;
        for (i, section) in self.body.iter().enumerate() {
            section.validate(&format!("body[{}]", i))?;
        }
        self.ending.validate("ending")?;
        Ok(())
    }

    /// Make relative section paths relative to `base` (usually the
    /// directory holding the configuration file)
    pub fn resolve_relative_to<P: AsRef<Path>>(&mut self, base: P) {
        let base = base.as_ref();
        let rebase = |section: &mut Section| {
            if section.path.is_relative() {
                section.path = base.join(&section.path);
            }
        };

        rebase(&mut self.opening);
        self.body.iter_mut().for_each(rebase);
        rebase(&mut self.ending);
    }

    /// All sections in playback order, labelled for logging
    pub fn sections(&self) -> Vec<(String, &Section)> {
        let mut sections = Vec::with_capacity(self.body.len() + 2);
        sections.push(("opening".to_string(), &self.opening));
        for (i, section) in self.body.iter().enumerate() {
            sections.push((format!("body[{}]", i), section));
        }
        sections.push(("ending".to_string(), &self.ending));
        sections
    }
}

/// Output movie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieConfig {
    /// Frames per second
    pub fps: u32,

    /// Video bitrate in kbit/s
    pub bitrate: u32,

    /// Encoder codec name
    pub codec: String,

    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Canvas background color (RGB)
    pub background: [u8; 3],

    /// Output file name, written to the output directory
    pub output: String,
}

impl Default for MovieConfig {
    fn default() -> Self {
        Self {
            fps: 25,
            bitrate: 800,
            codec: "msmpeg4v2".to_string(),
            width: 1280,
            height: 720,
            background: [0, 0, 0],
            output: "output.avi".to_string(),
        }
    }
}

impl MovieConfig {
    fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(invalid("movie.fps", self.fps));
        }

        if self.bitrate == 0 {
            return Err(invalid("movie.bitrate", self.bitrate));
        }

        if self.codec.trim().is_empty() {
            return Err(invalid("movie.codec", &self.codec));
        }

        // yuv420p needs even dimensions
        if self.width == 0 || self.width % 2 != 0 {
            return Err(invalid("movie.width", self.width));
        }
        if self.height == 0 || self.height % 2 != 0 {
            return Err(invalid("movie.height", self.height));
        }

        let name = Path::new(&self.output);
        if self.output.is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(invalid("movie.output", &self.output));
        }

        Ok(())
    }
}

/// Title slide rasterization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// Rasterizer resolution in dots per inch
    pub dpi: u32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self { dpi: 300 }
    }
}

impl SlideConfig {
    fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(invalid("slides.dpi", self.dpi));
        }
        Ok(())
    }
}

/// External program names or paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub typesetter: String,
    pub rasterizer: String,
    pub encoder: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            typesetter: "latex".to_string(),
            rasterizer: "dvipng".to_string(),
            encoder: "ffmpeg".to_string(),
        }
    }
}

/// What a section is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// A typeset title slide held on screen
    Slide,
    /// A folder of pictures shown in natural filename order
    Images,
}

/// One part of the movie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Source directory (the .tex folder or the picture folder)
    pub path: PathBuf,

    #[serde(rename = "type")]
    pub kind: SectionKind,

    /// Seconds a slide stays on screen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Pictures shown per second; defaults to one picture per frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    /// How many times the section plays back to back
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

impl Section {
    pub fn slide<P: Into<PathBuf>>(path: P, duration: f64) -> Self {
        Self {
            path: path.into(),
            kind: SectionKind::Slide,
            duration: Some(duration),
            speed: None,
            repeat: 1,
        }
    }

    pub fn images<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            kind: SectionKind::Images,
            duration: None,
            speed: None,
            repeat: 1,
        }
    }

    /// Frames a slide section occupies for one playback
    pub fn slide_frames(&self, fps: u32) -> u32 {
        let duration = self.duration.unwrap_or(0.0);
        ((duration * fps as f64).round() as u32).max(1)
    }

    /// Frames each picture of an image section is held for
    pub fn frames_per_image(&self, fps: u32) -> u32 {
        match self.speed {
            Some(speed) => ((fps as f64 / speed).round() as u32).max(1),
            None => 1,
        }
    }

    fn validate(&self, label: &str) -> Result<()> {
        if self.repeat == 0 {
            return Err(invalid(&format!("{}.repeat", label), self.repeat));
        }

        match self.kind {
            SectionKind::Slide => match self.duration {
                Some(d) if d.is_finite() && d > 0.0 => {}
                Some(d) => return Err(invalid(&format!("{}.duration", label), d)),
                None => return Err(invalid(&format!("{}.duration", label), "missing")),
            },
            SectionKind::Images => {
                if let Some(speed) = self.speed {
                    if !speed.is_finite() || speed <= 0.0 {
                        return Err(invalid(&format!("{}.speed", label), speed));
                    }
                }
            }
        }

        Ok(())
    }
}

fn invalid<V: ToString>(key: &str, value: V) -> crate::error::VideoMakerError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}
