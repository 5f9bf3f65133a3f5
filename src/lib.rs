//! # VideoMaker
//!
//! Build a slideshow movie from typeset title slides and folders of pictures.
//!
//! The heavy lifting is done by external programs: a TeX compiler and a DVI
//! rasterizer for the slides, and FFmpeg for encoding. This crate orders the
//! pictures, composites everything onto a fixed-size canvas, stages a
//! numbered frame sequence, and drives the tools.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use videomaker::{
//!     composition::SlideshowEngine,
//!     config::Config,
//!     slides::LatexRenderer,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::from_file("movie.toml")?;
//! let renderer = LatexRenderer::from_config(&config.slides, &config.tools);
//!
//! let engine = SlideshowEngine::new(config, Box::new(renderer));
//! let movie = engine.render().await?;
//! println!("wrote {:?}", movie.path);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Versioned TOML configuration
//! - [`slides`] - Title slide rendering through external tools
//! - [`video`] - Picture ordering, compositing, staging, and encoding
//! - [`composition`] - The pipeline tying it all together

pub mod composition;
pub mod config;
pub mod error;
pub mod slides;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    composition::SlideshowEngine,
    config::Config,
    error::{Result, VideoMakerError},
    slides::{LatexRenderer, SlideRenderer},
};
