//! # Title Slides
//!
//! Opening, ending, and interstitial slides are typeset from a source folder
//! by external tools and rasterized to a single image, which is then
//! composited like any other picture.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use videomaker::slides::{LatexRenderer, SlideRenderer};
//!
//! # fn main() -> videomaker::Result<()> {
//! let renderer = LatexRenderer::new("latex", "dvipng", 300);
//! let png = renderer.render(Path::new("intro/"), Path::new("/tmp"))?;
//! println!("slide at {:?}", png);
//! # Ok(())
//! # }
//! ```

pub mod latex;
pub mod traits;

pub use latex::LatexRenderer;
pub use traits::SlideRenderer;
