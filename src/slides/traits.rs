use std::path::{Path, PathBuf};

use crate::error::Result;

/// Turns a slide source folder into a single raster image
pub trait SlideRenderer: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Render the slide found in `source_dir`, writing intermediates and the
    /// final image into `out_dir`.
    ///
    /// # Returns
    ///
    /// The path of the rendered image. The file is guaranteed to exist.
    fn render(&self, source_dir: &Path, out_dir: &Path) -> Result<PathBuf>;

    /// Check the external programs needed by this renderer can be started.
    ///
    /// Called once before any work so a missing tool fails the run early.
    fn check_tools(&self) -> Result<()> {
        Ok(())
    }
}
