//! Temporary directories holding rendered slides, composites, and the flat
//! numbered frame sequence handed to the encoder.

use std::path::{Path, PathBuf};

use tempfile::{Builder as TempFileBuilder, TempDir};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Width of the zero-padded frame counter
pub const FRAME_DIGITS: usize = 5;

/// Prefix of every directory created by a run
pub const STAGING_PREFIX: &str = "videomaker-";

/// File name of frame `index` (`00042.png`)
pub fn frame_name(index: usize) -> String {
    format!("{:0width$}.png", index, width = FRAME_DIGITS)
}

/// Endless iterator over frame paths inside a directory
#[derive(Debug, Clone)]
pub struct FrameNamer {
    dir: PathBuf,
    next: usize,
}

impl FrameNamer {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into(), next: 0 }
    }

    /// Index the next yielded path will carry
    pub fn position(&self) -> usize {
        self.next
    }
}

impl Iterator for FrameNamer {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let path = self.dir.join(frame_name(self.next));
        self.next += 1;
        Some(path)
    }
}

/// Owner of the run's temporary directories
///
/// Both directories are deleted when the area is closed or dropped, unless
/// [`StagingArea::keep`] was called.
pub struct StagingArea {
    work: Option<TempDir>,
    frames: Option<TempDir>,
    namer: FrameNamer,
}

impl StagingArea {
    /// Create the work and frames directories, under `base` if given
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let (work, frames) = match base {
            Some(base) => {
                std::fs::create_dir_all(base)?;
                (
                    TempFileBuilder::new().prefix(&format!("{}work-", STAGING_PREFIX)).tempdir_in(base)?,
                    TempFileBuilder::new().prefix(&format!("{}frames-", STAGING_PREFIX)).tempdir_in(base)?,
                )
            }
            None => (
                TempFileBuilder::new().prefix(&format!("{}work-", STAGING_PREFIX)).tempdir()?,
                TempFileBuilder::new().prefix(&format!("{}frames-", STAGING_PREFIX)).tempdir()?,
            ),
        };

        debug!("Staging directories: work {:?}, frames {:?}", work.path(), frames.path());

        let namer = FrameNamer::new(frames.path());
        Ok(Self {
            work: Some(work),
            frames: Some(frames),
            namer,
        })
    }

    /// Scratch directory for slides and composites
    pub fn work_dir(&self) -> &Path {
        match &self.work {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Directory holding the numbered frame sequence
    pub fn frames_dir(&self) -> &Path {
        match &self.frames {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Number of frames staged so far
    pub fn frame_count(&self) -> usize {
        self.namer.position()
    }

    /// Copy `source` into the sequence as the next `count` frames
    pub fn append<P: AsRef<Path>>(&mut self, source: P, count: u64) -> Result<()> {
        let source = source.as_ref();
        for _ in 0..count {
            if let Some(dest) = self.namer.next() {
                std::fs::copy(source, &dest)?;
            }
        }
        debug!("Staged {:?} x{} (total {})", source, count, self.frame_count());
        Ok(())
    }

    /// Persist both directories and return their paths (work, frames)
    pub fn keep(mut self) -> (PathBuf, PathBuf) {
        let work = self.work.take().map(TempDir::into_path).unwrap_or_default();
        let frames = self.frames.take().map(TempDir::into_path).unwrap_or_default();
        info!("Keeping staging directories {:?} and {:?}", work, frames);
        (work, frames)
    }

    /// Remove both directories, reporting the first failure
    pub fn close(mut self) -> Result<()> {
        let work = self.work.take().map(TempDir::close);
        let frames = self.frames.take().map(TempDir::close);
        debug!("Removed staging directories");

        if let Some(result) = work {
            result?;
        }
        if let Some(result) = frames {
            result?;
        }
        Ok(())
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        for dir in [self.work.take(), self.frames.take()].into_iter().flatten() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!("Failed to remove temporary directory {:?}: {}", path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frame_names() {
        assert_eq!(frame_name(0), "00000.png");
        assert_eq!(frame_name(42), "00042.png");
        assert_eq!(frame_name(123456), "123456.png");

        let names: Vec<String> = FrameNamer::new("/tmp/x")
            .take(3)
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["00000.png", "00001.png", "00002.png"]);
    }

    #[test]
    fn test_append_numbers_sequentially() {
        let base = tempdir().unwrap();
        let mut staging = StagingArea::new(Some(base.path())).unwrap();

        let a = staging.work_dir().join("a.png");
        let b = staging.work_dir().join("b.png");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();

        staging.append(&a, 3).unwrap();
        staging.append(&b, 2).unwrap();
        assert_eq!(staging.frame_count(), 5);

        let frames = staging.frames_dir();
        assert_eq!(std::fs::read(frames.join("00002.png")).unwrap(), b"a");
        assert_eq!(std::fs::read(frames.join("00003.png")).unwrap(), b"b");
        assert!(!frames.join("00005.png").exists());
    }

    #[test]
    fn test_close_removes_directories() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new(Some(base.path())).unwrap();
        let work = staging.work_dir().to_path_buf();
        let frames = staging.frames_dir().to_path_buf();
        assert!(work.is_dir() && frames.is_dir());

        staging.close().unwrap();
        assert!(!work.exists());
        assert!(!frames.exists());
        assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_drop_removes_directories() {
        let base = tempdir().unwrap();
        let work = {
            let staging = StagingArea::new(Some(base.path())).unwrap();
            staging.work_dir().to_path_buf()
        };
        assert!(!work.exists());
    }

    #[test]
    fn test_keep_persists_directories() {
        let base = tempdir().unwrap();
        let staging = StagingArea::new(Some(base.path())).unwrap();
        let (work, frames) = staging.keep();

        assert!(work.is_dir());
        assert!(frames.is_dir());
    }
}
