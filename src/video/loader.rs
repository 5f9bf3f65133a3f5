use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PictureError, Result};
use crate::video::ordering::natural_cmp;

/// Extensions accepted in a picture folder (compared case-insensitively)
pub const PICTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// Check if a path looks like a supported picture
pub fn is_picture_file<P: AsRef<Path>>(path: P) -> bool {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            PICTURE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// List files in `directory` accepted by `keep`, in natural filename order
pub fn list_sorted<P, F>(directory: P, keep: F) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
    F: Fn(&Path) -> bool,
{
    let directory = directory.as_ref();

    if !directory.is_dir() {
        return Err(PictureError::FolderNotFound {
            path: directory.display().to_string(),
        }
        .into());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();

        if path.is_file() && !is_hidden_file(&path) && keep(&path) {
            files.push(path);
        } else {
            debug!("Skipping {:?}", path);
        }
    }

    files.sort_by(|a, b| natural_cmp(&file_name_of(a), &file_name_of(b)));
    Ok(files)
}

/// Collect the pictures of a folder in natural filename order
pub fn collect_pictures<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    let pictures = list_sorted(directory, |p| is_picture_file(p))?;

    if pictures.is_empty() {
        return Err(PictureError::NoPictures {
            path: directory.display().to_string(),
        }
        .into());
    }

    info!("Found {} pictures in {:?}", pictures.len(), directory);
    Ok(pictures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VideoMakerError;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_collect_pictures_natural_order() {
        let dir = tempdir().unwrap();
        for name in ["p10.jpg", "p2.PNG", "p1.jpeg", "notes.txt", ".hidden.png", "p3"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let pictures = collect_pictures(dir.path()).unwrap();
        let names: Vec<String> = pictures.iter().map(|p| file_name_of(p)).collect();

        assert_eq!(names, vec!["p1.jpeg", "p2.PNG", "p10.jpg"]);
    }

    #[test]
    fn test_empty_folder() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "readme.md");

        let err = collect_pictures(dir.path()).unwrap_err();
        assert!(matches!(err, VideoMakerError::Picture(PictureError::NoPictures { .. })));
    }

    #[test]
    fn test_missing_folder() {
        let dir = tempdir().unwrap();
        let err = collect_pictures(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, VideoMakerError::Picture(PictureError::FolderNotFound { .. })));
    }

    #[test]
    fn test_is_picture_file() {
        assert!(is_picture_file("a/b/photo.JPG"));
        assert!(is_picture_file("scan.tiff"));
        assert!(!is_picture_file("movie.avi"));
        assert!(!is_picture_file("noext"));
    }
}
