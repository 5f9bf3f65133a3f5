use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{MovieConfig, ToolsConfig};
use crate::error::{EncodeError, Result};
use crate::video::staging::FRAME_DIGITS;

/// Represents an encoded movie
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub path: PathBuf,
    pub frame_count: usize,
    pub duration: f64,
    pub file_size: u64,
}

/// Parameters handed to the external encoder
#[derive(Debug, Clone)]
pub struct EncoderSettings {
    pub program: String,
    pub fps: u32,
    /// kbit/s
    pub bitrate: u32,
    pub codec: String,
}

impl EncoderSettings {
    pub fn from_config(movie: &MovieConfig, tools: &ToolsConfig) -> Self {
        Self {
            program: tools.encoder.clone(),
            fps: movie.fps,
            bitrate: movie.bitrate,
            codec: movie.codec.clone(),
        }
    }
}

/// Drives an FFmpeg-compatible encoder over a numbered PNG sequence
pub struct VideoEncoder {
    settings: EncoderSettings,
}

impl VideoEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    /// Whether the encoder program can be started
    pub async fn check_available(&self) -> bool {
        Command::new(&self.settings.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Command line encoding `frames_dir/%05d.png` into `output`
    pub fn build_args(&self, frames_dir: &Path, output: &Path) -> Vec<String> {
        let pattern = frames_dir.join(format!("%0{}d.png", FRAME_DIGITS));
        vec![
            "-y".to_string(),
            "-loglevel".to_string(), "error".to_string(),
            "-framerate".to_string(), self.settings.fps.to_string(),
            "-i".to_string(), pattern.display().to_string(),
            "-c:v".to_string(), self.settings.codec.clone(),
            "-b:v".to_string(), format!("{}k", self.settings.bitrate),
            "-pix_fmt".to_string(), "yuv420p".to_string(),
            output.display().to_string(),
        ]
    }

    /// Encode the `frame_count` frames staged in `frames_dir` into `output`
    pub async fn encode(&self, frames_dir: &Path, frame_count: usize, output: &Path) -> Result<EncodedVideo> {
        if frame_count == 0 {
            return Err(EncodeError::NoFrames.into());
        }

        if !self.check_available().await {
            return Err(EncodeError::NotFound {
                program: self.settings.program.clone(),
            }
            .into());
        }

        let args = self.build_args(frames_dir, output);
        debug!("Running {} {}", self.settings.program, args.join(" "));

        let result = Command::new(&self.settings.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|_| EncodeError::NotFound {
                program: self.settings.program.clone(),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(EncodeError::Failed {
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        let metadata = std::fs::metadata(output).map_err(|_| EncodeError::MissingOutput {
            path: output.display().to_string(),
        })?;

        let encoded = EncodedVideo {
            path: output.to_path_buf(),
            frame_count,
            duration: frame_count as f64 / self.settings.fps as f64,
            file_size: metadata.len(),
        };

        info!("Encoded {} frames ({:.1}s) into {:?}", encoded.frame_count, encoded.duration, encoded.path);
        Ok(encoded)
    }
}

/// Write an executable stand-in for ffmpeg into `dir`
///
/// The script answers `-version` successfully and otherwise runs `body`,
/// with `$last` holding its final argument (the output path).
#[cfg(all(test, unix))]
pub(crate) fn write_fake_encoder(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-encoder");
    let script = format!(
        "#!/bin/sh\nif [ \"$1\" = \"-version\" ]; then exit 0; fi\nfor a; do last=\"$a\"; done\n{}\n",
        body
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Fake encoder body that writes a small movie file to its output argument
#[cfg(all(test, unix))]
pub(crate) const FAKE_ENCODER_OK: &str = "printf movie > \"$last\"";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{staging::StagingArea, Frame};
    use tempfile::tempdir;

    fn settings() -> EncoderSettings {
        EncoderSettings {
            program: "ffmpeg".to_string(),
            fps: 25,
            bitrate: 800,
            codec: "msmpeg4v2".to_string(),
        }
    }

    #[test]
    fn test_build_args() {
        let encoder = VideoEncoder::new(settings());
        let args = encoder.build_args(Path::new("/tmp/frames"), Path::new("/tmp/out.avi"));

        assert_eq!(args[0], "-y");
        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-framerate") + 1], "25");
        assert_eq!(args[pos("-i") + 1], "/tmp/frames/%05d.png");
        assert_eq!(args[pos("-c:v") + 1], "msmpeg4v2");
        assert_eq!(args[pos("-b:v") + 1], "800k");
        assert_eq!(args.last().unwrap(), "/tmp/out.avi");
    }

    #[tokio::test]
    async fn test_no_frames() {
        let encoder = VideoEncoder::new(settings());
        let dir = tempdir().unwrap();
        let result = encoder.encode(dir.path(), 0, &dir.path().join("out.avi")).await;
        assert!(matches!(result, Err(crate::error::VideoMakerError::Encode(EncodeError::NoFrames))));
    }

    #[tokio::test]
    async fn test_missing_encoder() {
        let encoder = VideoEncoder::new(EncoderSettings {
            program: "videomaker-no-such-encoder".to_string(),
            ..settings()
        });
        assert!(!encoder.check_available().await);

        let dir = tempdir().unwrap();
        let result = encoder.encode(dir.path(), 1, &dir.path().join("out.avi")).await;
        assert!(matches!(result, Err(crate::error::VideoMakerError::Encode(EncodeError::NotFound { .. }))));
    }

    #[tokio::test]
    async fn test_encode_with_ffmpeg() {
        let encoder = VideoEncoder::new(settings());
        if !encoder.check_available().await {
            eprintln!("ffmpeg not installed, skipping");
            return;
        }

        let base = tempdir().unwrap();
        let mut staging = StagingArea::new(Some(base.path())).unwrap();
        let still = staging.work_dir().join("still.png");
        Frame::new_filled(64, 48, [30, 60, 90]).save_png(&still).unwrap();
        staging.append(&still, 10).unwrap();

        let output = staging.work_dir().join("out.avi");
        let encoded = encoder
            .encode(staging.frames_dir(), staging.frame_count(), &output)
            .await
            .unwrap();

        assert_eq!(encoded.frame_count, 10);
        assert!((encoded.duration - 0.4).abs() < 1e-9);
        assert!(encoded.file_size > 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_encode_with_stand_in_encoder() {
        let tools = tempdir().unwrap();
        let encoder = VideoEncoder::new(EncoderSettings {
            program: write_fake_encoder(tools.path(), FAKE_ENCODER_OK).display().to_string(),
            ..settings()
        });
        assert!(encoder.check_available().await);

        let dir = tempdir().unwrap();
        let output = dir.path().join("out.avi");
        let encoded = encoder.encode(dir.path(), 50, &output).await.unwrap();

        assert_eq!(encoded.path, output);
        assert_eq!(encoded.frame_count, 50);
        assert!((encoded.duration - 2.0).abs() < 1e-9);
        assert_eq!(encoded.file_size, 5);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_encoder_reports_stderr() {
        let tools = tempdir().unwrap();
        let encoder = VideoEncoder::new(EncoderSettings {
            program: write_fake_encoder(tools.path(), "echo 'unknown codec' >&2; exit 1")
                .display()
                .to_string(),
            ..settings()
        });

        let dir = tempdir().unwrap();
        let result = encoder.encode(dir.path(), 1, &dir.path().join("out.avi")).await;
        match result {
            Err(crate::error::VideoMakerError::Encode(EncodeError::Failed { stderr })) => {
                assert_eq!(stderr, "unknown codec");
            }
            other => panic!("expected encoder failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_encoder_without_output_is_an_error() {
        let tools = tempdir().unwrap();
        let encoder = VideoEncoder::new(EncoderSettings {
            program: write_fake_encoder(tools.path(), "exit 0").display().to_string(),
            ..settings()
        });

        let dir = tempdir().unwrap();
        let result = encoder.encode(dir.path(), 1, &dir.path().join("out.avi")).await;
        assert!(matches!(
            result,
            Err(crate::error::VideoMakerError::Encode(EncodeError::MissingOutput { .. }))
        ));
    }
}
