use thiserror::Error;

/// Main error type for the VideoMaker library
#[derive(Error, Debug)]
pub enum VideoMakerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Slide rendering error: {0}")]
    Slide(#[from] SlideError),

    #[error("Picture error: {0}")]
    Picture(#[from] PictureError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Title slide errors
#[derive(Error, Debug)]
pub enum SlideError {
    #[error("No .tex source found in {path}")]
    NoSource { path: String },

    #[error("{tool} failed on {path}: {stderr}")]
    ToolFailed {
        tool: String,
        path: String,
        stderr: String,
    },

    #[error("{tool} could not be started: {reason}")]
    ToolMissing { tool: String, reason: String },

    #[error("Rasterizer produced no image at {path}")]
    MissingOutput { path: String },
}

/// Picture folder and compositing errors
#[derive(Error, Debug)]
pub enum PictureError {
    #[error("Picture folder not found: {path}")]
    FolderNotFound { path: String },

    #[error("No pictures found in {path}")]
    NoPictures { path: String },

    #[error("Failed to load picture {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Picture has zero size: {path}")]
    Empty { path: String },
}

/// Video encoder errors
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Encoder '{program}' not found. Please install it or set tools.encoder")]
    NotFound { program: String },

    #[error("Encoder failed: {stderr}")]
    Failed { stderr: String },

    #[error("Encoder produced no output at {path}")]
    MissingOutput { path: String },

    #[error("No frames to encode")]
    NoFrames,
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unsupported configuration version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using VideoMakerError
pub type Result<T> = std::result::Result<T, VideoMakerError>;

impl VideoMakerError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Slide(SlideError::ToolMissing { tool, .. }) => {
                format!("Could not run '{}'. Is a TeX distribution installed?", tool)
            }
            Self::Encode(EncodeError::NotFound { program }) => {
                format!("Could not run '{}'. Please install FFmpeg.", program)
            }
            Self::Picture(PictureError::NoPictures { path }) => {
                format!("The folder '{}' contains no pictures.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_missing_config() {
        let err: VideoMakerError = ConfigError::FileNotFound {
            path: "movie.toml".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "Configuration file 'movie.toml' not found.");
    }

    #[test]
    fn test_user_message_falls_back_to_display() {
        let err: VideoMakerError = EncodeError::NoFrames.into();
        assert_eq!(err.user_message(), "Encoding error: No frames to encode");
    }
}
