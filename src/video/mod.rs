//! # Video Module
//!
//! Picture collection, canvas compositing, frame staging, and encoding.

pub mod compositor;
pub mod encoder;
pub mod loader;
pub mod ordering;
pub mod staging;
pub mod types;

pub use compositor::{fit_within, Canvas, Placement};
pub use encoder::{EncodedVideo, EncoderSettings, VideoEncoder};
pub use loader::collect_pictures;
pub use ordering::{natural_cmp, natural_sort};
pub use staging::{FrameNamer, StagingArea};
pub use types::Frame;
