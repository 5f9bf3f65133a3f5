//! # Slideshow Engine
//!
//! The engine walks the configured sections in order, renders and composites
//! their images, stages the numbered frame sequence, and hands it to the
//! encoder.

pub mod engine;

pub use engine::{RunOptions, SlideshowEngine, Timeline, TimelineEntry};
