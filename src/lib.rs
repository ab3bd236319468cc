/// yt-slides
///
/// Converts a YouTube video into a deck of AI-generated infographic image
/// slides: fetches metadata and transcript, partitions the timeline into
/// topical sections, summarizes each section with a text model, and renders
/// one styled image per section.

pub mod ai;
pub mod config;
pub mod error;
pub mod image;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod sections;
pub mod youtube;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::SlidesError;
pub use crate::models::{Chapter, Section, SectionSummary, SlideResult, TranscriptSnippet, VideoMetadata};
pub use crate::pipeline::Pipeline;
pub use crate::retry::{BackoffPolicy, Pacer, RateLimitPolicy};
pub use crate::sections::SectionDetector;
