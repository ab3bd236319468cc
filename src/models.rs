use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for a YouTube video, as returned by the Data API v3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// YouTube video ID (11 characters)
    pub video_id: String,
    /// Video title
    pub title: String,
    /// Full description text (may contain chapter markers)
    pub description: String,
    /// Channel name
    pub channel_title: String,
    /// Total duration in seconds
    pub duration_seconds: u64,
    /// Video tags
    pub tags: Vec<String>,
}

/// A single timestamped caption entry from the transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSnippet {
    /// Caption text
    pub text: String,
    /// Start time in seconds from video start
    pub start: f64,
    /// Duration in seconds
    pub duration: f64,
}

/// An author-declared chapter parsed from the video description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    /// Chapter title
    pub title: String,
    /// Start time in seconds
    pub start_seconds: f64,
    /// End time in seconds (next chapter's start, or video duration)
    pub end_seconds: f64,
}

/// A contiguous time range of the video paired with its transcript excerpt.
///
/// The canonical unit flowing through the pipeline: one section becomes one
/// slide. Indices are 1-based and dense within any returned list; sections
/// are sorted by start time and never mutated in place — every
/// transformation builds a new list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    /// 1-based position within the deck
    pub index: usize,
    /// Section title
    pub title: String,
    /// Start time in seconds
    pub start_seconds: f64,
    /// End time in seconds
    pub end_seconds: f64,
    /// Space-joined transcript text falling within [start, end)
    pub transcript_text: String,
}

impl Section {
    /// Section length in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// Slide-ready summary of one section, produced by the text model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    /// The section this summary describes
    pub section: Section,
    /// Punchy 3-7 word slide title
    pub headline: String,
    /// 3-6 short bullet points
    pub key_points: Vec<String>,
    /// 1-2 sentences of context
    pub summary: String,
    /// Visual metaphors/imagery suggestions for the image model
    pub visual_suggestions: String,
}

/// Outcome of generating (or dry-running) one slide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideResult {
    pub section_index: usize,
    pub section_title: String,
    pub image_path: PathBuf,
    pub prompt_used: String,
}
