/// Section detection and consolidation
///
/// Decides how a video's timeline is partitioned into a bounded number of
/// coherent sections: explicit chapter markers from the description when the
/// author provided them, AI segmentation otherwise, and a fixed-interval
/// split as the method of last resort.
pub mod chapters;
pub mod consolidator;
pub mod detector;
pub mod segmenter;
pub mod splitter;

pub use chapters::{assign_transcript_to_sections, parse_chapters_from_description};
pub use consolidator::consolidate_sections;
pub use detector::SectionDetector;
pub use segmenter::segment_transcript;
pub use splitter::split_by_time;
