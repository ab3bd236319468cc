use anyhow::Result;
use tracing::{info, warn};

use crate::ai::TextGenerator;
use crate::config::SectionConfig;
use crate::models::{Section, TranscriptSnippet, VideoMetadata};
use crate::retry::{with_rate_limit_retry, RateLimitPolicy};
use crate::sections::chapters::{assign_transcript_to_sections, parse_chapters_from_description};
use crate::sections::consolidator::consolidate_sections;
use crate::sections::segmenter::segment_transcript;
use crate::sections::splitter::split_by_time;

/// Orchestrates section detection over three ordered strategies.
///
/// Author-curated chapters from the description win outright; otherwise the
/// AI segmenter is attempted, and any failure there degrades to the
/// time-based split, which cannot fail. Once a section list exists, an
/// optional consolidation pass enforces the configured slide bound —
/// consolidation failure propagates, since ignoring it would break the
/// caller's bound.
pub struct SectionDetector<'a> {
    generator: &'a dyn TextGenerator,
    config: &'a SectionConfig,
    retry_policy: RateLimitPolicy,
}

impl<'a> SectionDetector<'a> {
    pub fn new(
        generator: &'a dyn TextGenerator,
        config: &'a SectionConfig,
        retry_policy: RateLimitPolicy,
    ) -> Self {
        Self {
            generator,
            config,
            retry_policy,
        }
    }

    /// Partition the video timeline into an ordered, bounded section list
    pub async fn detect(
        &self,
        metadata: &VideoMetadata,
        transcript: &[TranscriptSnippet],
    ) -> Result<Vec<Section>> {
        let sections = self.detect_unbounded(metadata, transcript).await;
        self.enforce_bound(sections, &metadata.title).await
    }

    async fn detect_unbounded(
        &self,
        metadata: &VideoMetadata,
        transcript: &[TranscriptSnippet],
    ) -> Vec<Section> {
        if let Some(chapters) =
            parse_chapters_from_description(&metadata.description, metadata.duration_seconds)
        {
            info!("📑 Found {} chapters in video description", chapters.len());
            return assign_transcript_to_sections(&chapters, transcript);
        }

        info!("🤖 No chapters found, requesting AI segmentation");
        let generator = self.generator;
        let segmented = with_rate_limit_retry(&self.retry_policy, move || {
            segment_transcript(generator, transcript, metadata)
        })
        .await;

        match segmented {
            Ok(sections) => sections,
            Err(e) => {
                warn!("❌ AI segmentation failed: {:#}", e);
                info!(
                    "⏱️ Falling back to time-based splitting ({}s windows)",
                    self.config.time_split_interval_seconds
                );
                split_by_time(
                    transcript,
                    metadata.duration_seconds,
                    self.config.time_split_interval_seconds,
                )
            }
        }
    }

    async fn enforce_bound(
        &self,
        sections: Vec<Section>,
        video_title: &str,
    ) -> Result<Vec<Section>> {
        let max = self.config.max_sections;
        if max == 0 || sections.len() <= max {
            return Ok(sections);
        }

        info!(
            "🗜️ Consolidating {} sections into {} slides",
            sections.len(),
            max
        );
        let generator = self.generator;
        let sections = &sections;
        with_rate_limit_retry(&self.retry_policy, move || {
            consolidate_sections(generator, sections.clone(), max, video_title)
        })
        .await
    }
}
