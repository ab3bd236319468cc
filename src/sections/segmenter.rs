use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

use crate::ai::TextGenerator;
use crate::error::SlidesError;
use crate::models::{Section, TranscriptSnippet, VideoMetadata};
use crate::sections::chapters::collect_window_text;

/// A timestamp marker is inserted whenever at least this many seconds have
/// elapsed since the last one. Bounds prompt size on long videos while
/// keeping enough temporal anchors for the model to place boundaries.
const TIMESTAMP_MARKER_INTERVAL: f64 = 15.0;

/// Overlap between consecutive proposed sections tolerated before the
/// response is rejected as malformed
const OVERLAP_TOLERANCE: f64 = 1.0;

/// Slack allowed past the video duration for the last proposed boundary
const DURATION_TOLERANCE: f64 = 5.0;

/// Structured segmentation response requested from the text model
#[derive(Debug, Deserialize)]
struct SegmentationResponse {
    sections: Vec<ProposedSection>,
}

#[derive(Debug, Deserialize)]
struct ProposedSection {
    title: String,
    start_seconds: f64,
    end_seconds: f64,
}

/// Format the transcript with periodic timestamp markers for the model
fn format_transcript_with_timestamps(transcript: &[TranscriptSnippet]) -> String {
    let mut out = String::new();
    let mut last_marker = -30.0;

    for snippet in transcript {
        if snippet.start - last_marker >= TIMESTAMP_MARKER_INTERVAL {
            let minutes = (snippet.start / 60.0) as u64;
            let seconds = (snippet.start % 60.0) as u64;
            out.push_str(&format!("\n[{}:{:02}] ", minutes, seconds));
            last_marker = snippet.start;
        }
        out.push_str(&snippet.text);
    }

    out
}

fn build_segmentation_prompt(metadata: &VideoMetadata, formatted_transcript: &str) -> String {
    let duration_min = metadata.duration_seconds as f64 / 60.0;

    format!(
        r#"You are analyzing a YouTube video transcript to identify logical sections.

Video title: {title}
Video duration: {duration_min:.1} minutes

Below is the transcript with timestamps. Identify 4-10 logical sections based on
topic changes, transitions, or natural breaking points.

For each section, provide:
- title: A concise descriptive title (3-8 words)
- start_seconds: The timestamp (in seconds) where this section begins
- end_seconds: The timestamp (in seconds) where this section ends

Rules:
- Sections must be contiguous (no gaps, no overlaps)
- First section starts at 0, last section ends at {duration}
- Each section should be 1-10 minutes long
- Prefer natural topic transitions as boundaries

Return a JSON object with a "sections" array. Example:
{{"sections": [{{"title": "Introduction", "start_seconds": 0, "end_seconds": 120}}, ...]}}

Transcript:
{transcript}"#,
        title = metadata.title,
        duration_min = duration_min,
        duration = metadata.duration_seconds,
        transcript = formatted_transcript,
    )
}

/// Strip markdown code fences some models wrap around JSON output
pub(crate) fn clean_model_response(content: &str) -> &str {
    let content = content.trim();
    if let Some(stripped) = content.strip_prefix("```") {
        if let Some(start) = stripped.find('\n') {
            if let Some(end) = stripped.rfind("```") {
                if end > start {
                    return stripped[start + 1..end].trim();
                }
            }
        }
    }
    content
}

/// Reject boundary sets the model was asked not to produce but may anyway.
///
/// Gaps are tolerated (coverage loss, not corruption); non-positive spans,
/// out-of-order starts, overlaps past the tolerance, or bounds outside the
/// video are treated as a malformed response so the caller can fall back.
fn validate_boundaries(proposed: &[ProposedSection], duration_seconds: u64) -> Result<()> {
    if proposed.is_empty() {
        return Err(SlidesError::MalformedModelResponse(
            "segmentation returned no sections".to_string(),
        )
        .into());
    }

    let max_end = duration_seconds as f64 + DURATION_TOLERANCE;
    let mut previous_end: Option<f64> = None;

    for (i, section) in proposed.iter().enumerate() {
        if section.start_seconds >= section.end_seconds {
            return Err(SlidesError::MalformedModelResponse(format!(
                "section {} has non-positive span [{}, {})",
                i + 1,
                section.start_seconds,
                section.end_seconds
            ))
            .into());
        }

        if section.start_seconds < 0.0 || section.end_seconds > max_end {
            return Err(SlidesError::MalformedModelResponse(format!(
                "section {} bounds [{}, {}) outside video duration {}",
                i + 1,
                section.start_seconds,
                section.end_seconds,
                duration_seconds
            ))
            .into());
        }

        if let Some(prev_end) = previous_end {
            if section.start_seconds < prev_end - OVERLAP_TOLERANCE {
                return Err(SlidesError::MalformedModelResponse(format!(
                    "section {} starts at {} before previous section ends at {}",
                    i + 1,
                    section.start_seconds,
                    prev_end
                ))
                .into());
            }
        }
        previous_end = Some(section.end_seconds);
    }

    Ok(())
}

/// Ask the text model to propose topical sections over the transcript.
///
/// The model only proposes titles and boundaries; each section's transcript
/// text is re-derived locally from the real transcript, so hallucinated body
/// text never enters the pipeline. Empty sections are dropped and the
/// survivors renumbered densely. Any malformed response surfaces to the
/// caller, which owns the fallback.
pub async fn segment_transcript(
    generator: &dyn TextGenerator,
    transcript: &[TranscriptSnippet],
    metadata: &VideoMetadata,
) -> Result<Vec<Section>> {
    let formatted = format_transcript_with_timestamps(transcript);
    let prompt = build_segmentation_prompt(metadata, &formatted);

    let raw = generator.generate_json(&prompt).await?;
    debug!("Segmentation response: {}", raw);

    let response: SegmentationResponse = serde_json::from_str(clean_model_response(&raw))
        .map_err(|e| SlidesError::MalformedModelResponse(format!("segmentation JSON: {}", e)))?;

    validate_boundaries(&response.sections, metadata.duration_seconds)?;

    let sections = response
        .sections
        .into_iter()
        .map(|s| {
            let text = collect_window_text(transcript, s.start_seconds, s.end_seconds);
            (s, text)
        })
        .filter(|(_, text)| !text.trim().is_empty())
        .enumerate()
        .map(|(i, (s, text))| Section {
            index: i + 1,
            title: s.title,
            start_seconds: s.start_seconds,
            end_seconds: s.end_seconds,
            transcript_text: text,
        })
        .collect();

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedGenerator {
        response: String,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate_json(&self, _prompt: &str) -> Result<String> {
            Ok(self.response.clone())
        }
    }

    fn metadata(duration: u64) -> VideoMetadata {
        VideoMetadata {
            video_id: "abc123def45".to_string(),
            title: "Test Video".to_string(),
            description: String::new(),
            channel_title: "Channel".to_string(),
            duration_seconds: duration,
            tags: vec![],
        }
    }

    fn transcript_every_ten_seconds(duration: u64) -> Vec<TranscriptSnippet> {
        (0..duration / 10)
            .map(|i| TranscriptSnippet {
                text: format!("snippet{}", i),
                start: i as f64 * 10.0,
                duration: 5.0,
            })
            .collect()
    }

    #[test]
    fn test_timestamp_markers_every_fifteen_seconds() {
        let transcript = transcript_every_ten_seconds(60);
        let formatted = format_transcript_with_timestamps(&transcript);

        // Snippets at 0, 20, 40 get markers; 10, 30, 50 do not
        assert!(formatted.contains("[0:00] snippet0"));
        assert!(formatted.contains("[0:20] snippet2"));
        assert!(formatted.contains("[0:40] snippet4"));
        assert!(!formatted.contains("[0:10]"));
        assert!(!formatted.contains("[0:30]"));
    }

    #[tokio::test]
    async fn test_segmentation_rebuilds_text_locally() {
        let generator = CannedGenerator {
            response: r#"{"sections": [
                {"title": "Opening", "start_seconds": 0, "end_seconds": 120},
                {"title": "Closing", "start_seconds": 120, "end_seconds": 240}
            ]}"#
            .to_string(),
        };
        let transcript = transcript_every_ten_seconds(240);

        let sections = segment_transcript(&generator, &transcript, &metadata(240))
            .await
            .unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].index, 1);
        assert_eq!(sections[0].title, "Opening");
        assert!(sections[0].transcript_text.starts_with("snippet0"));
        assert!(sections[0].transcript_text.ends_with("snippet11"));
        assert!(sections[1].transcript_text.starts_with("snippet12"));
    }

    #[tokio::test]
    async fn test_markdown_fenced_response_is_accepted() {
        let generator = CannedGenerator {
            response: "```json\n{\"sections\": [{\"title\": \"A\", \"start_seconds\": 0, \"end_seconds\": 100}, {\"title\": \"B\", \"start_seconds\": 100, \"end_seconds\": 200}]}\n```".to_string(),
        };
        let transcript = transcript_every_ten_seconds(200);

        let sections = segment_transcript(&generator, &transcript, &metadata(200))
            .await
            .unwrap();
        assert_eq!(sections.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_response_is_malformed() {
        let generator = CannedGenerator {
            response: "I could not find any sections, sorry!".to_string(),
        };
        let transcript = transcript_every_ten_seconds(200);

        let err = segment_transcript(&generator, &transcript, &metadata(200))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlidesError>(),
            Some(SlidesError::MalformedModelResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_overlapping_boundaries_are_malformed() {
        let generator = CannedGenerator {
            response: r#"{"sections": [
                {"title": "A", "start_seconds": 0, "end_seconds": 150},
                {"title": "B", "start_seconds": 100, "end_seconds": 200}
            ]}"#
            .to_string(),
        };
        let transcript = transcript_every_ten_seconds(200);

        let err = segment_transcript(&generator, &transcript, &metadata(200))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlidesError>(),
            Some(SlidesError::MalformedModelResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_non_positive_span_is_malformed() {
        let generator = CannedGenerator {
            response: r#"{"sections": [
                {"title": "A", "start_seconds": 120, "end_seconds": 120}
            ]}"#
            .to_string(),
        };
        let transcript = transcript_every_ten_seconds(200);

        assert!(segment_transcript(&generator, &transcript, &metadata(200))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_bounds_are_malformed() {
        let generator = CannedGenerator {
            response: r#"{"sections": [
                {"title": "A", "start_seconds": 0, "end_seconds": 500}
            ]}"#
            .to_string(),
        };
        let transcript = transcript_every_ten_seconds(200);

        assert!(segment_transcript(&generator, &transcript, &metadata(200))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_small_gaps_are_tolerated() {
        let generator = CannedGenerator {
            response: r#"{"sections": [
                {"title": "A", "start_seconds": 0, "end_seconds": 90},
                {"title": "B", "start_seconds": 100, "end_seconds": 200}
            ]}"#
            .to_string(),
        };
        let transcript = transcript_every_ten_seconds(200);

        let sections = segment_transcript(&generator, &transcript, &metadata(200))
            .await
            .unwrap();
        assert_eq!(sections.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_sections_dropped_and_renumbered() {
        // No snippets between 100 and 200
        let mut transcript = transcript_every_ten_seconds(100);
        transcript.push(TranscriptSnippet {
            text: "tail".to_string(),
            start: 250.0,
            duration: 5.0,
        });

        let generator = CannedGenerator {
            response: r#"{"sections": [
                {"title": "A", "start_seconds": 0, "end_seconds": 100},
                {"title": "Silent", "start_seconds": 100, "end_seconds": 200},
                {"title": "C", "start_seconds": 200, "end_seconds": 300}
            ]}"#
            .to_string(),
        };

        let sections = segment_transcript(&generator, &transcript, &metadata(300))
            .await
            .unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "A");
        assert_eq!(sections[1].title, "C");
        assert_eq!(sections[1].index, 2);
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        struct FailingGenerator;

        #[async_trait]
        impl TextGenerator for FailingGenerator {
            async fn generate_json(&self, _prompt: &str) -> Result<String> {
                Err(anyhow::anyhow!("transport error"))
            }
        }

        let transcript = transcript_every_ten_seconds(200);
        assert!(
            segment_transcript(&FailingGenerator, &transcript, &metadata(200))
                .await
                .is_err()
        );
    }
}
