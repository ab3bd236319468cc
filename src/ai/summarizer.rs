use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

use super::TextGenerator;
use crate::error::SlidesError;
use crate::models::{Section, SectionSummary};
use crate::sections::segmenter::clean_model_response;

/// Structured summary response requested from the text model
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    headline: String,
    key_points: Vec<String>,
    summary: String,
    visual_suggestions: VisualSuggestions,
}

/// Models sometimes return the visual suggestions as a list instead of the
/// requested string; both shapes are accepted
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VisualSuggestions {
    Text(String),
    List(Vec<String>),
}

impl VisualSuggestions {
    fn into_string(self) -> String {
        match self {
            VisualSuggestions::Text(s) => s,
            VisualSuggestions::List(items) => items.join("; "),
        }
    }
}

fn build_summary_prompt(
    section: &Section,
    video_title: &str,
    total_sections: usize,
    max_words: usize,
) -> String {
    let duration_min = section.duration_seconds() / 60.0;

    format!(
        r#"You are creating content for an infographic slide. Summarize this section of a
YouTube video into visual-friendly content.

Video: {video_title}
Section {index}/{total}: {title}
Duration: {duration_min:.1} minutes

TRANSCRIPT:
{transcript}

Create a summary optimized for a single infographic image. The infographic will
contain text rendered directly in the image, so keep everything concise.

Provide a JSON object with:
- headline: A punchy 3-7 word title for this slide (will be the largest text)
- key_points: Array of 3-6 bullet points, each under 12 words
- summary: 1-2 sentences providing context (under 40 words total)
- visual_suggestions: Describe 1-2 visual metaphors, icons, or imagery that
  would enhance understanding of this content

CRITICAL: Total word count across all fields must stay under {max_words} words.

Return JSON: {{"headline": "...", "key_points": [...], "summary": "...", "visual_suggestions": "..."}}"#,
        video_title = video_title,
        index = section.index,
        total = total_sections,
        title = section.title,
        duration_min = duration_min,
        transcript = section.transcript_text,
        max_words = max_words,
    )
}

/// Summarize one section into slide-ready content.
///
/// A malformed response is fatal here — there is no meaningful fallback for
/// a missing summary.
pub async fn summarize_section(
    generator: &dyn TextGenerator,
    section: &Section,
    video_title: &str,
    total_sections: usize,
    max_words: usize,
) -> Result<SectionSummary> {
    let prompt = build_summary_prompt(section, video_title, total_sections, max_words);

    let raw = generator.generate_json(&prompt).await?;
    debug!("Summary response for section {}: {}", section.index, raw);

    let response: SummaryResponse = serde_json::from_str(clean_model_response(&raw))
        .map_err(|e| SlidesError::MalformedModelResponse(format!("summary JSON: {}", e)))?;

    Ok(SectionSummary {
        section: section.clone(),
        headline: response.headline,
        key_points: response.key_points,
        summary: response.summary,
        visual_suggestions: response.visual_suggestions.into_string(),
    })
}
