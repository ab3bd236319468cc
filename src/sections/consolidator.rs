use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

use crate::ai::TextGenerator;
use crate::error::SlidesError;
use crate::models::Section;
use crate::sections::segmenter::clean_model_response;

/// Structured grouping response requested from the text model
#[derive(Debug, Deserialize)]
struct ConsolidationResponse {
    groups: Vec<ProposedGroup>,
}

#[derive(Debug, Deserialize)]
struct ProposedGroup {
    title: String,
    section_indices: Vec<usize>,
}

fn format_section_line(section: &Section) -> String {
    let start_min = (section.start_seconds / 60.0) as u64;
    let start_sec = (section.start_seconds % 60.0) as u64;
    let duration_min = (section.duration_seconds() / 60.0) as u64;
    format!(
        "  {}. [{}:{:02}] {} ({}m)",
        section.index, start_min, start_sec, section.title, duration_min
    )
}

fn build_consolidation_prompt(
    sections: &[Section],
    target_count: usize,
    video_title: &str,
) -> String {
    let sections_desc = sections
        .iter()
        .map(format_section_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are re-packaging a {count}-section YouTube video into exactly {target} slides.

Video: {title}

Current sections:
{sections_desc}

Group these {count} sections into exactly {target} consolidated slides. Each slide should:
- Combine 1-4 related sections into a single coherent theme
- Have a new, compelling title that captures the combined content
- Cover the video from start to finish (no sections left out)

Return a JSON object with a "groups" array. Each group has:
- title: New slide title (3-8 words, compelling and descriptive)
- section_indices: Array of original section indices (1-based) to merge

Example: {{"groups": [{{"title": "Introduction & Background", "section_indices": [1, 2]}}, ...]}}

Rules:
- Exactly {target} groups
- Every section index from 1 to {count} must appear exactly once
- Keep indices in order within each group
- Group thematically related sections together"#,
        count = sections.len(),
        target = target_count,
        title = video_title,
        sections_desc = sections_desc,
    )
}

/// Check that the grouping is a complete ordered partition of 1..N.
///
/// Every original index must appear exactly once, the group count must equal
/// the target, and indices inside a group must be strictly increasing (the
/// merged section's time range is first member's start to last member's
/// end). No local repair: silently dropping or duplicating content would
/// corrupt the deck.
fn validate_partition(
    groups: &[ProposedGroup],
    original_count: usize,
    target_count: usize,
) -> Result<()> {
    if groups.len() != target_count {
        return Err(SlidesError::InvalidPartition(format!(
            "expected {} groups, got {}",
            target_count,
            groups.len()
        ))
        .into());
    }

    let mut seen = vec![false; original_count];
    for (g, group) in groups.iter().enumerate() {
        if group.section_indices.is_empty() {
            return Err(SlidesError::InvalidPartition(format!("group {} is empty", g + 1)).into());
        }
        let mut previous = 0usize;
        for &idx in &group.section_indices {
            if idx == 0 || idx > original_count {
                return Err(SlidesError::InvalidPartition(format!(
                    "index {} out of range 1..{}",
                    idx, original_count
                ))
                .into());
            }
            if seen[idx - 1] {
                return Err(
                    SlidesError::InvalidPartition(format!("index {} appears twice", idx)).into(),
                );
            }
            if idx <= previous {
                return Err(SlidesError::InvalidPartition(format!(
                    "group {} indices not in increasing order",
                    g + 1
                ))
                .into());
            }
            seen[idx - 1] = true;
            previous = idx;
        }
    }

    if let Some(missing) = seen.iter().position(|covered| !covered) {
        return Err(
            SlidesError::InvalidPartition(format!("index {} not covered", missing + 1)).into(),
        );
    }

    Ok(())
}

/// Merge an over-large section list down to `target_count` via thematic
/// grouping proposed by the text model.
///
/// Returns the input unchanged when it is already within the bound. The old
/// sections are discarded wholesale; the merged replacements carry fresh
/// dense 1..target indices. An incomplete or malformed partition is a hard
/// error surfaced to the caller.
pub async fn consolidate_sections(
    generator: &dyn TextGenerator,
    sections: Vec<Section>,
    target_count: usize,
    video_title: &str,
) -> Result<Vec<Section>> {
    if sections.len() <= target_count {
        return Ok(sections);
    }

    let prompt = build_consolidation_prompt(&sections, target_count, video_title);
    let raw = generator.generate_json(&prompt).await?;
    debug!("Consolidation response: {}", raw);

    let response: ConsolidationResponse = serde_json::from_str(clean_model_response(&raw))
        .map_err(|e| SlidesError::MalformedModelResponse(format!("consolidation JSON: {}", e)))?;

    validate_partition(&response.groups, sections.len(), target_count)?;

    let consolidated = response
        .groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let members: Vec<&Section> = group
                .section_indices
                .iter()
                .map(|&idx| &sections[idx - 1])
                .collect();
            Section {
                index: i + 1,
                title: group.title,
                start_seconds: members.first().map(|s| s.start_seconds).unwrap_or(0.0),
                end_seconds: members.last().map(|s| s.end_seconds).unwrap_or(0.0),
                transcript_text: members
                    .iter()
                    .map(|s| s.transcript_text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            }
        })
        .collect();

    Ok(consolidated)
}
