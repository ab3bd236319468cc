use regex::Regex;

use crate::models::{Chapter, Section, TranscriptSnippet};

/// Earliest allowed start for the first chapter (seconds). Descriptions
/// listing timestamps that begin later are link dumps, not chapter lists.
const MAX_FIRST_CHAPTER_START: f64 = 5.0;

/// Minimum number of timestamp lines for a description to count as chaptered
const MIN_CHAPTERS: usize = 3;

/// Convert "1:23:45" or "23:45" to seconds
fn timestamp_to_seconds(ts: &str) -> f64 {
    let parts: Vec<&str> = ts.split(':').collect();
    let as_u64 = |s: &str| s.parse::<u64>().unwrap_or(0);
    match parts.as_slice() {
        [h, m, s] => (as_u64(h) * 3600 + as_u64(m) * 60 + as_u64(s)) as f64,
        [m, s] => (as_u64(m) * 60 + as_u64(s)) as f64,
        _ => 0.0,
    }
}

/// Extract chapters from a video description.
///
/// Matches lines like "0:00 Introduction", "0:00 - Introduction" or
/// "(0:00) Introduction", in order of appearance (not re-sorted). Returns
/// `None` unless at least three lines match and the first timestamp is at
/// or near the video start.
pub fn parse_chapters_from_description(
    description: &str,
    video_duration_seconds: u64,
) -> Option<Vec<Chapter>> {
    let pattern = Regex::new(r"^\s*\(?(\d{1,2}:\d{2}(?::\d{2})?)\)?\s*[-–—:]?\s*(.+)$")
        .expect("chapter line regex is valid");

    let mut raw: Vec<(String, f64)> = Vec::new();
    for line in description.lines() {
        if let Some(caps) = pattern.captures(line) {
            let start = timestamp_to_seconds(&caps[1]);
            let title = caps[2].trim().to_string();
            raw.push((title, start));
        }
    }

    if raw.len() < MIN_CHAPTERS {
        return None;
    }

    // First chapter must start at or very near 0:00
    if raw[0].1 > MAX_FIRST_CHAPTER_START {
        return None;
    }

    let chapters = raw
        .iter()
        .enumerate()
        .map(|(i, (title, start))| {
            let end = raw
                .get(i + 1)
                .map(|(_, next_start)| *next_start)
                .unwrap_or(video_duration_seconds as f64);
            Chapter {
                title: title.clone(),
                start_seconds: *start,
                end_seconds: end,
            }
        })
        .collect();

    Some(chapters)
}

/// Map transcript snippets into chapter-defined sections.
///
/// Chapter-derived sections are kept even when no snippet falls inside
/// them; an empty slide is better than silently dropping an
/// author-declared chapter.
pub fn assign_transcript_to_sections(
    chapters: &[Chapter],
    transcript: &[TranscriptSnippet],
) -> Vec<Section> {
    chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| Section {
            index: i + 1,
            title: chapter.title.clone(),
            start_seconds: chapter.start_seconds,
            end_seconds: chapter.end_seconds,
            transcript_text: collect_window_text(
                transcript,
                chapter.start_seconds,
                chapter.end_seconds,
            ),
        })
        .collect()
}

/// Space-joined text of every snippet whose start falls in [start, end)
pub fn collect_window_text(transcript: &[TranscriptSnippet], start: f64, end: f64) -> String {
    transcript
        .iter()
        .filter(|s| s.start >= start && s.start < end)
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(text: &str, start: f64) -> TranscriptSnippet {
        TranscriptSnippet {
            text: text.to_string(),
            start,
            duration: 2.0,
        }
    }

    #[test]
    fn test_timestamp_to_seconds() {
        assert_eq!(timestamp_to_seconds("0:00"), 0.0);
        assert_eq!(timestamp_to_seconds("2:30"), 150.0);
        assert_eq!(timestamp_to_seconds("1:23:45"), 5025.0);
        assert_eq!(timestamp_to_seconds("12:05"), 725.0);
    }

    #[test]
    fn test_basic_chapter_list() {
        let description = "0:00 Intro\n2:30 Body\n9:00 Outro";
        let chapters = parse_chapters_from_description(description, 600).unwrap();

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].title, "Intro");
        assert_eq!(chapters[0].start_seconds, 0.0);
        assert_eq!(chapters[0].end_seconds, 150.0);
        assert_eq!(chapters[1].title, "Body");
        assert_eq!(chapters[1].start_seconds, 150.0);
        assert_eq!(chapters[1].end_seconds, 540.0);
        assert_eq!(chapters[2].title, "Outro");
        assert_eq!(chapters[2].start_seconds, 540.0);
        assert_eq!(chapters[2].end_seconds, 600.0);
    }

    #[test]
    fn test_chapters_are_contiguous_and_end_at_duration() {
        let description = "(0:00) Welcome\n(1:00) - First topic\n(5:30): Second topic\n(10:00) Wrap up";
        let chapters = parse_chapters_from_description(description, 720).unwrap();

        assert_eq!(chapters.len(), 4);
        for pair in chapters.windows(2) {
            assert_eq!(pair[0].end_seconds, pair[1].start_seconds);
        }
        assert_eq!(chapters.last().unwrap().end_seconds, 720.0);
    }

    #[test]
    fn test_fewer_than_three_matches_is_no_chapters() {
        let description = "0:00 Intro\n5:00 Outro";
        assert!(parse_chapters_from_description(description, 600).is_none());
    }

    #[test]
    fn test_first_timestamp_past_five_seconds_is_no_chapters() {
        let description = "0:10 Intro\n2:30 Body\n9:00 Outro";
        assert!(parse_chapters_from_description(description, 600).is_none());
    }

    #[test]
    fn test_chapter_lines_mixed_with_prose() {
        let description = "Check out my course!\n\n0:00 Intro\nSome link: https://example.com\n2:30 Main part\n9:00 Conclusion\n\nThanks for watching";
        let chapters = parse_chapters_from_description(description, 600).unwrap();
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[1].title, "Main part");
    }

    #[test]
    fn test_order_of_appearance_governs_order() {
        // Timestamps are not re-sorted; description order wins
        let description = "0:00 Intro\n5:00 Later\n2:30 Earlier\n9:00 End";
        let chapters = parse_chapters_from_description(description, 600).unwrap();
        assert_eq!(chapters[1].title, "Later");
        assert_eq!(chapters[2].title, "Earlier");
    }

    #[test]
    fn test_assignment_splits_transcript() {
        let chapters = vec![
            Chapter {
                title: "Intro".to_string(),
                start_seconds: 0.0,
                end_seconds: 60.0,
            },
            Chapter {
                title: "Body".to_string(),
                start_seconds: 60.0,
                end_seconds: 120.0,
            },
        ];
        let transcript = vec![
            snippet("hello", 0.0),
            snippet("world", 30.0),
            snippet("second", 60.0),
            snippet("part", 90.0),
        ];

        let sections = assign_transcript_to_sections(&chapters, &transcript);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].index, 1);
        assert_eq!(sections[0].transcript_text, "hello world");
        assert_eq!(sections[1].index, 2);
        assert_eq!(sections[1].transcript_text, "second part");
    }

    #[test]
    fn test_empty_chapter_sections_are_kept() {
        let chapters = vec![
            Chapter {
                title: "Silent".to_string(),
                start_seconds: 0.0,
                end_seconds: 60.0,
            },
            Chapter {
                title: "Spoken".to_string(),
                start_seconds: 60.0,
                end_seconds: 120.0,
            },
        ];
        let transcript = vec![snippet("words", 70.0)];

        let sections = assign_transcript_to_sections(&chapters, &transcript);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].transcript_text, "");
        assert_eq!(sections[1].transcript_text, "words");
    }

    #[test]
    fn test_window_boundary_is_half_open() {
        let transcript = vec![snippet("at-start", 60.0), snippet("at-end", 120.0)];
        let text = collect_window_text(&transcript, 60.0, 120.0);
        assert_eq!(text, "at-start");
    }
}
