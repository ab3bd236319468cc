use crate::models::{Section, TranscriptSnippet};
use crate::sections::chapters::collect_window_text;

/// Fallback partition of the transcript into fixed-duration windows.
///
/// Windows are applied greedily from 0 until the duration is covered, with
/// the final window clipped to the video duration. Windows whose transcript
/// text is empty are dropped and do not consume an index, so the surviving
/// sections carry dense 1..N indices. Cannot fail: a transcript with no
/// matching snippets simply yields an empty list.
pub fn split_by_time(
    transcript: &[TranscriptSnippet],
    video_duration_seconds: u64,
    interval_seconds: u64,
) -> Vec<Section> {
    let duration = video_duration_seconds as f64;
    let interval = interval_seconds as f64;

    let mut sections = Vec::new();
    let mut start = 0.0;
    let mut index = 1;

    while start < duration {
        let end = (start + interval).min(duration);
        let text = collect_window_text(transcript, start, end);
        if !text.trim().is_empty() {
            sections.push(Section {
                index,
                title: format!("Part {}", index),
                start_seconds: start,
                end_seconds: end,
                transcript_text: text,
            });
            index += 1;
        }
        start = end;
    }

    sections
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
    fn test_covers_duration_without_gaps() {
        let transcript: Vec<_> = (0..60).map(|i| snippet("word", i as f64 * 10.0)).collect();
        let sections = split_by_time(&transcript, 600, 180);

        assert_eq!(sections.len(), 4); // ceil(600 / 180)
        assert_eq!(sections[0].start_seconds, 0.0);
        for pair in sections.windows(2) {
            assert_eq!(pair[0].end_seconds, pair[1].start_seconds);
        }
        assert_eq!(sections.last().unwrap().end_seconds, 600.0);
    }

    #[test]
    fn test_final_window_clipped_to_duration() {
        let transcript = vec![snippet("a", 10.0), snippet("b", 200.0), snippet("c", 390.0)];
        let sections = split_by_time(&transcript, 400, 180);

        assert_eq!(sections.last().unwrap().end_seconds, 400.0);
        assert_eq!(
            sections.last().unwrap().end_seconds - sections.last().unwrap().start_seconds,
            40.0
        );
    }

    #[test]
    fn test_empty_windows_dropped_and_renumbered() {
        // Nothing spoken between 180 and 360
        let transcript = vec![snippet("early", 10.0), snippet("late", 400.0)];
        let sections = split_by_time(&transcript, 540, 180);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].index, 1);
        assert_eq!(sections[0].start_seconds, 0.0);
        assert_eq!(sections[1].index, 2);
        assert_eq!(sections[1].start_seconds, 360.0);
    }

    #[test]
    fn test_whitespace_only_window_dropped() {
        let transcript = vec![snippet("  ", 10.0), snippet("real", 200.0)];
        let sections = split_by_time(&transcript, 360, 180);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].index, 1);
        assert_eq!(sections[0].transcript_text, "real");
    }

    #[test]
    fn test_empty_transcript_yields_no_sections() {
        let sections = split_by_time(&[], 600, 180);
        assert!(sections.is_empty());
    }

    #[test]
    fn test_titles_follow_surviving_index() {
        let transcript = vec![snippet("a", 10.0), snippet("b", 400.0)];
        let sections = split_by_time(&transcript, 540, 180);
        assert_eq!(sections[0].title, "Part 1");
        assert_eq!(sections[1].title, "Part 2");
    }
}
