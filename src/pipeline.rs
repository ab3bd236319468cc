use anyhow::Result;
use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::ai::prompt_builder::build_infographic_prompt;
use crate::ai::summarizer::summarize_section;
use crate::ai::GeminiClient;
use crate::config::Config;
use crate::image::generate_infographic;
use crate::models::{SectionSummary, SlideResult};
use crate::retry::{with_rate_limit_retry, BackoffPolicy, Pacer, RateLimitPolicy};
use crate::sections::SectionDetector;
use crate::youtube::{extract_video_id, MetadataClient, TranscriptClient};

/// Run record persisted once per completed run as metadata.json
#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub video_id: String,
    pub video_title: String,
    pub video_url: String,
    pub channel: String,
    /// UTC ISO-8601 timestamp
    pub generated_at: String,
    pub style: String,
    pub sections: Vec<RunRecordSection>,
}

#[derive(Debug, Serialize)]
pub struct RunRecordSection {
    pub index: usize,
    pub title: String,
    pub image_file: String,
}

/// Sequential YouTube-to-Slides pipeline.
///
/// Sections are summarized and rendered one at a time in order; a pacing
/// delay separates consecutive model calls and every call runs under the
/// rate-limit retry wrapper. Any unrecovered error aborts the whole run —
/// a partial deck is never reported as success.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self, url: &str, style: &str, dry_run: bool) -> Result<Vec<SlideResult>> {
        let rate_policy = RateLimitPolicy::from_config(&self.config.retry);
        let backoff_policy = BackoffPolicy::from_config(&self.config.retry);
        let pacer = Pacer::from_config(&self.config.retry);

        // Step 1: resolve the video
        let video_id = extract_video_id(url)?;
        info!("🎬 Video ID: {}", video_id);

        // Step 2: metadata
        let metadata_client = MetadataClient::new(&self.config.api)?;
        let metadata = metadata_client.fetch(&video_id).await?;
        info!("📺 Title: {}", metadata.title);
        info!(
            "⏱️ Duration: {}m {}s",
            metadata.duration_seconds / 60,
            metadata.duration_seconds % 60
        );

        // Step 3: transcript
        let transcript_client = TranscriptClient::new(&self.config.api)?;
        let transcript = transcript_client
            .fetch(&video_id, &self.config.sections.transcript_language)
            .await?;
        info!("📝 Transcript: {} snippets", transcript.len());

        // Step 4: sections
        let gemini = GeminiClient::new(&self.config.api)?;
        let detector =
            SectionDetector::new(&gemini, &self.config.sections, rate_policy.clone());
        let sections = detector.detect(&metadata, &transcript).await?;
        info!("📑 Sections: {}", sections.len());
        for section in &sections {
            let m = section.start_seconds as u64 / 60;
            let s = section.start_seconds as u64 % 60;
            info!("    [{}:{:02}] {}", m, s, section.title);
        }

        // Step 5: summaries, one section at a time
        let mut summaries: Vec<SectionSummary> = Vec::with_capacity(sections.len());
        let total_sections = sections.len();
        let video_title = metadata.title.as_str();
        let max_words = self.config.sections.max_words_per_infographic;
        for (i, section) in sections.iter().enumerate() {
            let generator = &gemini;
            let summary = with_rate_limit_retry(&rate_policy, move || {
                summarize_section(generator, section, video_title, total_sections, max_words)
            })
            .await?;
            info!(
                "✍️ Summarized ({}/{}): {}",
                i + 1,
                sections.len(),
                section.title
            );
            summaries.push(summary);
            if i < sections.len() - 1 {
                pacer.pace().await;
            }
        }

        // Step 6: prompts
        let prompts: Vec<String> = summaries
            .iter()
            .map(|summary| {
                build_infographic_prompt(
                    summary,
                    &metadata.title,
                    sections.len(),
                    style,
                    &self.config.image.aspect_ratio,
                )
            })
            .collect();

        // Step 7: slides
        let output_dir = self.config.output.base_dir.join(&video_id);
        tokio::fs::create_dir_all(&output_dir).await?;

        let mut results: Vec<SlideResult> = Vec::with_capacity(sections.len());
        for (i, (section, prompt)) in sections.iter().zip(prompts.iter()).enumerate() {
            let filename = format!(
                "{:02}_{}.{}",
                i + 1,
                slugify(&section.title),
                self.config.image.format
            );
            let output_path = output_dir.join(&filename);

            if dry_run {
                log_prompt_preview(i + 1, sections.len(), &section.title, prompt);
            } else {
                info!(
                    "🎨 Generating slide {}/{}: {}",
                    i + 1,
                    sections.len(),
                    section.title
                );
                let model = &gemini;
                let path = &output_path;
                let aspect_ratio = self.config.image.aspect_ratio.as_str();
                let backoff = &backoff_policy;
                with_rate_limit_retry(&rate_policy, move || {
                    generate_infographic(model, prompt, path, aspect_ratio, backoff)
                })
                .await?;
                if i < sections.len() - 1 {
                    pacer.pace().await;
                }
            }

            results.push(SlideResult {
                section_index: section.index,
                section_title: section.title.clone(),
                image_path: output_path,
                prompt_used: prompt.clone(),
            });
        }

        // Step 8: run record
        let record = RunRecord {
            video_id: video_id.clone(),
            video_title: metadata.title.clone(),
            video_url: url.to_string(),
            channel: metadata.channel_title.clone(),
            generated_at: Utc::now().to_rfc3339(),
            style: style.to_string(),
            sections: results
                .iter()
                .map(|r| RunRecordSection {
                    index: r.section_index,
                    title: r.section_title.clone(),
                    image_file: r
                        .image_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                })
                .collect(),
        };
        let record_path = output_dir.join("metadata.json");
        write_run_record(&record_path, &record).await?;
        info!("💾 Run record saved to {}", record_path.display());

        Ok(results)
    }
}

/// Emit the full prompt for one slide when no image is generated
fn log_prompt_preview(slide_number: usize, total: usize, section_title: &str, prompt: &str) {
    info!("🔍 Slide {}/{}: {}", slide_number, total, section_title);
    info!("📝 Prompt:\n{}", prompt);
}

/// Write the run record once, pretty-printed
pub async fn write_run_record(path: &Path, record: &RunRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Convert a section title to a filename-safe slug, truncated to 50 chars
fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = Regex::new(r"[^\w\s-]")
        .expect("slug strip regex is valid")
        .replace_all(lowered.trim(), "");
    let slug = Regex::new(r"[\s_-]+")
        .expect("slug collapse regex is valid")
        .replace_all(&stripped, "_")
        .into_owned();
    slug.chars().take(50).collect()
}

/// Output directory for a given video under the configured base
pub fn output_dir_for(base_dir: &Path, video_id: &str) -> PathBuf {
    base_dir.join(video_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output for assertions
    #[derive(Clone)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = SharedBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_prompt_preview_emits_full_prompt_text() {
        let buffer = SharedBuffer::new();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            log_prompt_preview(2, 5, "The Middle", "=== ART DIRECTION ===\nsepia ink sketches");
        });

        let output = buffer.contents();
        assert!(output.contains("Slide 2/5: The Middle"));
        assert!(output.contains("=== ART DIRECTION ==="));
        assert!(output.contains("sepia ink sketches"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello_world");
        assert_eq!(slugify("  What's New in 2024?!  "), "whats_new_in_2024");
        assert_eq!(slugify("a - b -- c"), "a_b_c");

        let long = "x".repeat(80);
        assert_eq!(slugify(&long).len(), 50);
    }

    #[test]
    fn test_output_dir_for() {
        let dir = output_dir_for(Path::new("./output"), "dQw4w9WgXcQ");
        assert_eq!(dir, PathBuf::from("./output/dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn test_run_record_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");

        let record = RunRecord {
            video_id: "dQw4w9WgXcQ".to_string(),
            video_title: "Video".to_string(),
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            channel: "Channel".to_string(),
            generated_at: "2024-06-01T00:00:00+00:00".to_string(),
            style: "davinci".to_string(),
            sections: vec![RunRecordSection {
                index: 1,
                title: "Intro".to_string(),
                image_file: "01_intro.png".to_string(),
            }],
        };

        write_run_record(&path, &record).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["video_id"], "dQw4w9WgXcQ");
        assert_eq!(written["style"], "davinci");
        assert_eq!(written["sections"][0]["image_file"], "01_intro.png");
        assert_eq!(written["sections"][0]["index"], 1);
    }
}
