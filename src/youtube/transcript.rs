use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::SlidesError;
use crate::models::TranscriptSnippet;

const TIMEDTEXT_URL: &str = "https://video.google.com/timedtext";

/// Client for YouTube's timed-text caption tracks
pub struct TranscriptClient {
    client: reqwest::Client,
}

/// json3 timed-text document
#[derive(Debug, Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

impl TranscriptClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the timestamped transcript for a video.
    ///
    /// Tries the requested language first, then English. Raises
    /// `TranscriptUnavailable` when no caption track exists.
    pub async fn fetch(&self, video_id: &str, language: &str) -> Result<Vec<TranscriptSnippet>> {
        let mut languages = vec![language];
        if language != "en" {
            languages.push("en");
        }

        for lang in languages {
            debug!("Fetching {} transcript for video {}", lang, video_id);
            match self.fetch_track(video_id, lang).await {
                Ok(snippets) if !snippets.is_empty() => return Ok(snippets),
                Ok(_) => continue,
                Err(e) => {
                    debug!("Transcript fetch failed for {}: {:#}", lang, e);
                    continue;
                }
            }
        }

        Err(SlidesError::TranscriptUnavailable(video_id.to_string()).into())
    }

    async fn fetch_track(&self, video_id: &str, language: &str) -> Result<Vec<TranscriptSnippet>> {
        let response = self
            .client
            .get(TIMEDTEXT_URL)
            .query(&[("v", video_id), ("lang", language), ("fmt", "json3")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("timedtext error {}", response.status()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: TimedTextResponse = serde_json::from_str(&body)?;
        Ok(events_to_snippets(parsed))
    }
}

fn events_to_snippets(response: TimedTextResponse) -> Vec<TranscriptSnippet> {
    response
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs
                .iter()
                .map(|s| s.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ")
                .trim()
                .to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSnippet {
                text,
                start: event.start_ms as f64 / 1000.0,
                duration: event.duration_ms as f64 / 1000.0,
            })
        })
        .collect()
}
