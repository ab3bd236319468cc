use anyhow::{anyhow, Result};
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::SlidesError;
use crate::models::VideoMetadata;

const API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// YouTube Data API v3 client for video metadata
pub struct MetadataClient {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    /// ISO 8601 duration, e.g. "PT1H23M45S"
    duration: String,
}

/// Convert an ISO 8601 duration (PT1H23M45S) to total seconds
fn parse_iso8601_duration(duration: &str) -> u64 {
    let re = Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?")
        .expect("duration regex is valid");
    let Some(caps) = re.captures(duration) else {
        return 0;
    };
    let group = |i| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    group(1) * 3600 + group(2) * 60 + group(3)
}

impl MetadataClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        if config.youtube_api_key.is_empty() {
            return Err(anyhow!("YouTube API key required"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            api_key: config.youtube_api_key.clone(),
            client,
        })
    }

    /// Fetch metadata for a video, raising `VideoNotFound` when absent
    pub async fn fetch(&self, video_id: &str) -> Result<VideoMetadata> {
        debug!("Fetching metadata for video {}", video_id);

        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_id),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("YouTube API error {}: {}", status, text));
        }

        let videos: VideosResponse = response.json().await?;
        let item = videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| SlidesError::VideoNotFound(video_id.to_string()))?;

        Ok(VideoMetadata {
            video_id: video_id.to_string(),
            title: item.snippet.title,
            description: item.snippet.description,
            channel_title: item.snippet.channel_title,
            duration_seconds: parse_iso8601_duration(&item.content_details.duration),
            tags: item.snippet.tags,
        })
    }
}
