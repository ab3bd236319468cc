use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ImageModel, TextGenerator};
use crate::config::ApiConfig;
use crate::error::SlidesError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client implementing both the text and image capabilities
pub struct GeminiClient {
    api_key: String,
    text_model: String,
    image_model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    /// Base64-encoded payload
    data: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        if config.gemini_api_key.is_empty() {
            return Err(anyhow!("Gemini API key required"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            client,
        })
    }

    async fn generate_content(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
        let url = format!("{}/{}:generateContent?key={}", API_BASE, model, self.api_key);

        debug!("Sending request to Gemini model {}", model);

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS || text.contains("RESOURCE_EXHAUSTED") {
                return Err(SlidesError::RateLimited(format!("{}: {}", status, text)).into());
            }
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.3,
                response_mime_type: Some("application/json".to_string()),
                response_modalities: None,
            },
        };

        let response = self.generate_content(&self.text_model, &request).await?;

        response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.clone())
            .ok_or_else(|| anyhow!("No text in Gemini response"))
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate_image(&self, prompt: &str, aspect_ratio: &str) -> Result<Option<Vec<u8>>> {
        let full_prompt = format!(
            "{}\n\nGenerate this as an image with {} aspect ratio.",
            prompt, aspect_ratio
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(full_prompt),
                    inline_data: None,
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.3,
                response_mime_type: None,
                response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
            },
        };

        let response = self.generate_content(&self.image_model, &request).await?;

        let inline = response
            .candidates
            .first()
            .into_iter()
            .flat_map(|c| c.content.parts.iter())
            .find_map(|p| p.inline_data.as_ref());

        match inline {
            Some(data) => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(&data.data)
                    .map_err(|e| anyhow!("Invalid base64 image payload: {}", e))?;
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }
}
