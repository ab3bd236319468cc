use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the YouTube-to-Slides pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API credentials and model names
    pub api: ApiConfig,

    /// Section detection settings
    pub sections: SectionConfig,

    /// Image generation settings
    pub image: ImageConfig,

    /// Retry and pacing settings for model calls
    pub retry: RetryConfig,

    /// Output and storage settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Gemini API key (also settable via GEMINI_API_KEY)
    pub gemini_api_key: String,

    /// YouTube Data API v3 key (also settable via YOUTUBE_API_KEY)
    pub youtube_api_key: String,

    /// Text generation model
    pub text_model: String,

    /// Image generation model
    pub image_model: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Maximum slides in the final deck (0 = unlimited)
    pub max_sections: usize,

    /// Window width for the time-based fallback split (seconds)
    pub time_split_interval_seconds: u64,

    /// Preferred transcript language
    pub transcript_language: String,

    /// Word budget per infographic summary
    pub max_words_per_infographic: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Aspect ratio passed to the image model (16:9, 4:3, 1:1, 9:16)
    pub aspect_ratio: String,

    /// Image file extension for saved slides
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Additional attempts after a rate-limit error
    pub rate_limit_max_retries: u32,

    /// Wait when the error does not suggest a retry delay (seconds)
    pub rate_limit_default_wait_seconds: u64,

    /// Additional attempts after a transient image generation failure
    pub image_max_retries: u32,

    /// Base delay for exponential backoff (seconds, doubles each attempt)
    pub backoff_base_seconds: f64,

    /// Unconditional delay between consecutive model calls (seconds)
    pub pacing_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base output directory; slides land in {base_dir}/{video_id}/
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                gemini_api_key: String::new(),
                youtube_api_key: String::new(),
                text_model: "gemini-2.5-flash".to_string(),
                image_model: "gemini-2.5-flash-image".to_string(),
                timeout_seconds: 120,
            },
            sections: SectionConfig {
                max_sections: 0,
                time_split_interval_seconds: 180,
                transcript_language: "en".to_string(),
                max_words_per_infographic: 350,
            },
            image: ImageConfig {
                aspect_ratio: "16:9".to_string(),
                format: "png".to_string(),
            },
            retry: RetryConfig {
                rate_limit_max_retries: 3,
                rate_limit_default_wait_seconds: 60,
                image_max_retries: 2,
                backoff_base_seconds: 2.0,
                pacing_seconds: 13,
            },
            output: OutputConfig {
                base_dir: PathBuf::from("./output"),
            },
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to env-seeded defaults
    pub fn load() -> Result<Self> {
        let config_paths = [
            "yt-slides.toml",
            "config/yt-slides.toml",
            "~/.config/yt-slides/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env_overrides();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Build configuration from defaults plus environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.api.gemini_api_key = key;
        }

        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            self.api.youtube_api_key = key;
        }

        if let Ok(max) = std::env::var("YTSLIDES_MAX_SECTIONS") {
            if let Ok(max) = max.parse() {
                self.sections.max_sections = max;
            }
        }

        if let Ok(dir) = std::env::var("YTSLIDES_OUTPUT_DIR") {
            self.output.base_dir = PathBuf::from(dir);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.gemini_api_key.is_empty() {
            return Err(anyhow!(
                "Gemini API key is required (set GEMINI_API_KEY or api.gemini_api_key)"
            ));
        }

        if self.sections.time_split_interval_seconds == 0 {
            return Err(anyhow!("time_split_interval_seconds must be greater than 0"));
        }

        match self.image.aspect_ratio.as_str() {
            "16:9" | "4:3" | "1:1" | "9:16" => {}
            other => return Err(anyhow!("Unsupported aspect ratio: {}", other)),
        }

        if self.retry.backoff_base_seconds <= 0.0 {
            return Err(anyhow!("backoff_base_seconds must be positive"));
        }

        Ok(())
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_gemini_key(mut self, key: String) -> Self {
        self.config.api.gemini_api_key = key;
        self
    }

    pub fn with_youtube_key(mut self, key: String) -> Self {
        self.config.api.youtube_api_key = key;
        self
    }

    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.config.sections.max_sections = max;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: String) -> Self {
        self.config.image.aspect_ratio = ratio;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.base_dir = dir;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sections.time_split_interval_seconds, 180);
        assert_eq!(config.retry.rate_limit_max_retries, 3);
        assert_eq!(config.retry.pacing_seconds, 13);
        assert_eq!(config.image.aspect_ratio, "16:9");
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_gemini_key("test-key".to_string())
            .with_max_sections(5)
            .with_aspect_ratio("1:1".to_string())
            .build();

        assert_eq!(config.api.gemini_api_key, "test-key");
        assert_eq!(config.sections.max_sections, 5);
        assert_eq!(config.image.aspect_ratio, "1:1");
    }

    #[test]
    fn test_validation_requires_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = ConfigBuilder::new()
            .with_gemini_key("key".to_string())
            .build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_aspect_ratio() {
        let mut config = ConfigBuilder::new()
            .with_gemini_key("key".to_string())
            .build();
        config.image.aspect_ratio = "21:9".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            parsed.sections.max_words_per_infographic,
            config.sections.max_words_per_infographic
        );
        assert_eq!(parsed.retry.image_max_retries, config.retry.image_max_retries);
    }
}
