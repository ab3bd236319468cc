/// Model-facing capabilities and their Gemini implementation
///
/// The segmenter, consolidator and summarizer talk to a text model through
/// the `TextGenerator` trait; the slide renderer talks to an image model
/// through `ImageModel`. Both are implemented by `GeminiClient`.
pub mod gemini;
pub mod prompt_builder;
pub mod summarizer;

pub use gemini::GeminiClient;
pub use prompt_builder::build_infographic_prompt;

use anyhow::Result;
use async_trait::async_trait;

/// Text-generation capability returning a structured JSON document.
///
/// The caller owns JSON parsing and schema validation; implementations only
/// guarantee that a JSON response mime type was requested from the model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_json(&self, prompt: &str) -> Result<String>;
}

/// Image-generation capability.
///
/// Returns the raw image bytes, or `None` when the model answered without
/// producing an image part.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate_image(&self, prompt: &str, aspect_ratio: &str) -> Result<Option<Vec<u8>>>;
}
