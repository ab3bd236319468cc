use thiserror::Error;

/// Distinguished failure kinds for the slides pipeline.
///
/// Most functions return `anyhow::Result`; these variants are attached where
/// a caller branches on the failure kind (fallback in the section detector,
/// rate-limit classification in the retry layer, exit reporting in the CLI).
#[derive(Debug, Error)]
pub enum SlidesError {
    /// The video ID does not exist or is not visible to the API key
    #[error("video not found: {0}")]
    VideoNotFound(String),

    /// No caption track is available for the video
    #[error("no transcript available for video: {0}")]
    TranscriptUnavailable(String),

    /// The text model returned output that does not match the requested schema
    #[error("malformed model response: {0}")]
    MalformedModelResponse(String),

    /// The service refused the request due to quota exhaustion
    #[error("rate limited by upstream service: {0}")]
    RateLimited(String),

    /// Image generation exhausted its retries
    #[error("image generation failed after {attempts} attempts: {source}")]
    GenerationFailed {
        attempts: u32,
        /// Last underlying failure, kept for diagnostics
        source: anyhow::Error,
    },

    /// The consolidator's grouping does not cover every original section
    /// index exactly once
    #[error("invalid section partition: {0}")]
    InvalidPartition(String),
}
