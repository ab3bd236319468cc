use anyhow::Result;
use regex::Regex;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::RetryConfig;
use crate::error::SlidesError;

/// Retry policy for rate-limited model calls.
///
/// Only failures that look like quota exhaustion are retried; anything else
/// is returned to the caller immediately without consuming an attempt.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Additional attempts beyond the first call
    pub max_retries: u32,
    /// Wait used when the error does not suggest a delay
    pub default_wait: Duration,
    /// Safety margin added on top of a suggested delay
    pub margin: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            default_wait: Duration::from_secs(60),
            margin: Duration::from_secs(5),
        }
    }
}

impl RateLimitPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.rate_limit_max_retries,
            default_wait: Duration::from_secs(config.rate_limit_default_wait_seconds),
            margin: Duration::from_secs(5),
        }
    }
}

/// Exponential backoff policy for transient failures (image generation)
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Additional attempts beyond the first call
    pub max_retries: u32,
    /// Base delay, doubled after each failed attempt
    pub base_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl BackoffPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.image_max_retries,
            base_delay: Duration::from_secs_f64(config.backoff_base_seconds),
        }
    }
}

/// Whether an error carries a rate-limit / quota-exhaustion signature.
///
/// The Gemini SDK surfaces quota failures as HTTP 429 responses with
/// RESOURCE_EXHAUSTED status text, so detection is by error-text signature
/// rather than a typed status code.
pub fn is_rate_limit_error(error: &anyhow::Error) -> bool {
    if let Some(SlidesError::RateLimited(_)) = error.downcast_ref::<SlidesError>() {
        return true;
    }
    let text = format!("{:#}", error);
    text.contains("429") || text.contains("RESOURCE_EXHAUSTED")
}

/// Extract a suggested retry delay from the error detail, if present
fn suggested_wait(error: &anyhow::Error) -> Option<Duration> {
    let text = format!("{:#}", error);

    // "Please retry in 12 seconds" style
    let re = Regex::new(r"(?i)retry in (\d+)").expect("retry hint regex is valid");
    if let Some(caps) = re.captures(&text) {
        if let Ok(secs) = caps[1].parse::<u64>() {
            return Some(Duration::from_secs(secs));
        }
    }

    // structured retryDelay field, e.g. "retryDelay": "12s"
    let re = Regex::new(r#"retryDelay"?\s*:\s*"?(\d+)s"#).expect("retry delay regex is valid");
    if let Some(caps) = re.captures(&text) {
        if let Ok(secs) = caps[1].parse::<u64>() {
            return Some(Duration::from_secs(secs));
        }
    }

    None
}

/// Execute `op` with bounded wait-and-retry on rate-limit errors.
///
/// Each retry is a full re-invocation with identical inputs; non-rate-limit
/// errors are returned immediately.
pub async fn with_rate_limit_retry<T, F, Fut>(policy: &RateLimitPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !is_rate_limit_error(&e) || attempt >= policy.max_retries {
                    return Err(e);
                }
                let wait = suggested_wait(&e)
                    .map(|d| d + policy.margin)
                    .unwrap_or(policy.default_wait);
                warn!(
                    "⏳ Rate limited (attempt {}/{}), waiting {}s before retry",
                    attempt + 1,
                    policy.max_retries,
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}

/// Execute `op` with exponential backoff on any failure.
///
/// Exhausting the retries yields a distinguished `GenerationFailed` error
/// wrapping the last underlying cause.
pub async fn with_backoff<T, F, Fut>(policy: &BackoffPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;
    for attempt in 0..=policy.max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_error = Some(e);
                if attempt < policy.max_retries {
                    let delay = policy.base_delay * 2u32.pow(attempt);
                    warn!(
                        "🔁 Attempt {}/{} failed, backing off {:.1}s",
                        attempt + 1,
                        policy.max_retries + 1,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(SlidesError::GenerationFailed {
        attempts: policy.max_retries + 1,
        source: last_error.unwrap_or_else(|| anyhow::anyhow!("unknown failure")),
    }
    .into())
}

/// Unconditional pacing between consecutive model calls.
///
/// Keeps the inter-call delay out of the section/summarization logic: the
/// pipeline calls `pace()` between loop items and skips it after the last.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(Duration::from_secs(config.pacing_seconds))
    }

    /// Sleep for the configured inter-call delay
    pub async fn pace(&self) {
        if !self.delay.is_zero() {
            info!("⏲️ Pacing {}s before next model call", self.delay.as_secs());
            tokio::time::sleep(self.delay).await;
        }
    }
}
