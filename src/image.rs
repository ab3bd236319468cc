use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::debug;

use crate::ai::ImageModel;
use crate::retry::{with_backoff, BackoffPolicy};

/// Render one infographic slide and save it to disk.
///
/// A response without an image part counts as a failure and is retried
/// with exponential backoff like any transport error; exhausting the
/// retries surfaces the distinguished generation-failed error from the
/// backoff wrapper.
pub async fn generate_infographic(
    model: &dyn ImageModel,
    prompt: &str,
    output_path: &Path,
    aspect_ratio: &str,
    policy: &BackoffPolicy,
) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = with_backoff(policy, || async move {
        match model.generate_image(prompt, aspect_ratio).await? {
            Some(bytes) => Ok(bytes),
            None => Err(anyhow!("no image data in response")),
        }
    })
    .await?;

    tokio::fs::write(output_path, &bytes).await?;
    debug!("Wrote {} bytes to {}", bytes.len(), output_path.display());

    Ok(())
}
