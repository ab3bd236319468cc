use anyhow::{anyhow, Result};
use regex::Regex;
use url::Url;

fn is_video_id(candidate: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("video ID regex is valid");
    re.is_match(candidate)
}

/// Extract the video ID from a YouTube URL or a bare 11-character ID.
///
/// Supports watch URLs, youtu.be short links, /embed/ and /v/ paths.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let parsed = Url::parse(input)
        .map_err(|_| anyhow!("Could not parse URL: {}", input))?;

    let host = parsed.host_str().unwrap_or_default();

    if host == "youtu.be" {
        let id = parsed.path().trim_start_matches('/');
        if is_video_id(id) {
            return Ok(id.to_string());
        }
    }

    if matches!(host, "www.youtube.com" | "youtube.com" | "m.youtube.com") {
        if parsed.path() == "/watch" {
            if let Some((_, id)) = parsed.query_pairs().find(|(k, _)| k == "v") {
                if is_video_id(&id) {
                    return Ok(id.to_string());
                }
            }
        }

        for prefix in ["/embed/", "/v/"] {
            if let Some(rest) = parsed.path().strip_prefix(prefix) {
                let id = rest.split('/').next().unwrap_or_default();
                if is_video_id(id) {
                    return Ok(id.to_string());
                }
            }
        }
    }

    Err(anyhow!(
        "Could not extract video ID from: {} (expected youtube.com/watch?v=ID, youtu.be/ID, or a bare 11-char ID)",
        input
    ))
}
