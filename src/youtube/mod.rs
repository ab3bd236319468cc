/// YouTube-facing clients: URL parsing, metadata, transcript
pub mod metadata;
pub mod transcript;
pub mod url;

pub use metadata::MetadataClient;
pub use transcript::TranscriptClient;
pub use url::extract_video_id;
