use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid media location: {0}")]
    Location(String),

    #[error("failed fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed reading {url}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed decoding {url}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("video playback failed for {url}: {reason}")]
    Playback { url: String, reason: String },

    #[error("media worker for {url} stopped before delivering a result")]
    WorkerLost { url: String },
}
