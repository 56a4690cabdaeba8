//! Acquires decoded images and playing videos for texture uploads.
//!
//! Dispatch happens purely on the URL's file extension (`classify_url`):
//! images are fetched and decoded asynchronously into RGBA8 surfaces, videos
//! are opened through a [`VideoElement`] that reports its spin-up signals into
//! a shared [`VideoReadiness`] gate.
mod error;
mod fetch;
mod url;
mod video;

use std::future::Future;
use std::sync::Arc;

pub use error::MediaError;
pub use fetch::{HttpMediaSource, MediaSourceConfig};
pub use image::RgbaImage;
pub use url::{classify_url, MediaFormat, MediaLocation, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use video::{VideoBackend, VideoElement, VideoOptions, VideoReadiness, VideoSignal};

/// Boundary between the texture state machine and whatever produces pixels.
pub trait MediaSource {
    /// Fetches and decodes a still image. Fails with the URL on network
    /// errors, missing files, corrupt data or unsupported encodings.
    fn load_image(&self, url: &str) -> impl Future<Output = Result<RgbaImage, MediaError>> + Send;

    /// Creates a video element for `url` that reports into `readiness`.
    fn open_video(
        &self,
        url: &str,
        readiness: Arc<VideoReadiness>,
    ) -> Result<Arc<dyn VideoElement>, MediaError>;
}
