use mediasource::MediaError;
use thiserror::Error;

/// Failures surfaced by [`TextureResource::load`](crate::TextureResource::load).
///
/// Every variant except `MissingUrl` names the offending URL. Nothing is
/// retried; once the placeholder has been uploaded it stays bound and usable.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("missing url, please pass the url of the texture to load")]
    MissingUrl,

    #[error("unsupported texture source '{url}'; expected an image (jpg, jpeg, png, gif, bmp) or a video (mp4, 3gp, webm, ogv)")]
    UnsupportedFormat { url: String },

    #[error("failed loading image '{url}'")]
    DecodeFailure {
        url: String,
        #[source]
        source: MediaError,
    },

    #[error("failed starting video playback for '{url}'")]
    PlaybackFailure {
        url: String,
        #[source]
        source: MediaError,
    },

    #[error("GPU context refused to create a texture object")]
    CreateTextureFailed,

    #[error("GPU context rejected the {width}x{height} upload for '{url}'")]
    UploadRejected { url: String, width: u32, height: u32 },
}

/// Invalid wrap or filter value supplied by name or raw GL number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("unknown wrap mode '{0}'")]
    UnknownWrap(String),

    #[error("unknown filter mode '{0}'")]
    UnknownFilter(String),
}
