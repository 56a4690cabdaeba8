use std::fs;
use std::future::Future;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::channel::oneshot;
use image::RgbaImage;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::MediaError;
use crate::url::MediaLocation;
use crate::video::{VideoBackend, VideoElement, VideoOptions, VideoReadiness};
use crate::MediaSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSourceConfig {
    /// Whole-request HTTP timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub video: VideoOptions,
}

impl Default for MediaSourceConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: None,
            video: VideoOptions::default(),
        }
    }
}

/// Media source backed by HTTP(S) downloads and the local filesystem.
///
/// Each image load runs on its own worker thread and hands the decoded surface
/// back through a oneshot channel, so awaiting it never blocks the caller's
/// executor. Videos are delegated to an optional [`VideoBackend`].
#[derive(Clone)]
pub struct HttpMediaSource {
    http: Client,
    config: MediaSourceConfig,
    video_backend: Option<Arc<dyn VideoBackend>>,
}

impl HttpMediaSource {
    pub fn new(config: MediaSourceConfig) -> Result<Self, MediaError> {
        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder.build().map_err(|source| MediaError::Fetch {
            url: "<http client>".into(),
            source,
        })?;
        Ok(Self {
            http,
            config,
            video_backend: None,
        })
    }

    pub fn with_video_backend(mut self, backend: Arc<dyn VideoBackend>) -> Self {
        self.video_backend = Some(backend);
        self
    }

    pub fn config(&self) -> &MediaSourceConfig {
        &self.config
    }
}

impl std::fmt::Debug for HttpMediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMediaSource")
            .field("config", &self.config)
            .field("video_backend", &self.video_backend.is_some())
            .finish()
    }
}

impl MediaSource for HttpMediaSource {
    fn load_image(&self, url: &str) -> impl Future<Output = Result<RgbaImage, MediaError>> + Send {
        let (sender, receiver) = oneshot::channel();
        let http = self.http.clone();
        let owned_url = url.to_string();
        let worker_url = owned_url.clone();
        let spawned = thread::Builder::new()
            .name("media-fetch".into())
            .spawn(move || {
                let _ = sender.send(fetch_image(&http, &worker_url));
            });

        async move {
            if let Err(source) = spawned {
                return Err(MediaError::Io {
                    url: owned_url,
                    source,
                });
            }
            match receiver.await {
                Ok(result) => result,
                Err(_) => Err(MediaError::WorkerLost { url: owned_url }),
            }
        }
    }

    fn open_video(
        &self,
        url: &str,
        readiness: Arc<VideoReadiness>,
    ) -> Result<Arc<dyn VideoElement>, MediaError> {
        match &self.video_backend {
            Some(backend) => backend.open(url, self.config.video, readiness),
            None => Err(MediaError::Playback {
                url: url.to_string(),
                reason: "no video backend configured".into(),
            }),
        }
    }
}

fn fetch_image(http: &Client, url: &str) -> Result<RgbaImage, MediaError> {
    let bytes = fetch_bytes(http, url)?;
    let image = image::load_from_memory(&bytes).map_err(|source| MediaError::Decode {
        url: url.to_string(),
        source,
    })?;
    let rgba = image.to_rgba8();
    debug!(
        url,
        width = rgba.width(),
        height = rgba.height(),
        "decoded image"
    );
    Ok(rgba)
}

fn fetch_bytes(http: &Client, url: &str) -> Result<Vec<u8>, MediaError> {
    match MediaLocation::parse(url).map_err(MediaError::Location)? {
        MediaLocation::Remote(remote) => {
            debug!(%remote, "downloading media");
            let fetch_error = |source| MediaError::Fetch {
                url: url.to_string(),
                source,
            };
            let response = http
                .get(remote)
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(fetch_error)?;
            let bytes = response.bytes().map_err(fetch_error)?;
            Ok(bytes.to_vec())
        }
        MediaLocation::Local(path) => {
            debug!(path = %path.display(), "reading media from disk");
            fs::read(&path).map_err(|source| MediaError::Io {
                url: url.to_string(),
                source,
            })
        }
    }
}
