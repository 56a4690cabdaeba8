//! Contract for video sources plus the readiness gate that decides when a
//! video texture may be treated as loaded.
//!
//! A video element can report "playing" before a single frame has been
//! decoded, so readiness needs two independent signals: playback started and
//! the playback clock advanced. `VideoReadiness` latches each signal once and
//! reports ready only when both have fired.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use image::RgbaImage;

use crate::error::MediaError;

/// Element settings applied before playback starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoOptions {
    pub autoplay: bool,
    pub muted: bool,
    pub looping: bool,
    /// Request media without credentials so frames stay readable.
    pub anonymous_cross_origin: bool,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            muted: true,
            looping: true,
            anonymous_cross_origin: true,
        }
    }
}

/// Signals a video element reports while it spins up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSignal {
    /// Playback started; carries the intrinsic video size when known.
    Playing { width: u32, height: u32 },
    /// The playback position advanced, so at least one frame was presented.
    TimeUpdate,
}

#[derive(Debug, Default)]
struct Latches {
    playing: bool,
    progressed: bool,
    width: u32,
    height: u32,
}

impl Latches {
    fn ready(&self) -> bool {
        self.playing && self.progressed
    }
}

/// Two-latch gate shared between a video element and the texture it feeds.
#[derive(Debug, Default)]
pub struct VideoReadiness {
    latches: Mutex<Latches>,
}

impl VideoReadiness {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records a signal and returns whether the gate is now open.
    pub fn signal(&self, signal: VideoSignal) -> bool {
        let mut latches = self.latches.lock().unwrap_or_else(PoisonError::into_inner);
        let was_ready = latches.ready();
        match signal {
            VideoSignal::Playing { width, height } => {
                latches.playing = true;
                latches.width = width;
                latches.height = height;
            }
            VideoSignal::TimeUpdate => latches.progressed = true,
        }
        let ready = latches.ready();
        if ready && !was_ready {
            tracing::debug!(
                width = latches.width,
                height = latches.height,
                "video readiness gate opened"
            );
        }
        ready
    }

    pub fn is_ready(&self) -> bool {
        self.latches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ready()
    }

    /// Intrinsic size reported by the "playing" signal, `(0, 0)` before it.
    pub fn dimensions(&self) -> (u32, u32) {
        let latches = self.latches.lock().unwrap_or_else(PoisonError::into_inner);
        (latches.width, latches.height)
    }
}

/// A playing (or about to play) video source.
pub trait VideoElement: Send + Sync {
    /// Starts playback; resolves once playback has actually begun.
    fn play(&self) -> BoxFuture<'static, Result<(), MediaError>>;

    /// Intrinsic size, once the element knows it.
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// Most recently presented frame as RGBA8.
    fn current_frame(&self) -> Option<RgbaImage>;
}

/// Opens video elements for [`HttpMediaSource`](crate::HttpMediaSource).
pub trait VideoBackend: Send + Sync {
    fn open(
        &self,
        url: &str,
        options: VideoOptions,
        readiness: Arc<VideoReadiness>,
    ) -> Result<Arc<dyn VideoElement>, MediaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_both_signals() {
        let gate = VideoReadiness::new();
        assert!(!gate.is_ready());
        assert!(!gate.signal(VideoSignal::Playing {
            width: 640,
            height: 360
        }));
        assert!(!gate.is_ready());
        assert_eq!(gate.dimensions(), (640, 360));
        assert!(gate.signal(VideoSignal::TimeUpdate));
        assert!(gate.is_ready());
    }

    #[test]
    fn order_does_not_matter_and_latches_stick() {
        let gate = VideoReadiness::new();
        assert!(!gate.signal(VideoSignal::TimeUpdate));
        assert!(!gate.signal(VideoSignal::TimeUpdate));
        assert!(gate.signal(VideoSignal::Playing {
            width: 2,
            height: 2
        }));
        assert!(gate.signal(VideoSignal::TimeUpdate));
        assert!(gate.is_ready());
    }

    #[test]
    fn default_options_autoplay_muted_looping() {
        let options = VideoOptions::default();
        assert!(options.autoplay && options.muted && options.looping);
        assert!(options.anonymous_cross_origin);
    }
}
