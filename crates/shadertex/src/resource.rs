//! Texture acquisition state machine.
//!
//! `TextureResource::load` walks a request through
//!
//! ```text
//!   Unrequested ─▶ PlaceholderBound ─▶ Acquiring ─▶ (Transforming) ─▶ Uploaded
//!        │                │                │               │
//!        └────────────────┴────────────────┴───────────────┴─▶ Failed
//! ```
//!
//! The GPU handle is created once and bound with a 1×1 placeholder before any
//! media is fetched, so it is always safe to sample. Fields describing the
//! handle's content (kind, extent, loaded flag) reset when the placeholder
//! replaces it; the resolved request is only committed after a successful
//! upload.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use mediasource::{MediaFormat, MediaSource, VideoElement, VideoReadiness};
use tracing::{debug, warn};

use crate::capability::is_power_of_two_image;
use crate::error::TextureError;
use crate::gpu::{GpuContext, TexelData};
use crate::request::{ResolvedRequest, TextureRequest};
use crate::resample::ScratchSurface;
use crate::types::{FilterMode, MediaKind, TextureParameter, WrapMode};

/// Fully transparent white, RGBA / unsigned byte.
pub const PLACEHOLDER_PIXEL: [u8; 4] = [255, 255, 255, 0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unrequested,
    PlaceholderBound,
    Acquiring,
    Transforming,
    Uploaded,
    Failed,
}

/// Media currently backing the texture.
pub enum TextureSource {
    Image(RgbaImage),
    /// The image was resized into the resource's scratch surface.
    Resampled,
    Video(Arc<dyn VideoElement>),
}

impl fmt::Debug for TextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(image) => f
                .debug_tuple("Image")
                .field(&image.dimensions())
                .finish(),
            Self::Resampled => f.write_str("Resampled"),
            Self::Video(_) => f.write_str("Video"),
        }
    }
}

/// A GPU texture that is filled asynchronously from an image or video URL.
///
/// `load` takes `&mut self`, so a second load on the same instance can only
/// start once the previous one has resolved; it then supersedes it.
pub struct TextureResource<C: GpuContext> {
    context: Arc<C>,
    texture: Option<C::Texture>,
    request: Option<ResolvedRequest>,
    source: Option<TextureSource>,
    scratch: Option<ScratchSurface>,
    readiness: Option<Arc<VideoReadiness>>,
    media_kind: MediaKind,
    state: LoadState,
    loaded: bool,
    width: u32,
    height: u32,
}

impl<C: GpuContext> TextureResource<C> {
    pub fn new(context: Arc<C>) -> Self {
        Self {
            context,
            texture: None,
            request: None,
            source: None,
            scratch: None,
            readiness: None,
            media_kind: MediaKind::None,
            state: LoadState::Unrequested,
            loaded: false,
            width: 0,
            height: 0,
        }
    }

    /// Loads `request` through `media`, replacing whatever the texture held.
    ///
    /// Images resolve once the final pixels are uploaded. Videos resolve once
    /// playback has started; `is_loaded` flips later, when the element has
    /// both started playing and presented a frame.
    pub async fn load<S: MediaSource>(
        &mut self,
        media: &S,
        request: &TextureRequest,
    ) -> Result<(), TextureError> {
        let format = match request.validate() {
            Ok(format) => format,
            Err(err) => {
                warn!(url = %request.url, error = %err, "rejected texture request");
                self.state = LoadState::Failed;
                return Err(err);
            }
        };
        let resolved = request.resolve();
        debug!(url = %resolved.url, ?format, "loading texture");

        let result = match self.bind_placeholder() {
            Ok(texture) => match format {
                MediaFormat::Video => self.load_video(media, resolved, texture).await,
                MediaFormat::Image => self.load_image(media, resolved, texture).await,
            },
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(url = %request.url, error = %err, "texture load failed; placeholder stays bound");
            self.state = LoadState::Failed;
        }
        result
    }

    fn bind_placeholder(&mut self) -> Result<C::Texture, TextureError> {
        let texture = match &self.texture {
            Some(texture) => texture.clone(),
            None => {
                let texture = self
                    .context
                    .create_texture()
                    .ok_or(TextureError::CreateTextureFailed)?;
                self.texture = Some(texture.clone());
                texture
            }
        };

        self.context.bind_texture(Some(&texture));
        let accepted = self.context.tex_image_2d(
            0,
            TexelData::Bytes {
                width: 1,
                height: 1,
                pixels: &PLACEHOLDER_PIXEL,
            },
        );
        if !accepted {
            return Err(TextureError::CreateTextureFailed);
        }

        self.loaded = false;
        self.media_kind = MediaKind::None;
        self.source = None;
        self.readiness = None;
        self.width = 0;
        self.height = 0;
        self.state = LoadState::PlaceholderBound;
        Ok(texture)
    }

    async fn load_video<S: MediaSource>(
        &mut self,
        media: &S,
        resolved: ResolvedRequest,
        texture: C::Texture,
    ) -> Result<(), TextureError> {
        self.state = LoadState::Acquiring;

        // Video frames change size and never carry mipmaps.
        let context = &self.context;
        context.bind_texture(Some(&texture));
        context.tex_parameter(TextureParameter::WrapS, WrapMode::ClampToEdge.raw());
        context.tex_parameter(TextureParameter::WrapT, WrapMode::ClampToEdge.raw());
        context.tex_parameter(TextureParameter::MinFilter, FilterMode::Linear.raw());

        let playback_error = |source| TextureError::PlaybackFailure {
            url: resolved.url.clone(),
            source,
        };
        let readiness = VideoReadiness::new();
        let element = media
            .open_video(&resolved.url, readiness.clone())
            .map_err(playback_error)?;
        element.play().await.map_err(playback_error)?;
        debug!(url = %resolved.url, "video playback started");

        self.request = Some(ResolvedRequest {
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::ClampToEdge,
            min_filter: FilterMode::Linear,
            ..resolved
        });
        self.source = Some(TextureSource::Video(element));
        self.readiness = Some(readiness);
        self.media_kind = MediaKind::Video;
        Ok(())
    }

    async fn load_image<S: MediaSource>(
        &mut self,
        media: &S,
        resolved: ResolvedRequest,
        texture: C::Texture,
    ) -> Result<(), TextureError> {
        self.state = LoadState::Acquiring;
        let image = media
            .load_image(&resolved.url)
            .await
            .map_err(|source| TextureError::DecodeFailure {
                url: resolved.url.clone(),
                source,
            })?;

        let (original_width, original_height) = image.dimensions();
        let mut power_of_two = original_width > 0
            && original_height > 0
            && is_power_of_two_image(original_width, original_height);
        let resample = resolved.needs_power_of_two() && !power_of_two;
        if resample {
            self.state = LoadState::Transforming;
            self.scratch
                .get_or_insert_with(ScratchSurface::new)
                .resample(&image);
            power_of_two = true;
        }

        let upload = match (&self.scratch, resample) {
            (Some(scratch), true) => scratch.surface(),
            _ => &image,
        };
        let (width, height) = upload.dimensions();

        let context = &self.context;
        context.bind_texture(Some(&texture));
        context.set_unpack_flip_y(resolved.flip_y);
        if !context.tex_image_2d(0, TexelData::Image(upload)) {
            return Err(TextureError::UploadRejected {
                url: resolved.url.clone(),
                width,
                height,
            });
        }

        let mipmaps = resolved.needs_mipmaps(power_of_two);
        if mipmaps {
            context.generate_mipmap();
        }

        context.tex_parameter(TextureParameter::WrapS, resolved.wrap_s.raw());
        context.tex_parameter(TextureParameter::WrapT, resolved.wrap_t.raw());
        context.tex_parameter(TextureParameter::MinFilter, resolved.min_filter.raw());
        context.tex_parameter(TextureParameter::MagFilter, resolved.mag_filter.raw());

        debug!(
            url = %resolved.url,
            original_width,
            original_height,
            width,
            height,
            resampled = resample,
            mipmaps,
            "texture uploaded"
        );

        self.source = Some(if resample {
            TextureSource::Resampled
        } else {
            TextureSource::Image(image)
        });
        self.request = Some(resolved);
        self.media_kind = MediaKind::Image;
        self.width = width;
        self.height = height;
        self.loaded = true;
        self.state = LoadState::Uploaded;
        Ok(())
    }

    /// Uploads the video's current frame. Returns whether the context accepted
    /// an upload; nothing happens until the video is ready.
    pub fn update_video_frame(&self) -> bool {
        let (Some(TextureSource::Video(element)), Some(texture)) = (&self.source, &self.texture)
        else {
            return false;
        };
        if !self.is_loaded() {
            return false;
        }
        let Some(frame) = element.current_frame() else {
            return false;
        };
        let flip_y = self.request.as_ref().map_or(true, |request| request.flip_y);
        self.context.bind_texture(Some(texture));
        self.context.set_unpack_flip_y(flip_y);
        self.context.tex_image_2d(0, TexelData::Image(&frame))
    }

    /// Deletes the GPU handle and forgets all loaded state.
    pub fn release(&mut self) {
        if let Some(texture) = self.texture.take() {
            self.context.delete_texture(&texture);
        }
        self.request = None;
        self.source = None;
        self.readiness = None;
        self.media_kind = MediaKind::None;
        self.loaded = false;
        self.width = 0;
        self.height = 0;
        self.state = LoadState::Unrequested;
    }

    pub fn is_loaded(&self) -> bool {
        match self.media_kind {
            MediaKind::Video => self
                .readiness
                .as_ref()
                .is_some_and(|readiness| readiness.is_ready()),
            _ => self.loaded,
        }
    }

    pub fn state(&self) -> LoadState {
        if self.media_kind == MediaKind::Video && self.state != LoadState::Failed {
            return if self.is_loaded() {
                LoadState::Uploaded
            } else {
                LoadState::Acquiring
            };
        }
        self.state
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// For videos, the size reported by the "playing" signal, or the
    /// element's own size before that signal fired.
    pub fn dimensions(&self) -> (u32, u32) {
        match (&self.media_kind, &self.readiness, &self.source) {
            (MediaKind::Video, Some(readiness), source) => {
                let reported = readiness.dimensions();
                match source {
                    Some(TextureSource::Video(element)) if reported == (0, 0) => {
                        element.dimensions().unwrap_or(reported)
                    }
                    _ => reported,
                }
            }
            _ => (self.width, self.height),
        }
    }

    pub fn texture(&self) -> Option<&C::Texture> {
        self.texture.as_ref()
    }

    pub fn context(&self) -> &Arc<C> {
        &self.context
    }

    pub fn request(&self) -> Option<&ResolvedRequest> {
        self.request.as_ref()
    }

    pub fn url(&self) -> Option<&str> {
        self.request.as_ref().map(|request| request.url.as_str())
    }

    pub fn source(&self) -> Option<&TextureSource> {
        self.source.as_ref()
    }

    /// Pixels of the committed still image (post-resampling).
    pub fn source_image(&self) -> Option<&RgbaImage> {
        match &self.source {
            Some(TextureSource::Image(image)) => Some(image),
            Some(TextureSource::Resampled) => self.scratch.as_ref().map(ScratchSurface::surface),
            _ => None,
        }
    }

    pub fn scratch(&self) -> Option<&ScratchSurface> {
        self.scratch.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use futures::future::{self, BoxFuture};
    use mediasource::{MediaError, VideoSignal};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Create(u32),
        Delete(u32),
        Bind(Option<u32>),
        FlipY(bool),
        Upload { level: u32, width: u32, height: u32 },
        GenerateMipmap,
        Parameter(TextureParameter, u32),
    }

    #[derive(Default)]
    struct RecordingContext {
        calls: Mutex<Vec<Call>>,
        next_id: AtomicU32,
        refuse_textures: bool,
        max_extent: Option<u32>,
    }

    impl RecordingContext {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn created(&self) -> usize {
            self.calls()
                .iter()
                .filter(|call| matches!(call, Call::Create(_)))
                .count()
        }

        fn uploads(&self) -> Vec<(u32, u32)> {
            self.calls()
                .iter()
                .filter_map(|call| match call {
                    Call::Upload { width, height, .. } => Some((*width, *height)),
                    _ => None,
                })
                .collect()
        }

        fn last_bound(&self) -> Option<u32> {
            self.calls().iter().rev().find_map(|call| match call {
                Call::Bind(bound) => Some(*bound),
                _ => None,
            })?
        }

        fn parameter(&self, parameter: TextureParameter) -> Option<u32> {
            self.calls().iter().rev().find_map(|call| match call {
                Call::Parameter(recorded, value) if *recorded == parameter => Some(*value),
                _ => None,
            })
        }

        fn generated_mipmaps(&self) -> bool {
            self.calls().contains(&Call::GenerateMipmap)
        }
    }

    impl GpuContext for RecordingContext {
        type Texture = u32;

        fn create_texture(&self) -> Option<u32> {
            if self.refuse_textures {
                return None;
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.record(Call::Create(id));
            Some(id)
        }

        fn delete_texture(&self, texture: &u32) {
            self.record(Call::Delete(*texture));
        }

        fn bind_texture(&self, texture: Option<&u32>) {
            self.record(Call::Bind(texture.copied()));
        }

        fn set_unpack_flip_y(&self, flip: bool) {
            self.record(Call::FlipY(flip));
        }

        fn tex_image_2d(&self, level: u32, data: TexelData<'_>) -> bool {
            let (width, height) = data.dimensions();
            if self.max_extent.is_some_and(|max| width.max(height) > max) {
                return false;
            }
            self.record(Call::Upload {
                level,
                width,
                height,
            });
            true
        }

        fn generate_mipmap(&self) {
            self.record(Call::GenerateMipmap);
        }

        fn tex_parameter(&self, parameter: TextureParameter, value: u32) {
            self.record(Call::Parameter(parameter, value));
        }
    }

    struct FakeVideo {
        play_error: Option<String>,
        frame: Option<RgbaImage>,
    }

    impl VideoElement for FakeVideo {
        fn play(&self) -> BoxFuture<'static, Result<(), MediaError>> {
            let result = match &self.play_error {
                Some(reason) => Err(MediaError::Playback {
                    url: "clip.mp4".into(),
                    reason: reason.clone(),
                }),
                None => Ok(()),
            };
            Box::pin(future::ready(result))
        }

        fn dimensions(&self) -> Option<(u32, u32)> {
            self.frame.as_ref().map(|frame| frame.dimensions())
        }

        fn current_frame(&self) -> Option<RgbaImage> {
            self.frame.clone()
        }
    }

    #[derive(Default)]
    struct ScriptedSource {
        images: HashMap<String, (u32, u32)>,
        play_error: Option<String>,
        frame: Option<RgbaImage>,
        readiness: Mutex<Option<Arc<VideoReadiness>>>,
    }

    impl ScriptedSource {
        fn with_image(mut self, url: &str, width: u32, height: u32) -> Self {
            self.images.insert(url.to_string(), (width, height));
            self
        }

        fn readiness(&self) -> Arc<VideoReadiness> {
            self.readiness
                .lock()
                .unwrap()
                .clone()
                .expect("video was opened")
        }
    }

    impl MediaSource for ScriptedSource {
        fn load_image(
            &self,
            url: &str,
        ) -> impl Future<Output = Result<RgbaImage, MediaError>> + Send {
            let result = match self.images.get(url) {
                Some(&(width, height)) => Ok(RgbaImage::new(width, height)),
                None => Err(MediaError::Io {
                    url: url.to_string(),
                    source: io::Error::new(io::ErrorKind::InvalidData, "corrupt image"),
                }),
            };
            future::ready(result)
        }

        fn open_video(
            &self,
            _url: &str,
            readiness: Arc<VideoReadiness>,
        ) -> Result<Arc<dyn VideoElement>, MediaError> {
            *self.readiness.lock().unwrap() = Some(readiness);
            Ok(Arc::new(FakeVideo {
                play_error: self.play_error.clone(),
                frame: self.frame.clone(),
            }))
        }
    }

    fn resource() -> (Arc<RecordingContext>, TextureResource<RecordingContext>) {
        let context = Arc::new(RecordingContext::default());
        let resource = TextureResource::new(context.clone());
        (context, resource)
    }

    #[test]
    fn empty_url_rejected_before_gpu_work() {
        let (context, mut texture) = resource();
        let result = pollster::block_on(texture.load(&ScriptedSource::default(), &TextureRequest::new("")));

        assert!(matches!(result, Err(TextureError::MissingUrl)));
        assert_eq!(context.created(), 0);
        assert!(context.calls().is_empty());
        assert_eq!(texture.state(), LoadState::Failed);
        assert!(!texture.is_loaded());
    }

    #[test]
    fn unknown_extension_rejected_before_gpu_work() {
        let (context, mut texture) = resource();
        let result = pollster::block_on(
            texture.load(&ScriptedSource::default(), &TextureRequest::new("shader.glsl")),
        );

        assert!(
            matches!(result, Err(TextureError::UnsupportedFormat { ref url }) if url == "shader.glsl")
        );
        assert!(context.calls().is_empty());
    }

    #[test]
    fn decode_failure_keeps_placeholder_bound() {
        let (context, mut texture) = resource();
        let result = pollster::block_on(
            texture.load(&ScriptedSource::default(), &TextureRequest::new("broken.png")),
        );

        assert!(
            matches!(result, Err(TextureError::DecodeFailure { ref url, .. }) if url == "broken.png")
        );
        assert_eq!(context.created(), 1);
        assert_eq!(context.uploads(), vec![(1, 1)]);
        assert_eq!(context.last_bound(), Some(1));
        assert_eq!(texture.texture(), Some(&1));
        assert_eq!(texture.state(), LoadState::Failed);
        assert!(!texture.is_loaded());
        assert_eq!(texture.media_kind(), MediaKind::None);
    }

    #[test]
    fn refused_texture_creation_fails_load() {
        let context = Arc::new(RecordingContext {
            refuse_textures: true,
            ..RecordingContext::default()
        });
        let mut texture = TextureResource::new(context.clone());
        let source = ScriptedSource::default().with_image("a.png", 4, 4);
        let result = pollster::block_on(texture.load(&source, &TextureRequest::new("a.png")));

        assert!(matches!(result, Err(TextureError::CreateTextureFailed)));
        assert!(context.calls().is_empty());
    }

    #[test]
    fn rejected_upload_fails_load_and_keeps_placeholder() {
        let context = Arc::new(RecordingContext {
            max_extent: Some(4096),
            ..RecordingContext::default()
        });
        let mut texture = TextureResource::new(context.clone());
        let source = ScriptedSource::default().with_image("wide.png", 4097, 1);
        let request = TextureRequest::new("wide.png")
            .wrap(WrapMode::ClampToEdge, WrapMode::ClampToEdge)
            .min_filter(FilterMode::Linear);

        let result = pollster::block_on(texture.load(&source, &request));

        assert!(matches!(
            result,
            Err(TextureError::UploadRejected { ref url, width: 4097, height: 1 }) if url == "wide.png"
        ));
        assert_eq!(context.uploads(), vec![(1, 1)]);
        assert!(!texture.is_loaded());
        assert_eq!(texture.state(), LoadState::Failed);
        assert_eq!(texture.dimensions(), (0, 0));
        assert_eq!(texture.media_kind(), MediaKind::None);
        assert!(texture.request().is_none());
        assert_eq!(texture.texture(), Some(&1));
    }

    #[test]
    fn mipmapped_repeat_texture_is_resampled_to_power_of_two() {
        let (context, mut texture) = resource();
        let source = ScriptedSource::default().with_image("a.jpg", 300, 200);
        let request = TextureRequest::new("a.jpg")
            .wrap(WrapMode::Repeat, WrapMode::Repeat)
            .min_filter(FilterMode::LinearMipMapLinear);

        pollster::block_on(texture.load(&source, &request)).expect("texture loads");

        assert_eq!(context.uploads(), vec![(1, 1), (256, 128)]);
        assert!(context.generated_mipmaps());
        assert!(texture.is_loaded());
        assert_eq!(texture.state(), LoadState::Uploaded);
        assert_eq!(texture.media_kind(), MediaKind::Image);
        assert_eq!(texture.dimensions(), (256, 128));
        assert!(matches!(texture.source(), Some(TextureSource::Resampled)));
        assert_eq!(
            texture.source_image().map(|image| image.dimensions()),
            Some((256, 128))
        );
        assert_eq!(
            context.parameter(TextureParameter::MinFilter),
            Some(FilterMode::LinearMipMapLinear.raw())
        );
        assert_eq!(
            context.parameter(TextureParameter::WrapS),
            Some(WrapMode::Repeat.raw())
        );
        assert_eq!(texture.url(), Some("a.jpg"));
    }

    #[test]
    fn defaults_apply_to_unset_fields() {
        let (context, mut texture) = resource();
        let source = ScriptedSource::default().with_image("a.png", 64, 64);

        pollster::block_on(texture.load(&source, &TextureRequest::new("a.png"))).unwrap();

        assert_eq!(context.parameter(TextureParameter::WrapS), Some(10497));
        assert_eq!(context.parameter(TextureParameter::WrapT), Some(10497));
        assert_eq!(context.parameter(TextureParameter::MinFilter), Some(9987));
        assert_eq!(context.parameter(TextureParameter::MagFilter), Some(9729));
        assert!(context.calls().contains(&Call::FlipY(true)));
        assert!(context.generated_mipmaps());
        assert!(texture.scratch().is_none());
    }

    #[test]
    fn clamped_linear_texture_keeps_npot_extent() {
        let (context, mut texture) = resource();
        let source = ScriptedSource::default().with_image("a.png", 300, 200);
        let request = TextureRequest::new("a.png")
            .wrap(WrapMode::ClampToEdge, WrapMode::ClampToEdge)
            .min_filter(FilterMode::Nearest)
            .mag_filter(FilterMode::Nearest)
            .flip_y(false);

        pollster::block_on(texture.load(&source, &request)).unwrap();

        assert_eq!(context.uploads(), vec![(1, 1), (300, 200)]);
        assert!(!context.generated_mipmaps());
        assert!(context.calls().contains(&Call::FlipY(false)));
        assert_eq!(texture.dimensions(), (300, 200));
        assert!(matches!(texture.source(), Some(TextureSource::Image(_))));
        assert!(texture.scratch().is_none());
    }

    #[test]
    fn npot_image_with_plain_filter_but_repeat_wrap_skips_mipmaps() {
        let (context, mut texture) = resource();
        let source = ScriptedSource::default().with_image("a.png", 100, 50);
        let request = TextureRequest::new("a.png").min_filter(FilterMode::Linear);

        pollster::block_on(texture.load(&source, &request)).unwrap();

        assert_eq!(context.uploads(), vec![(1, 1), (64, 32)]);
        assert!(!context.generated_mipmaps());
        assert_eq!(texture.dimensions(), (64, 32));
    }

    #[test]
    fn reload_reuses_handle_and_scratch() {
        let (context, mut texture) = resource();
        let source = ScriptedSource::default()
            .with_image("a.png", 300, 200)
            .with_image("b.png", 100, 50);

        pollster::block_on(texture.load(&source, &TextureRequest::new("a.png"))).unwrap();
        let capacity = texture.scratch().map(ScratchSurface::capacity);
        pollster::block_on(texture.load(&source, &TextureRequest::new("b.png"))).unwrap();

        assert_eq!(context.created(), 1);
        assert_eq!(texture.dimensions(), (64, 32));
        assert_eq!(texture.scratch().map(ScratchSurface::capacity), capacity);
        assert_eq!(texture.url(), Some("b.png"));
        assert_eq!(
            context.uploads(),
            vec![(1, 1), (256, 128), (1, 1), (64, 32)]
        );
    }

    #[test]
    fn video_forces_clamp_and_waits_for_both_signals() {
        let (context, mut texture) = resource();
        let source = ScriptedSource::default();
        let request = TextureRequest::new("clip.MP4")
            .wrap(WrapMode::Repeat, WrapMode::MirroredRepeat)
            .min_filter(FilterMode::LinearMipMapLinear);

        pollster::block_on(texture.load(&source, &request)).expect("playback starts");

        assert_eq!(texture.media_kind(), MediaKind::Video);
        assert_eq!(
            context.parameter(TextureParameter::WrapS),
            Some(WrapMode::ClampToEdge.raw())
        );
        assert_eq!(
            context.parameter(TextureParameter::WrapT),
            Some(WrapMode::ClampToEdge.raw())
        );
        assert_eq!(
            context.parameter(TextureParameter::MinFilter),
            Some(FilterMode::Linear.raw())
        );
        assert!(!context.generated_mipmaps());
        assert!(matches!(texture.source(), Some(TextureSource::Video(_))));
        assert!(!texture.is_loaded());
        assert_eq!(texture.state(), LoadState::Acquiring);

        let readiness = source.readiness();
        readiness.signal(VideoSignal::Playing {
            width: 640,
            height: 360,
        });
        assert!(!texture.is_loaded());
        assert_eq!(texture.dimensions(), (640, 360));

        readiness.signal(VideoSignal::TimeUpdate);
        assert!(texture.is_loaded());
        assert_eq!(texture.state(), LoadState::Uploaded);
    }

    #[test]
    fn video_frames_upload_only_once_ready() {
        let (context, mut texture) = resource();
        let source = ScriptedSource {
            frame: Some(RgbaImage::new(4, 2)),
            ..ScriptedSource::default()
        };

        pollster::block_on(texture.load(&source, &TextureRequest::new("clip.webm"))).unwrap();
        assert!(!texture.update_video_frame());

        let readiness = source.readiness();
        readiness.signal(VideoSignal::TimeUpdate);
        readiness.signal(VideoSignal::Playing {
            width: 4,
            height: 2,
        });

        assert!(texture.update_video_frame());
        assert_eq!(context.uploads(), vec![(1, 1), (4, 2)]);
    }

    #[test]
    fn video_extent_falls_back_to_element_before_playing_signal() {
        let (_context, mut texture) = resource();
        let source = ScriptedSource {
            frame: Some(RgbaImage::new(320, 240)),
            ..ScriptedSource::default()
        };

        pollster::block_on(texture.load(&source, &TextureRequest::new("clip.mp4"))).unwrap();
        assert_eq!(texture.dimensions(), (320, 240));

        source.readiness().signal(VideoSignal::Playing {
            width: 640,
            height: 480,
        });
        assert_eq!(texture.dimensions(), (640, 480));
    }

    #[test]
    fn playback_failure_is_reported() {
        let (context, mut texture) = resource();
        let source = ScriptedSource {
            play_error: Some("autoplay blocked".into()),
            ..ScriptedSource::default()
        };

        let result = pollster::block_on(texture.load(&source, &TextureRequest::new("clip.ogv")));

        assert!(
            matches!(result, Err(TextureError::PlaybackFailure { ref url, .. }) if url == "clip.ogv")
        );
        assert_eq!(texture.media_kind(), MediaKind::None);
        assert_eq!(texture.state(), LoadState::Failed);
        assert_eq!(context.last_bound(), Some(1));
    }

    #[test]
    fn image_after_video_resets_video_state() {
        let (_context, mut texture) = resource();
        let source = ScriptedSource::default().with_image("a.png", 8, 8);

        pollster::block_on(texture.load(&source, &TextureRequest::new("clip.mp4"))).unwrap();
        pollster::block_on(texture.load(&source, &TextureRequest::new("a.png"))).unwrap();

        assert_eq!(texture.media_kind(), MediaKind::Image);
        assert!(texture.is_loaded());
        assert!(!texture.update_video_frame());
        assert_eq!(texture.dimensions(), (8, 8));
    }

    #[test]
    fn release_deletes_handle() {
        let (context, mut texture) = resource();
        let source = ScriptedSource::default().with_image("a.png", 2, 2);
        pollster::block_on(texture.load(&source, &TextureRequest::new("a.png"))).unwrap();

        texture.release();

        assert!(context.calls().contains(&Call::Delete(1)));
        assert!(texture.texture().is_none());
        assert!(!texture.is_loaded());
        assert_eq!(texture.state(), LoadState::Unrequested);
    }
}
