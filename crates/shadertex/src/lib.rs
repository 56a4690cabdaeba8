//! Shader input textures acquired from image and video URLs.
//!
//! A [`TextureResource`] owns one GPU texture handle and fills it from a URL:
//! - the handle is created and bound with a transparent 1×1 placeholder first,
//!   so it can be sampled while media is in flight;
//! - still images are decoded, resampled to power-of-two extents when the
//!   requested wrap/filter modes demand it, uploaded and optionally mipmapped;
//! - videos are opened through a [`mediasource::VideoElement`] and only count
//!   as loaded once they are both playing and progressing.
//!
//! GPU access goes through the [`GpuContext`] trait; [`WgpuContext`] is the
//! `wgpu` implementation used outside tests.

pub mod capability;
mod error;
pub mod gpu;
mod request;
mod resample;
mod resource;
mod types;

pub use capability::{
    floor_power_of_two, is_power_of_two, is_power_of_two_image, needs_mipmaps, needs_power_of_two,
};
pub use error::{ParamError, TextureError};
pub use gpu::{GpuContext, TexelData, TextureBinding, TextureId, WgpuContext};
pub use request::{
    ResolvedRequest, TextureRequest, DEFAULT_FLIP_Y, DEFAULT_MAG_FILTER, DEFAULT_MIN_FILTER,
    DEFAULT_WRAP,
};
pub use resample::{power_of_two_extent, ScratchSurface};
pub use resource::{LoadState, TextureResource, TextureSource, PLACEHOLDER_PIXEL};
pub use types::{FilterMode, MediaKind, TextureParameter, WrapMode};
