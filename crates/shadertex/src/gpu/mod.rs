//! GPU boundary for texture uploads.
//!
//! The texture state machine talks to the GPU through `GpuContext`, a small
//! GL-shaped contract: create a texture object, bind it to the 2D target, then
//! upload pixels, generate mipmaps and set sampler parameters on whatever is
//! bound. Three pieces live here:
//! - `GpuContext` / `TexelData` define the contract.
//! - `device` provides `WgpuContext`, which emulates mutable GL texture
//!   objects on top of `wgpu` (stable handles, textures recreated in place).
//! - `mipmap` and `sampler` hold the CPU mip-chain builder and the mapping from
//!   GL sampler enums onto `wgpu` sampler descriptors.

mod device;
mod mipmap;
mod sampler;

pub use device::{TextureBinding, TextureId, WgpuContext};
pub use mipmap::{build_mip_chain, mip_level_count};
pub use sampler::SamplerParams;

use image::RgbaImage;

use crate::types::TextureParameter;

/// Pixel payload for an RGBA / unsigned-byte upload.
#[derive(Debug, Clone, Copy)]
pub enum TexelData<'a> {
    Bytes {
        width: u32,
        height: u32,
        pixels: &'a [u8],
    },
    Image(&'a RgbaImage),
}

impl TexelData<'_> {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Bytes { width, height, .. } => (*width, *height),
            Self::Image(image) => image.dimensions(),
        }
    }

    pub fn pixels(&self) -> &[u8] {
        match self {
            Self::Bytes { pixels, .. } => pixels,
            Self::Image(image) => image.as_raw(),
        }
    }
}

/// GL-style texture operations. Every call except `create_texture` and
/// `delete_texture` acts on the texture bound to the 2D target.
pub trait GpuContext {
    type Texture: Clone + std::fmt::Debug;

    /// Returns `None` when the context cannot allocate (e.g. it was lost).
    fn create_texture(&self) -> Option<Self::Texture>;

    fn delete_texture(&self, texture: &Self::Texture);

    fn bind_texture(&self, texture: Option<&Self::Texture>);

    fn set_unpack_flip_y(&self, flip: bool);

    /// Returns `false` when the upload was rejected; the bound texture then
    /// keeps its previous contents.
    fn tex_image_2d(&self, level: u32, data: TexelData<'_>) -> bool;

    fn generate_mipmap(&self);

    fn tex_parameter(&self, parameter: TextureParameter, value: u32);
}
