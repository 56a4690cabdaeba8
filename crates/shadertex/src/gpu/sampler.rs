use crate::types::{FilterMode, TextureParameter, WrapMode};

/// Sampler state tracked per texture object, seeded with GL's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerParams {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            min_filter: FilterMode::NearestMipMapLinear,
            mag_filter: FilterMode::Linear,
        }
    }
}

impl SamplerParams {
    /// Applies a raw GL value. Returns `false` (state untouched) when the value
    /// is not valid for the parameter.
    pub fn apply(&mut self, parameter: TextureParameter, value: u32) -> bool {
        match parameter {
            TextureParameter::WrapS => WrapMode::try_from(value).map(|mode| self.wrap_s = mode),
            TextureParameter::WrapT => WrapMode::try_from(value).map(|mode| self.wrap_t = mode),
            TextureParameter::MinFilter => {
                FilterMode::try_from(value).map(|mode| self.min_filter = mode)
            }
            TextureParameter::MagFilter => {
                FilterMode::try_from(value).map(|mode| self.mag_filter = mode)
            }
        }
        .is_ok()
    }

    pub fn descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        let (min_filter, mipmap_filter) = split_min_filter(self.min_filter);
        let lod_max_clamp = if self.min_filter.is_mipmapped() {
            32.0
        } else {
            0.0
        };
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: address_mode(self.wrap_s),
            address_mode_v: address_mode(self.wrap_t),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: magnification(self.mag_filter),
            min_filter,
            mipmap_filter,
            lod_min_clamp: 0.0,
            lod_max_clamp,
            ..Default::default()
        }
    }
}

fn address_mode(mode: WrapMode) -> wgpu::AddressMode {
    match mode {
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

fn split_min_filter(mode: FilterMode) -> (wgpu::FilterMode, wgpu::FilterMode) {
    use wgpu::FilterMode::{Linear, Nearest};
    match mode {
        FilterMode::Nearest => (Nearest, Nearest),
        FilterMode::Linear => (Linear, Nearest),
        FilterMode::NearestMipMapNearest => (Nearest, Nearest),
        FilterMode::LinearMipMapNearest => (Linear, Nearest),
        FilterMode::NearestMipMapLinear => (Nearest, Linear),
        FilterMode::LinearMipMapLinear => (Linear, Linear),
    }
}

// GL only accepts NEAREST/LINEAR for magnification; mip variants fall back to
// their base filter.
fn magnification(mode: FilterMode) -> wgpu::FilterMode {
    match mode {
        FilterMode::Nearest | FilterMode::NearestMipMapNearest | FilterMode::NearestMipMapLinear => {
            wgpu::FilterMode::Nearest
        }
        FilterMode::Linear | FilterMode::LinearMipMapNearest | FilterMode::LinearMipMapLinear => {
            wgpu::FilterMode::Linear
        }
    }
}
