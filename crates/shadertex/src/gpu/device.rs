use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use image::imageops::flip_vertical_in_place;
use image::RgbaImage;
use wgpu::util::{DeviceExt, TextureDataOrder};

use super::mipmap::build_mip_chain;
use super::sampler::SamplerParams;
use super::{GpuContext, TexelData};
use crate::types::TextureParameter;

const BYTES_PER_PIXEL: u32 = 4;

/// Stable handle for a texture object owned by a [`WgpuContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

/// Everything a render pass needs to sample a texture object.
#[derive(Clone, Debug)]
pub struct TextureBinding {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
    pub mip_level_count: u32,
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

#[derive(Default)]
struct TextureSlot {
    base: Option<RgbaImage>,
    gpu: Option<GpuTexture>,
    generation: u64,
    mip_level_count: u32,
    params: SamplerParams,
    sampler: Option<wgpu::Sampler>,
}

#[derive(Default)]
struct ContextState {
    next_id: u64,
    bound: Option<TextureId>,
    flip_y: bool,
    textures: HashMap<TextureId, TextureSlot>,
}

/// GL-style texture objects emulated on top of `wgpu`.
///
/// A `TextureId` stays valid for the object's lifetime while the backing
/// `wgpu::Texture` is recreated whenever the base level or the mip chain
/// changes. Sampler objects are rebuilt lazily after parameter changes.
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    state: Mutex<ContextState>,
}

impl WgpuContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            queue,
            format,
            state: Mutex::new(ContextState::default()),
        }
    }

    /// Creates a context on its own adapter and device, without a surface.
    pub fn headless() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        tracing::debug!(
            name = %info.name,
            backend = ?info.backend,
            device_type = ?info.device_type,
            "selected GPU adapter"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("shadertex device"),
            required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
            ..Default::default()
        }))
        .context("failed to create GPU device")?;

        Ok(Self::new(device, queue, wgpu::TextureFormat::Rgba8Unorm))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// View, sampler and extent for a texture that has received pixels.
    pub fn binding(&self, id: TextureId) -> Option<TextureBinding> {
        let mut state = self.lock();
        let slot = state.textures.get_mut(&id)?;
        let gpu = slot.gpu.as_ref()?;
        let size = gpu.texture.size();
        let texture = gpu.texture.clone();
        let view = gpu.view.clone();
        let sampler = match &slot.sampler {
            Some(sampler) => sampler.clone(),
            None => {
                let label = format!("shadertex sampler #{}", id.0);
                let sampler = self
                    .device
                    .create_sampler(&slot.params.descriptor(Some(&label)));
                slot.sampler = Some(sampler.clone());
                sampler
            }
        };
        Some(TextureBinding {
            texture,
            view,
            sampler,
            width: size.width,
            height: size.height,
            mip_level_count: slot.mip_level_count,
        })
    }

    /// Texture object bound to the 2D target.
    pub fn bound_texture(&self) -> Option<TextureId> {
        self.lock().bound
    }

    /// Sampler state last set on a texture object.
    pub fn sampler_params(&self, id: TextureId) -> Option<SamplerParams> {
        self.lock().textures.get(&id).map(|slot| slot.params)
    }

    fn lock(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create_gpu_texture(&self, id: TextureId, levels: &[&RgbaImage]) -> Option<GpuTexture> {
        let base = levels.first()?;
        let (width, height) = base.dimensions();
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        if width > max_dimension || height > max_dimension {
            tracing::warn!(
                texture = id.0,
                width,
                height,
                max_dimension,
                "texture upload ignored; extent exceeds GPU limit"
            );
            return None;
        }

        let mut data = Vec::with_capacity(levels.iter().map(|level| level.as_raw().len()).sum());
        for level in levels {
            data.extend_from_slice(level.as_raw());
        }

        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some(&format!("shadertex texture #{}", id.0)),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: levels.len() as u32,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: self.format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            &data,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Some(GpuTexture { texture, view })
    }

    fn write_level(&self, gpu: &GpuTexture, level: u32, image: &RgbaImage) {
        let (width, height) = image.dimensions();
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu.texture,
                mip_level: level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * BYTES_PER_PIXEL),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

impl GpuContext for WgpuContext {
    type Texture = TextureId;

    fn create_texture(&self) -> Option<TextureId> {
        let mut state = self.lock();
        let id = TextureId(state.next_id);
        state.next_id += 1;
        state.textures.insert(id, TextureSlot::default());
        Some(id)
    }

    fn delete_texture(&self, texture: &TextureId) {
        let mut state = self.lock();
        if let Some(slot) = state.textures.remove(texture) {
            if let Some(gpu) = slot.gpu {
                gpu.texture.destroy();
            }
        }
        if state.bound == Some(*texture) {
            state.bound = None;
        }
    }

    fn bind_texture(&self, texture: Option<&TextureId>) {
        self.lock().bound = texture.copied();
    }

    fn set_unpack_flip_y(&self, flip: bool) {
        self.lock().flip_y = flip;
    }

    fn tex_image_2d(&self, level: u32, data: TexelData<'_>) -> bool {
        let (width, height) = data.dimensions();
        let expected_len = width as usize * height as usize * BYTES_PER_PIXEL as usize;
        if data.pixels().len() != expected_len {
            tracing::warn!(
                expected_len,
                actual_len = data.pixels().len(),
                "texture upload ignored due to mismatched payload size"
            );
            return false;
        }
        let Some(mut image) = RgbaImage::from_raw(width, height, data.pixels().to_vec()) else {
            return false;
        };

        let mut state = self.lock();
        let Some(id) = state.bound else {
            tracing::warn!("texture upload ignored; no texture bound");
            return false;
        };
        if state.flip_y {
            flip_vertical_in_place(&mut image);
        }
        let Some(slot) = state.textures.get_mut(&id) else {
            return false;
        };

        if level == 0 {
            // Same extent: overwrite level 0 in place, other levels are kept.
            if let Some(gpu) = &slot.gpu {
                let size = gpu.texture.size();
                if (size.width, size.height) == (width, height) {
                    self.write_level(gpu, 0, &image);
                    slot.base = Some(image);
                    return true;
                }
            }
            let Some(gpu) = self.create_gpu_texture(id, &[&image]) else {
                return false;
            };
            if let Some(previous) = slot.gpu.replace(gpu) {
                previous.texture.destroy();
            }
            slot.generation += 1;
            slot.mip_level_count = 1;
            slot.base = Some(image);
            return true;
        }

        let expected = slot
            .base
            .as_ref()
            .map(|base| ((base.width() >> level).max(1), (base.height() >> level).max(1)));
        match (&slot.gpu, expected) {
            (Some(gpu), Some(extent)) if level < slot.mip_level_count && extent == (width, height) => {
                self.write_level(gpu, level, &image);
                true
            }
            _ => {
                tracing::warn!(
                    texture = id.0,
                    level,
                    width,
                    height,
                    "mip level upload ignored; level not allocated for this extent"
                );
                false
            }
        }
    }

    fn generate_mipmap(&self) {
        let mut state = self.lock();
        let Some(id) = state.bound else {
            tracing::warn!("mipmap generation ignored; no texture bound");
            return;
        };
        let Some(slot) = state.textures.get_mut(&id) else {
            return;
        };
        let Some(base) = slot.base.as_ref() else {
            tracing::warn!(texture = id.0, "mipmap generation ignored; texture has no pixels");
            return;
        };

        let chain = build_mip_chain(base);
        let mut levels = Vec::with_capacity(chain.len() + 1);
        levels.push(base);
        levels.extend(chain.iter());
        let gpu = self.create_gpu_texture(id, &levels);
        let level_count = levels.len() as u32;

        if gpu.is_some() {
            if let Some(previous) = slot.gpu.take() {
                previous.texture.destroy();
            }
            slot.gpu = gpu;
            slot.generation += 1;
            slot.mip_level_count = level_count;
            tracing::debug!(texture = id.0, levels = level_count, "generated mipmaps");
        }
    }

    fn tex_parameter(&self, parameter: TextureParameter, value: u32) {
        let mut state = self.lock();
        let Some(id) = state.bound else {
            tracing::warn!(?parameter, value, "texture parameter ignored; no texture bound");
            return;
        };
        let Some(slot) = state.textures.get_mut(&id) else {
            return;
        };
        if slot.params.apply(parameter, value) {
            slot.sampler = None;
        } else {
            tracing::warn!(
                texture = id.0,
                ?parameter,
                value,
                "texture parameter ignored; invalid value"
            );
        }
    }
}
