use image::imageops::interpolate_bilinear;
use image::{Rgba, RgbaImage};

use crate::capability::floor_power_of_two;

/// Target extent when shrinking an image to power-of-two dimensions.
pub fn power_of_two_extent(width: u32, height: u32) -> (u32, u32) {
    (floor_power_of_two(width), floor_power_of_two(height))
}

/// Reusable drawing surface for power-of-two resampling.
///
/// The pixel allocation survives between calls; each resample only resizes the
/// surface to the new target extent.
#[derive(Debug)]
pub struct ScratchSurface {
    surface: RgbaImage,
}

impl Default for ScratchSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchSurface {
    pub fn new() -> Self {
        Self {
            surface: RgbaImage::new(0, 0),
        }
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    pub fn capacity(&self) -> usize {
        self.surface.as_raw().capacity()
    }

    /// Draws `source` scaled down to its power-of-two extent and returns the
    /// scratch surface holding the result.
    pub fn resample(&mut self, source: &RgbaImage) -> &RgbaImage {
        let (source_width, source_height) = source.dimensions();
        let (width, height) = power_of_two_extent(source_width, source_height);
        self.resize(width, height);

        let scale_x = source_width as f32 / width as f32;
        let scale_y = source_height as f32 / height as f32;
        let max_x = source_width.saturating_sub(1) as f32;
        let max_y = source_height.saturating_sub(1) as f32;

        for (x, y, pixel) in self.surface.enumerate_pixels_mut() {
            let sample_x = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);
            let sample_y = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);
            *pixel = interpolate_bilinear(source, sample_x, sample_y).unwrap_or_else(|| {
                source
                    .get_pixel_checked(sample_x as u32, sample_y as u32)
                    .copied()
                    .unwrap_or(Rgba([0, 0, 0, 0]))
            });
        }

        tracing::warn!(
            original_width = source_width,
            original_height = source_height,
            width,
            height,
            "image is not power of two {}x{}; resized to {}x{}",
            source_width,
            source_height,
            width,
            height
        );

        &self.surface
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.surface.dimensions() == (width, height) {
            return;
        }
        let mut pixels = std::mem::replace(&mut self.surface, RgbaImage::new(0, 0)).into_raw();
        pixels.clear();
        pixels.resize(width as usize * height as usize * 4, 0);
        self.surface = RgbaImage::from_raw(width, height, pixels)
            .unwrap_or_else(|| RgbaImage::new(width, height));
    }
}
