use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Number of levels in a full chain down to 1×1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

/// Builds every level below `base`, halving each extent (never below 1).
pub fn build_mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let (width, height) = base.dimensions();
    let levels = mip_level_count(width, height);
    let mut chain: Vec<RgbaImage> = Vec::with_capacity(levels.saturating_sub(1) as usize);
    for _ in 1..levels {
        let previous = chain.last().unwrap_or(base);
        let next_width = (previous.width() / 2).max(1);
        let next_height = (previous.height() / 2).max(1);
        let next = imageops::resize(previous, next_width, next_height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}
