//! Pure predicates deciding which GPU constraints apply to an upload.
//!
//! Constrained GPUs (WebGL1, GLES2) only sample non-power-of-two textures when
//! both wrap modes clamp to edge and minification does not touch a mipmap
//! chain. Everything else needs power-of-two extents.

use crate::types::{FilterMode, WrapMode};

/// True when `n` is a power of two.
///
/// `n` must be positive; a zero extent never describes a real image.
pub fn is_power_of_two(n: u32) -> bool {
    debug_assert!(n > 0, "power-of-two check on a zero extent");
    n.is_power_of_two()
}

pub fn is_power_of_two_image(width: u32, height: u32) -> bool {
    is_power_of_two(width) && is_power_of_two(height)
}

/// Whether the wrap/filter combination requires power-of-two extents.
pub fn needs_power_of_two(wrap_s: WrapMode, wrap_t: WrapMode, min_filter: FilterMode) -> bool {
    if wrap_s != WrapMode::ClampToEdge || wrap_t != WrapMode::ClampToEdge {
        return true;
    }
    min_filter.is_mipmapped()
}

/// Whether a mipmap chain must be generated after the final upload.
pub fn needs_mipmaps(min_filter: FilterMode, is_power_of_two: bool) -> bool {
    is_power_of_two && min_filter.is_mipmapped()
}

/// Largest power of two not exceeding `n`; extents of 0 or 1 map to 1.
pub fn floor_power_of_two(n: u32) -> u32 {
    if n <= 1 {
        return 1;
    }
    1 << (u32::BITS - 1 - n.leading_zeros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_powers_of_two() {
        for n in [1, 2, 4, 8, 1024] {
            assert!(is_power_of_two(n), "{n} should be a power of two");
        }
        for n in [3, 5, 6, 100] {
            assert!(!is_power_of_two(n), "{n} should not be a power of two");
        }
        assert!(is_power_of_two_image(256, 128));
        assert!(!is_power_of_two_image(256, 100));
    }

    #[test]
    fn power_of_two_needed_unless_clamped_and_unmipmapped() {
        let mut checked = 0;
        for wrap_s in WrapMode::ALL {
            for wrap_t in WrapMode::ALL {
                for min_filter in FilterMode::ALL {
                    let relaxed = wrap_s == WrapMode::ClampToEdge
                        && wrap_t == WrapMode::ClampToEdge
                        && matches!(min_filter, FilterMode::Nearest | FilterMode::Linear);
                    assert_eq!(
                        needs_power_of_two(wrap_s, wrap_t, min_filter),
                        !relaxed,
                        "wrap_s={wrap_s} wrap_t={wrap_t} min_filter={min_filter}"
                    );
                    checked += 1;
                }
            }
        }
        assert_eq!(checked, 54);
    }

    #[test]
    fn mipmaps_need_power_of_two_and_mip_filter() {
        for min_filter in FilterMode::ALL {
            let mip_filter = !matches!(min_filter, FilterMode::Nearest | FilterMode::Linear);
            assert_eq!(needs_mipmaps(min_filter, true), mip_filter);
            assert!(!needs_mipmaps(min_filter, false));
        }
    }

    #[test]
    fn floors_to_power_of_two() {
        assert_eq!(floor_power_of_two(0), 1);
        assert_eq!(floor_power_of_two(1), 1);
        assert_eq!(floor_power_of_two(100), 64);
        assert_eq!(floor_power_of_two(50), 32);
        assert_eq!(floor_power_of_two(300), 256);
        assert_eq!(floor_power_of_two(200), 128);
        assert_eq!(floor_power_of_two(1024), 1024);
        assert_eq!(floor_power_of_two(u32::MAX), 1 << 31);
    }
}
