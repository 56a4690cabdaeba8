use std::fmt;
use std::str::FromStr;

use crate::error::ParamError;

/// Minification/magnification filters, carrying their GL enum values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FilterMode {
    Nearest = 9728,
    Linear = 9729,
    NearestMipMapNearest = 9984,
    LinearMipMapNearest = 9985,
    NearestMipMapLinear = 9986,
    LinearMipMapLinear = 9987,
}

impl FilterMode {
    pub const ALL: [FilterMode; 6] = [
        Self::Nearest,
        Self::Linear,
        Self::NearestMipMapNearest,
        Self::LinearMipMapNearest,
        Self::NearestMipMapLinear,
        Self::LinearMipMapLinear,
    ];

    /// Raw GL enum value.
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// True for the four filters that sample from a mipmap chain.
    pub fn is_mipmapped(self) -> bool {
        !matches!(self, Self::Nearest | Self::Linear)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::NearestMipMapNearest => "nearest_mipmap_nearest",
            Self::LinearMipMapNearest => "linear_mipmap_nearest",
            Self::NearestMipMapLinear => "nearest_mipmap_linear",
            Self::LinearMipMapLinear => "linear_mipmap_linear",
        }
    }
}

impl TryFrom<u32> for FilterMode {
    type Error = ParamError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.raw() == value)
            .ok_or_else(|| ParamError::UnknownFilter(value.to_string()))
    }
}

impl FromStr for FilterMode {
    type Err = ParamError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if let Ok(value) = normalized.parse::<u32>() {
            return Self::try_from(value);
        }
        match normalized.as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            "nearest_mipmap_nearest" => Ok(Self::NearestMipMapNearest),
            "linear_mipmap_nearest" => Ok(Self::LinearMipMapNearest),
            "nearest_mipmap_linear" => Ok(Self::NearestMipMapLinear),
            "linear_mipmap_linear" | "trilinear" => Ok(Self::LinearMipMapLinear),
            _ => Err(ParamError::UnknownFilter(raw.trim().to_string())),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Texture coordinate wrapping, carrying its GL enum value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WrapMode {
    Repeat = 10497,
    ClampToEdge = 33071,
    MirroredRepeat = 33648,
}

impl WrapMode {
    pub const ALL: [WrapMode; 3] = [Self::Repeat, Self::ClampToEdge, Self::MirroredRepeat];

    /// Raw GL enum value.
    pub fn raw(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Repeat => "repeat",
            Self::ClampToEdge => "clamp_to_edge",
            Self::MirroredRepeat => "mirrored_repeat",
        }
    }
}

impl TryFrom<u32> for WrapMode {
    type Error = ParamError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.raw() == value)
            .ok_or_else(|| ParamError::UnknownWrap(value.to_string()))
    }
}

impl FromStr for WrapMode {
    type Err = ParamError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if let Ok(value) = normalized.parse::<u32>() {
            return Self::try_from(value);
        }
        match normalized.as_str() {
            "repeat" => Ok(Self::Repeat),
            "clamp" | "clamp_to_edge" => Ok(Self::ClampToEdge),
            "mirror" | "mirrored" | "mirrored_repeat" => Ok(Self::MirroredRepeat),
            _ => Err(ParamError::UnknownWrap(raw.trim().to_string())),
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sampler state that can be set on the bound texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureParameter {
    MagFilter = 10240,
    MinFilter = 10241,
    WrapS = 10242,
    WrapT = 10243,
}

impl TextureParameter {
    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// What kind of media currently backs a texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaKind {
    #[default]
    None,
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::Image => "image",
            Self::Video => "video",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_values_match_webgl_constants() {
        assert_eq!(FilterMode::Nearest.raw(), 9728);
        assert_eq!(FilterMode::Linear.raw(), 9729);
        assert_eq!(FilterMode::NearestMipMapNearest.raw(), 9984);
        assert_eq!(FilterMode::LinearMipMapNearest.raw(), 9985);
        assert_eq!(FilterMode::NearestMipMapLinear.raw(), 9986);
        assert_eq!(FilterMode::LinearMipMapLinear.raw(), 9987);
        assert_eq!(WrapMode::ClampToEdge.raw(), 33071);
        assert_eq!(WrapMode::MirroredRepeat.raw(), 33648);
        assert_eq!(WrapMode::Repeat.raw(), 10497);
    }

    #[test]
    fn parses_names_and_raw_values() {
        assert_eq!("clamp".parse::<WrapMode>().unwrap(), WrapMode::ClampToEdge);
        assert_eq!(
            "Mirrored-Repeat".parse::<WrapMode>().unwrap(),
            WrapMode::MirroredRepeat
        );
        assert_eq!("10497".parse::<WrapMode>().unwrap(), WrapMode::Repeat);
        assert_eq!(
            "linear_mipmap_linear".parse::<FilterMode>().unwrap(),
            FilterMode::LinearMipMapLinear
        );
        assert_eq!("9728".parse::<FilterMode>().unwrap(), FilterMode::Nearest);
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(WrapMode::try_from(0).is_err());
        assert!(FilterMode::try_from(33071).is_err());
        assert!("bicubic".parse::<FilterMode>().is_err());
        assert!("wrap".parse::<WrapMode>().is_err());
    }

    #[test]
    fn only_plain_filters_skip_mipmaps() {
        let plain: Vec<_> = FilterMode::ALL
            .into_iter()
            .filter(|mode| !mode.is_mipmapped())
            .collect();
        assert_eq!(plain, vec![FilterMode::Nearest, FilterMode::Linear]);
    }
}
