use mediasource::{classify_url, MediaFormat};

use crate::capability;
use crate::error::TextureError;
use crate::types::{FilterMode, WrapMode};

pub const DEFAULT_WRAP: WrapMode = WrapMode::Repeat;
pub const DEFAULT_MIN_FILTER: FilterMode = FilterMode::LinearMipMapLinear;
pub const DEFAULT_MAG_FILTER: FilterMode = FilterMode::Linear;
pub const DEFAULT_FLIP_Y: bool = true;

/// Parameters for a single texture load.
///
/// Unset fields fall back to the defaults above when the request is resolved;
/// an explicitly set field is always honoured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureRequest {
    pub url: String,
    pub wrap_s: Option<WrapMode>,
    pub wrap_t: Option<WrapMode>,
    pub min_filter: Option<FilterMode>,
    pub mag_filter: Option<FilterMode>,
    pub flip_y: Option<bool>,
}

impl TextureRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn wrap(mut self, wrap_s: WrapMode, wrap_t: WrapMode) -> Self {
        self.wrap_s = Some(wrap_s);
        self.wrap_t = Some(wrap_t);
        self
    }

    pub fn min_filter(mut self, filter: FilterMode) -> Self {
        self.min_filter = Some(filter);
        self
    }

    pub fn mag_filter(mut self, filter: FilterMode) -> Self {
        self.mag_filter = Some(filter);
        self
    }

    pub fn flip_y(mut self, flip: bool) -> Self {
        self.flip_y = Some(flip);
        self
    }

    /// Checks the URL and reports which acquisition path it takes.
    pub fn validate(&self) -> Result<MediaFormat, TextureError> {
        if self.url.trim().is_empty() {
            return Err(TextureError::MissingUrl);
        }
        classify_url(&self.url).ok_or_else(|| TextureError::UnsupportedFormat {
            url: self.url.clone(),
        })
    }

    pub fn resolve(&self) -> ResolvedRequest {
        ResolvedRequest {
            url: self.url.clone(),
            wrap_s: self.wrap_s.unwrap_or(DEFAULT_WRAP),
            wrap_t: self.wrap_t.unwrap_or(DEFAULT_WRAP),
            min_filter: self.min_filter.unwrap_or(DEFAULT_MIN_FILTER),
            mag_filter: self.mag_filter.unwrap_or(DEFAULT_MAG_FILTER),
            flip_y: self.flip_y.unwrap_or(DEFAULT_FLIP_Y),
        }
    }
}

/// A request with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub url: String,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub flip_y: bool,
}

impl ResolvedRequest {
    pub fn needs_power_of_two(&self) -> bool {
        capability::needs_power_of_two(self.wrap_s, self.wrap_t, self.min_filter)
    }

    pub fn needs_mipmaps(&self, is_power_of_two: bool) -> bool {
        capability::needs_mipmaps(self.min_filter, is_power_of_two)
    }
}
