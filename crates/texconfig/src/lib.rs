use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use shadertex::{FilterMode, TextureRequest, WrapMode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse texture manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid texture manifest: {0}")]
    Invalid(String),
    #[error("failed to read texture manifest {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Named texture inputs plus the defaults and loader settings they share.
#[derive(Debug, Clone, Deserialize)]
pub struct TextureManifest {
    pub version: u32,
    #[serde(default)]
    pub defaults: SamplingDefaults,
    #[serde(default)]
    pub loader: LoaderSettings,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureEntry>,
}

/// Sampling fields applied to every entry that leaves them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SamplingDefaults {
    #[serde(default, deserialize_with = "deserialize_wrap_opt")]
    pub wrap_s: Option<WrapMode>,
    #[serde(default, deserialize_with = "deserialize_wrap_opt")]
    pub wrap_t: Option<WrapMode>,
    #[serde(default, deserialize_with = "deserialize_filter_opt")]
    pub min_filter: Option<FilterMode>,
    #[serde(default, deserialize_with = "deserialize_filter_opt")]
    pub mag_filter: Option<FilterMode>,
    #[serde(default)]
    pub flip_y: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoaderSettings {
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextureEntry {
    pub url: String,
    #[serde(flatten)]
    pub sampling: SamplingDefaults,
}

impl TextureManifest {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: TextureManifest = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported manifest version {}; expected 1",
                self.version
            )));
        }

        for (name, entry) in &self.textures {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("texture name may not be empty".into()));
            }
            if entry.url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "texture '{name}' must have a non-empty url"
                )));
            }
        }

        if let Some(timeout) = self.loader.timeout {
            if timeout.is_zero() {
                return Err(ConfigError::Invalid(
                    "loader.timeout must be greater than zero".into(),
                ));
            }
        }

        Ok(())
    }

    pub fn request(&self, name: &str) -> Option<TextureRequest> {
        self.textures
            .get(name)
            .map(|entry| entry.request(&self.defaults))
    }

    /// Every texture as a load request, in name order.
    pub fn requests(&self) -> Vec<(String, TextureRequest)> {
        self.textures
            .iter()
            .map(|(name, entry)| (name.clone(), entry.request(&self.defaults)))
            .collect()
    }
}

impl SamplingDefaults {
    /// Fields set here win; unset fields come from `fallback`.
    pub fn or(&self, fallback: &SamplingDefaults) -> SamplingDefaults {
        SamplingDefaults {
            wrap_s: self.wrap_s.or(fallback.wrap_s),
            wrap_t: self.wrap_t.or(fallback.wrap_t),
            min_filter: self.min_filter.or(fallback.min_filter),
            mag_filter: self.mag_filter.or(fallback.mag_filter),
            flip_y: self.flip_y.or(fallback.flip_y),
        }
    }

    pub fn apply_to(&self, url: impl Into<String>) -> TextureRequest {
        TextureRequest {
            url: url.into(),
            wrap_s: self.wrap_s,
            wrap_t: self.wrap_t,
            min_filter: self.min_filter,
            mag_filter: self.mag_filter,
            flip_y: self.flip_y,
        }
    }
}

impl TextureEntry {
    pub fn request(&self, defaults: &SamplingDefaults) -> TextureRequest {
        self.sampling.or(defaults).apply_to(self.url.clone())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnumHelper {
    Str(String),
    Num(i64),
}

fn parse_enum_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u32>,
    <T as FromStr>::Err: fmt::Display,
    <T as TryFrom<u32>>::Error: fmt::Display,
{
    let helper: Option<EnumHelper> = Option::deserialize(deserializer)?;
    let result = match helper {
        None => None,
        Some(EnumHelper::Str(raw)) => Some(raw.parse::<T>().map_err(de::Error::custom)?),
        Some(EnumHelper::Num(value)) => {
            let value = u32::try_from(value)
                .map_err(|_| de::Error::custom(format!("invalid GL enum value {value}")))?;
            Some(T::try_from(value).map_err(de::Error::custom)?)
        }
    };
    Ok(result)
}

fn deserialize_wrap_opt<'de, D>(deserializer: D) -> Result<Option<WrapMode>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_enum_opt(deserializer)
}

fn deserialize_filter_opt<'de, D>(deserializer: D) -> Result<Option<FilterMode>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_enum_opt(deserializer)
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs_f64(v)))
        }
    }

    deserializer.deserialize_any(Visitor)
}
