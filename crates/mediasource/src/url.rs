use std::path::{Path, PathBuf};

use reqwest::Url;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "3gp", "webm", "ogv"];

/// Acquisition path chosen from a URL's file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Image,
    Video,
}

/// Classifies a URL by extension, ignoring case, query and fragment.
pub fn classify_url(url: &str) -> Option<MediaFormat> {
    let trimmed = url.trim();
    let path = trimmed.split(&['?', '#'][..]).next().unwrap_or(trimmed);
    let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaFormat::Image)
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaFormat::Video)
    } else {
        None
    }
}

/// Where the bytes behind a URL live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLocation {
    Remote(Url),
    Local(PathBuf),
}

impl MediaLocation {
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("media url must not be empty".into());
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Url::parse(trimmed)
                .map(Self::Remote)
                .map_err(|err| format!("invalid url '{trimmed}': {err}"));
        }
        if trimmed.starts_with("//") {
            return Url::parse(&format!("https:{trimmed}"))
                .map(Self::Remote)
                .map_err(|err| format!("invalid url '{trimmed}': {err}"));
        }
        if trimmed.starts_with("file://") {
            let url =
                Url::parse(trimmed).map_err(|err| format!("invalid url '{trimmed}': {err}"))?;
            return url
                .to_file_path()
                .map(Self::Local)
                .map_err(|_| format!("'{trimmed}' does not name a local file"));
        }
        Ok(Self::Local(PathBuf::from(trimmed)))
    }
}
