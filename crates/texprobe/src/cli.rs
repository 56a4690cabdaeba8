use std::path::PathBuf;

use clap::Parser;
use shadertex::{FilterMode, WrapMode};

#[derive(Parser, Debug)]
#[command(
    name = "texprobe",
    author,
    version,
    about = "Load shader textures from image or video URLs and report the result"
)]
pub struct Cli {
    /// Image or video URLs (http(s), `//host/...`, file:// or local paths).
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Texture manifest (TOML) listing named textures and shared defaults.
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Horizontal wrap mode: `repeat`, `clamp`, `mirror` or a GL enum value.
    #[arg(long, value_name = "MODE", value_parser = parse_wrap)]
    pub wrap_s: Option<WrapMode>,

    /// Vertical wrap mode: `repeat`, `clamp`, `mirror` or a GL enum value.
    #[arg(long, value_name = "MODE", value_parser = parse_wrap)]
    pub wrap_t: Option<WrapMode>,

    /// Minification filter (e.g. `linear`, `linear_mipmap_linear`, `9987`).
    #[arg(long, value_name = "FILTER", value_parser = parse_filter)]
    pub min_filter: Option<FilterMode>,

    /// Magnification filter (`nearest` or `linear`).
    #[arg(long, value_name = "FILTER", value_parser = parse_filter)]
    pub mag_filter: Option<FilterMode>,

    /// Upload images without flipping them vertically.
    #[arg(long)]
    pub no_flip_y: bool,

    /// HTTP timeout in seconds for remote media.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// User agent for remote fetches; can also be supplied via `TEXPROBE_USER_AGENT`.
    #[arg(long, env = "TEXPROBE_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Print the resolved load requests without touching the GPU.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_wrap(value: &str) -> Result<WrapMode, String> {
    if value.trim().is_empty() {
        return Err("wrap mode must not be empty".to_string());
    }
    value.parse().map_err(|err| format!("{err}"))
}

pub fn parse_filter(value: &str) -> Result<FilterMode, String> {
    if value.trim().is_empty() {
        return Err("filter must not be empty".to_string());
    }
    value.parse().map_err(|err| format!("{err}"))
}
