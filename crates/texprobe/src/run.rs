use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use mediasource::{HttpMediaSource, MediaFormat, MediaSourceConfig};
use serde::Serialize;
use shadertex::{TextureRequest, TextureResource, WgpuContext};
use texconfig::{LoaderSettings, SamplingDefaults, TextureManifest};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let manifest = match &cli.manifest {
        Some(path) => Some(
            TextureManifest::from_path(path)
                .with_context(|| format!("failed to load manifest {}", path.display()))?,
        ),
        None => None,
    };
    let jobs = collect_jobs(&cli, manifest.as_ref());
    if jobs.is_empty() {
        bail!("no textures to load; pass one or more URLs or --manifest");
    }
    tracing::debug!(textures = jobs.len(), dry_run = cli.dry_run, "resolved texture jobs");

    let reports = if cli.dry_run {
        jobs.iter().map(plan_report).collect::<Vec<_>>()
    } else {
        let loader = manifest
            .as_ref()
            .map(|manifest| manifest.loader.clone())
            .unwrap_or_default();
        load_all(&cli, &loader, &jobs)?
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("failed to encode report")?
        );
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    let failed = reports
        .iter()
        .filter(|report| report.status == Status::Failed)
        .count();
    if failed > 0 {
        bail!("{failed} of {} textures failed", reports.len());
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct Job {
    name: String,
    request: TextureRequest,
}

/// Manifest entries first (name order), then positional URLs. Flags given on
/// the command line override both.
fn collect_jobs(cli: &Cli, manifest: Option<&TextureManifest>) -> Vec<Job> {
    let overrides = SamplingDefaults {
        wrap_s: cli.wrap_s,
        wrap_t: cli.wrap_t,
        min_filter: cli.min_filter,
        mag_filter: cli.mag_filter,
        flip_y: cli.no_flip_y.then_some(false),
    };
    let manifest_defaults = manifest
        .map(|manifest| manifest.defaults.clone())
        .unwrap_or_default();

    let from_manifest = manifest
        .into_iter()
        .flat_map(TextureManifest::requests);
    let from_args = cli
        .urls
        .iter()
        .map(|url| (url.clone(), manifest_defaults.apply_to(url.as_str())));

    from_manifest
        .chain(from_args)
        .map(|(name, request)| {
            let inherited = SamplingDefaults {
                wrap_s: request.wrap_s,
                wrap_t: request.wrap_t,
                min_filter: request.min_filter,
                mag_filter: request.mag_filter,
                flip_y: request.flip_y,
            };
            Job {
                name,
                request: overrides.or(&inherited).apply_to(request.url),
            }
        })
        .collect()
}

fn media_config(cli: &Cli, loader: &LoaderSettings) -> MediaSourceConfig {
    MediaSourceConfig {
        timeout: Some(
            cli.timeout
                .map(Duration::from_secs)
                .or(loader.timeout)
                .unwrap_or(DEFAULT_TIMEOUT),
        ),
        user_agent: cli.user_agent.clone().or_else(|| loader.user_agent.clone()),
        ..MediaSourceConfig::default()
    }
}

fn load_all(cli: &Cli, loader: &LoaderSettings, jobs: &[Job]) -> Result<Vec<TextureReport>> {
    let media = HttpMediaSource::new(media_config(cli, loader))
        .context("failed to construct media source")?;
    let context = Arc::new(WgpuContext::headless().context("failed to initialise GPU")?);

    let mut reports = Vec::with_capacity(jobs.len());
    for job in jobs {
        let mut resource = TextureResource::new(context.clone());
        let result = pollster::block_on(resource.load(&media, &job.request));
        let mut report = plan_report(job);
        match result {
            Ok(()) => {
                report.status = if resource.is_loaded() {
                    Status::Loaded
                } else {
                    Status::Pending
                };
                report.kind = Some(resource.media_kind().to_string());
                let (width, height) = resource.dimensions();
                report.width = Some(width);
                report.height = Some(height);
                report.mip_levels = resource
                    .texture()
                    .and_then(|id| context.binding(*id))
                    .map(|binding| binding.mip_level_count);
                tracing::info!(name = %job.name, status = ?report.status, width, height, "texture probed");
            }
            Err(err) => {
                tracing::warn!(name = %job.name, error = %err, "texture failed to load");
                report.status = Status::Failed;
                report.error = Some(format!("{:#}", anyhow::Error::new(err)));
            }
        }
        resource.release();
        reports.push(report);
    }
    Ok(reports)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Planned,
    Loaded,
    Pending,
    Failed,
}

#[derive(Debug, Serialize)]
struct TextureReport {
    name: String,
    url: String,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    wrap_s: &'static str,
    wrap_t: &'static str,
    min_filter: &'static str,
    mag_filter: &'static str,
    flip_y: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mip_levels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn plan_report(job: &Job) -> TextureReport {
    let resolved = job.request.resolve();
    let (status, format, error) = match job.request.validate() {
        Ok(MediaFormat::Image) => (Status::Planned, Some("image"), None),
        Ok(MediaFormat::Video) => (Status::Planned, Some("video"), None),
        Err(err) => (Status::Failed, None, Some(err.to_string())),
    };
    TextureReport {
        name: job.name.clone(),
        url: resolved.url,
        status,
        format,
        wrap_s: resolved.wrap_s.name(),
        wrap_t: resolved.wrap_t.name(),
        min_filter: resolved.min_filter.name(),
        mag_filter: resolved.mag_filter.name(),
        flip_y: resolved.flip_y,
        kind: None,
        width: None,
        height: None,
        mip_levels: None,
        error,
    }
}

fn print_report(report: &TextureReport) {
    let status = match report.status {
        Status::Planned => "planned",
        Status::Loaded => "loaded",
        Status::Pending => "pending",
        Status::Failed => "failed",
    };
    println!(
        "{:<20} {status:<8} {:<6} wrap={}/{} min={} mag={} flip_y={}",
        report.name,
        report.format.unwrap_or("-"),
        report.wrap_s,
        report.wrap_t,
        report.min_filter,
        report.mag_filter,
        report.flip_y
    );
    if let (Some(kind), Some(width), Some(height)) = (&report.kind, report.width, report.height) {
        println!(
            "{:<20} kind={kind} size={width}x{height} mip_levels={}",
            "",
            report
                .mip_levels
                .map_or_else(|| "-".to_string(), |levels| levels.to_string())
        );
    }
    if let Some(error) = &report.error {
        println!("{:<20} error: {error}", "");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use shadertex::{FilterMode, WrapMode};

    use super::*;

    const MANIFEST: &str = r#"
version = 1

[defaults]
wrap_s = "clamp"
min_filter = "linear"

[loader]
timeout = "5s"
user_agent = "manifest-agent"

[textures.noise]
url = "noise.png"
mag_filter = "nearest"
"#;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("texprobe").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn manifest_entries_precede_urls_and_flags_win() {
        let manifest = TextureManifest::from_toml_str(MANIFEST).unwrap();
        let cli = cli(&["extra.jpg", "--wrap-s", "mirror", "--no-flip-y"]);
        let jobs = collect_jobs(&cli, Some(&manifest));

        let names: Vec<_> = jobs.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, vec!["noise", "extra.jpg"]);

        let noise = &jobs[0].request;
        assert_eq!(noise.wrap_s, Some(WrapMode::MirroredRepeat));
        assert_eq!(noise.min_filter, Some(FilterMode::Linear));
        assert_eq!(noise.mag_filter, Some(FilterMode::Nearest));
        assert_eq!(noise.flip_y, Some(false));

        let extra = &jobs[1].request;
        assert_eq!(extra.url, "extra.jpg");
        assert_eq!(extra.min_filter, Some(FilterMode::Linear));
        assert_eq!(extra.mag_filter, None);
    }

    #[test]
    fn plain_urls_keep_unset_fields() {
        let jobs = collect_jobs(&cli(&["a.png"]), None);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].request, TextureRequest::new("a.png"));
    }

    #[test]
    fn loader_settings_fall_back_to_manifest() {
        let manifest = TextureManifest::from_toml_str(MANIFEST).unwrap();
        let config = media_config(&cli(&[]), &manifest.loader);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent.as_deref(), Some("manifest-agent"));

        let config = media_config(&cli(&["--timeout", "9"]), &LoaderSettings::default());
        assert_eq!(config.timeout, Some(Duration::from_secs(9)));
    }

    #[test]
    fn plan_reports_resolved_defaults() {
        let job = Job {
            name: "a".into(),
            request: TextureRequest::new("a.png"),
        };
        let report = plan_report(&job);
        assert_eq!(report.status, Status::Planned);
        assert_eq!(report.format, Some("image"));
        assert_eq!(report.wrap_s, "repeat");
        assert_eq!(report.min_filter, "linear_mipmap_linear");
        assert!(report.flip_y);

        let job = Job {
            name: "b".into(),
            request: TextureRequest::new("b.txt"),
        };
        assert_eq!(plan_report(&job).status, Status::Failed);
    }
}
