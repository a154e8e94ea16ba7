//! vidmirror — mirror videos and their metadata into an S3-compatible store.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use vidmirror_cli::{init_tracing, input};
use vidmirror_core::Config;
use vidmirror_resolver::{Quality, YoutubeResolver};
use vidmirror_services::{BatchDriver, MirrorOptions, MirrorOrchestrator};
use vidmirror_storage::{ObjectGateway, S3Gateway};

fn parse_quality(s: &str) -> Result<Quality, vidmirror_resolver::models::ParseQualityError> {
    s.parse()
}

#[derive(Debug, Parser)]
#[command(name = "vidmirror", version, about = "Mirror videos into an object store, exactly once")]
struct Cli {
    /// Video id to mirror
    #[arg(required_unless_present_any = ["file", "playlist"], conflicts_with_all = ["file", "playlist"])]
    video_id: Option<String>,

    /// Plain text file of ids, one per line
    #[arg(long, conflicts_with = "playlist")]
    file: Option<PathBuf>,

    /// JSON channel/playlist listing to mirror
    #[arg(long)]
    playlist: Option<PathBuf>,

    /// Requested quality: 'best' or a resolution like '720p'
    #[arg(long, default_value = "best", value_parser = parse_quality)]
    quality: Quality,

    /// Download the best audio stream only
    #[arg(long)]
    audio_only: bool,

    /// Stop after this many items
    #[arg(long)]
    max: Option<usize>,

    /// Write the batch summary as JSON to this path
    #[arg(long)]
    save_results: Option<PathBuf>,

    /// Override the staging directory from the environment
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Override the object key prefix from the environment
    #[arg(long)]
    prefix: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, anyhow::Error> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::from_env().context(
        "Configuration error: set MINIO_ENDPOINT, MINIO_ACCESS_KEY, MINIO_SECRET_KEY \
         and MINIO_BUCKET (a .env file in the working directory also works)",
    )?;
    if let Some(staging_dir) = cli.staging_dir {
        config.staging_dir = staging_dir;
    }
    if let Some(prefix) = cli.prefix {
        config.key_prefix = prefix;
        config.validate()?;
    }
    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir.display()
            )
        })?;

    let gateway = Arc::new(S3Gateway::new(&config.store));
    gateway
        .ensure_bucket()
        .await
        .with_context(|| format!("Cannot reach object store at {}", config.store.endpoint_url()))?;
    info!(
        endpoint = %config.store.endpoint_url(),
        bucket = %config.store.bucket,
        "Connected to object store"
    );

    let orchestrator = MirrorOrchestrator::new(
        gateway,
        Arc::new(YoutubeResolver::new()),
        config.staging_dir.clone(),
        config.key_prefix.clone(),
    );
    let driver = BatchDriver::new(orchestrator);
    let options = MirrorOptions {
        quality: cli.quality,
        audio_only: cli.audio_only,
    };

    let summary = if let Some(path) = &cli.playlist {
        let record = input::read_playlist(path)?;
        driver.run_playlist(&record, &options, cli.max).await
    } else {
        let mut ids = match &cli.file {
            Some(path) => input::read_id_file(path)?,
            None => vec![cli.video_id.clone().unwrap_or_default()],
        };
        if let Some(max) = cli.max {
            ids.truncate(max);
        }
        driver.run(&ids, &options).await
    };

    if let Some(path) = &cli.save_results {
        let json = serde_json::to_string_pretty(&summary)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        info!(path = %path.display(), "Saved batch results");
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
