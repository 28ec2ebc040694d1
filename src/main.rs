//! CLI entry point for tubefetch.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tubefetch_core::{
    DownloadRequest, Downloader, DownloaderConfig, QualityTarget, SelectionPolicy,
};

mod app_config;
mod cli;
mod output;
mod progress;

use app_config::FileConfig;
use cli::{Args, Command, DownloadArgs};
use progress::IndicatifProgress;

const DEFAULT_OUTPUT_DIR: &str = "./downloads";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            error!(error = %message, "command failed");
            output::print_error(&message);
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let file_config = app_config::load_default_file_config()?;

    match args.command {
        Command::Info { url } => {
            let downloader = Downloader::new(library_config(&file_config, None))?;
            let metadata = downloader.info(&url).await?;
            output::print_json(&metadata)?;
        }
        Command::Download(download) => {
            let target = quality_target(download.quality.as_deref(), file_config.quality.as_deref())?;
            let (policy, merge) = selection_policy(download.audio_only, download.no_merge, target);
            let output_dir = download
                .output_dir
                .clone()
                .or_else(|| file_config.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
            info!(?policy, merge, output_dir = %output_dir.display(), "starting download");

            let downloader = Downloader::new(library_config(&file_config, Some(&download)))?;
            let request = DownloadRequest::new(policy, output_dir).with_merge(merge);
            let progress = IndicatifProgress::new(args.quiet);
            let result = downloader.download(&download.url, &request, &progress).await?;
            output::print_json(&result)?;
        }
    }
    Ok(())
}

/// Built-in defaults, overridden by the file, overridden by flags.
fn library_config(file: &FileConfig, download: Option<&DownloadArgs>) -> DownloaderConfig {
    let mut config = DownloaderConfig::default();
    file.apply_to(&mut config);
    if let Some(tool) = download.and_then(|d| d.merge_tool.as_ref()) {
        config.merge_tool.clone_from(tool);
    }
    config
}

fn quality_target(flag: Option<&str>, file: Option<&str>) -> Result<QualityTarget> {
    match flag.or(file) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid --quality value '{raw}'")),
        None => Ok(QualityTarget::Best),
    }
}

/// Maps the download flags to a policy and the merge switch.
fn selection_policy(audio_only: bool, no_merge: bool, target: QualityTarget) -> (SelectionPolicy, bool) {
    if audio_only {
        (SelectionPolicy::AudioOnly, false)
    } else if no_merge && target == QualityTarget::Best {
        (SelectionPolicy::BestMuxed, false)
    } else {
        (SelectionPolicy::VideoAtQuality(target), !no_merge)
    }
}
