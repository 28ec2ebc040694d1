//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fetch video metadata and streams from the platform's player API.
///
/// Results are printed to stdout as JSON; logs and progress go to stderr.
#[derive(Parser, Debug)]
#[command(name = "tubefetch")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print video metadata and the downloadable formats
    Info {
        /// Watch URL, embed URL or 11-character video id
        url: String,
    },

    /// Download a video (or its audio)
    Download(DownloadArgs),
}

/// Arguments of the `download` subcommand.
#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Watch URL, embed URL or 11-character video id
    pub url: String,

    /// Destination directory [default: ./downloads]
    pub output_dir: Option<PathBuf>,

    /// Download the best audio-only stream
    #[arg(long)]
    pub audio_only: bool,

    /// Never merge separate video and audio streams
    #[arg(long)]
    pub no_merge: bool,

    /// Target quality: best, worst, or a resolution such as 720 or 720p
    #[arg(long)]
    pub quality: Option<String>,

    /// Merge tool to run instead of ffmpeg
    #[arg(long, value_name = "PATH")]
    pub merge_tool: Option<PathBuf>,
}
