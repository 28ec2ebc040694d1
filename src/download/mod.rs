//! Stream retrieval and track merging.
//!
//! # Features
//!
//! - Streaming downloads in 8 KiB pieces with per-piece progress
//! - Browser navigation headers on every stream request
//! - Deterministic output names (`<title>_<id>.<ext>`)
//! - Merge path through an external tool with scoped temp-file cleanup
//! - Partial files removed on failure
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tubefetch_core::download::{FfmpegMerger, StreamClient, StreamFetcher, TracingProgress};
//! use tubefetch_core::identity::{HeaderPool, ThreadRandom};
//!
//! # async fn example(
//! #     plan: tubefetch_core::format::DownloadPlan,
//! #     metadata: tubefetch_core::resolver::VideoMetadata,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let client = StreamClient::new(HeaderPool::default(), Arc::new(ThreadRandom))?;
//! let fetcher = StreamFetcher::new(client, Arc::new(FfmpegMerger::default()));
//! let result = fetcher
//!     .fetch(&plan, &metadata, Path::new("./downloads"), &TracingProgress)
//!     .await?;
//! println!("Downloaded: {}", result.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod fetcher;
mod filename;
mod merge;
mod progress;

pub use client::StreamClient;
pub use constants::{CHUNK_SIZE, DEFAULT_MERGE_TOOL, MAX_TITLE_LEN};
pub use error::TransferError;
pub use fetcher::{StreamFetcher, TransferResult};
pub use filename::{output_filename, sanitize_title};
pub use merge::{FfmpegMerger, MergeTool};
pub use progress::{NoProgress, ProgressEvent, ProgressReporter, RecordingProgress, TracingProgress};

// Note: no module-local Result aliases. Use `Result<T, TransferError>`
// explicitly in signatures.
