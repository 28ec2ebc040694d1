//! tubefetch core library
//!
//! Resolves a video platform's player API into downloadable streams and
//! retrieves them: negotiating across client profiles, normalizing the two
//! stream-list shapes, selecting formats by policy, and downloading one
//! stream or two tracks merged by an external tool.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`identity`] - Client profiles and randomized request headers
//! - [`parser`] - Video id extraction from URLs
//! - [`transport`] - HTTP transport with 403/transient retry
//! - [`schema`] - Wire types of the player endpoint
//! - [`resolver`] - Profile negotiation producing [`VideoMetadata`]
//! - [`format`] - Catalog normalization and format selection
//! - [`download`] - Chunked stream transfer and track merging
//! - [`pipeline`] - The [`Downloader`] facade composing all of the above

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod identity;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod schema;
pub mod transport;

// Re-export commonly used types
pub use config::DownloaderConfig;
pub use download::{TransferError, TransferResult};
pub use error::PipelineError;
pub use format::{DownloadPlan, FormatRecord, QualityTarget, SelectionError, SelectionPolicy};
pub use parser::{ParseError, VideoId, extract_video_id};
pub use pipeline::{DownloadRequest, Downloader, DownloaderBuilder};
pub use resolver::{ResolveError, VideoMetadata};
pub use transport::TransportError;
