//! Constants for the transport layer (timeouts, retry budget).

use std::time::Duration;

/// Deadline for a single metadata request (30 seconds).
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for metadata requests (10 seconds).
pub const METADATA_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect timeout for stream downloads (10 seconds).
pub const STREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read inactivity deadline for stream downloads (60 seconds).
pub const STREAM_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Default attempt budget for metadata requests, including the first attempt.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
