//! Constants for the download module (chunking, naming).

/// Size of the pieces written to disk and reported as progress (8 KiB).
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Maximum length of the sanitized title, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Used when a title sanitizes to nothing.
pub const FALLBACK_TITLE: &str = "video";

/// Suffix of temporary track files on the merge path.
pub const TEMP_SUFFIX: &str = "part";

/// Default external merge tool.
pub const DEFAULT_MERGE_TOOL: &str = "ffmpeg";
