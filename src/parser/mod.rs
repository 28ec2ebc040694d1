//! Inbound parsing: turning a user-supplied URL or id into a [`VideoId`].
//!
//! # Example
//!
//! ```
//! use tubefetch_core::parser::extract_video_id;
//!
//! let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
//! assert_eq!(id.as_str(), "dQw4w9WgXcQ");
//! ```

mod error;
mod video_id;

pub use error::ParseError;
pub use video_id::{VIDEO_ID_LEN, VideoId, extract_video_id};
