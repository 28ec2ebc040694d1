//! Identity rotation: client profiles and randomized request headers.
//!
//! - [`HeaderPool`] - read-only user-agent pool producing per-request headers
//! - [`ClientProfile`] - declared client identity sent to the player endpoint
//! - [`RandomSource`] - injectable randomness (user agent, jitter, pacing)

mod headers;
mod profile;
mod random;

pub use headers::{HeaderPool, RequestPurpose};
pub use profile::{ClientContext, ClientProfile, Locale, default_profiles};
pub use random::{FixedRandom, RandomSource, ThreadRandom};
