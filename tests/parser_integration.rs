//! Integration tests for video id extraction.
//!
//! These tests verify the parser's behavior with the URL shapes users paste
//! and across module boundaries.

use tubefetch_core::{ParseError, VideoId, extract_video_id};

#[test]
fn test_every_supported_shape_yields_the_same_id() {
    let inputs = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=10",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ?si=abc",
        "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        "  dQw4w9WgXcQ\n",
    ];

    for input in inputs {
        let id = extract_video_id(input).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        assert_eq!(id.as_str(), "dQw4w9WgXcQ", "input: {input:?}");
    }
}

#[test]
fn test_extraction_is_idempotent() {
    let id = extract_video_id("https://www.youtube.com/watch?v=a_B-c1D2e3F").unwrap();
    let again: VideoId = id.as_str().parse().unwrap();
    assert_eq!(id, again);
}

#[test]
fn test_rejected_inputs_carry_suggestion() {
    for input in ["", "not a url", "https://www.youtube.com/watch?v=short", "abc"] {
        let err = extract_video_id(input).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUrl { .. }), "input: {input:?}");
        assert!(err.to_string().contains("Suggestion:"), "input: {input:?}");
    }
}

#[test]
fn test_video_id_serializes_as_plain_string() {
    let id = extract_video_id("dQw4w9WgXcQ").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"dQw4w9WgXcQ\"");
}
