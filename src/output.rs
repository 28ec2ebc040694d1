//! JSON output on stdout.

use serde::Serialize;
use serde_json::json;

/// Renders `value` as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Renders the failure document `{"error": message}`.
pub fn error_json(message: &str) -> String {
    serde_json::to_string_pretty(&json!({ "error": message }))
        .unwrap_or_else(|_| format!("{{\"error\": {message:?}}}"))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Prints the failure document on stdout.
pub fn print_error(message: &str) {
    println!("{}", error_json(message));
}
