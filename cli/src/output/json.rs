//! JSON output helpers for `--json` code paths.

use anyhow::{Context, Result};

use crate::domain::{SemverBump, Story};

/// Format story details and the suggested bump.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "stories": [ { "id": "...", "key": "...", ... } ],
///   "bump": "minor"
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_stories(stories: &[Story], bump: SemverBump) -> Result<String> {
    let obj = serde_json::json!({
        "stories": stories,
        "bump": bump,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
