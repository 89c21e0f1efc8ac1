//! Release bookkeeping types: tracker stories, fix versions, change requests.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Reason recorded on every change request created by the pipeline.
pub const CHANGE_REASON: &str = "Continuous Deployment";

/// Description attached to tracker versions created by the pipeline.
pub const VERSION_DESCRIPTION: &str = "Generated from pipeline";

const SERVICENOW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One tracker issue with the fields the release flow cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub url: String,
    pub story_type: String,
    pub labels: Vec<String>,
    pub fix_versions: Vec<String>,
}

/// Semantic-version component implied by a set of stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemverBump {
    Major,
    Minor,
    Bug,
}

impl std::fmt::Display for SemverBump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Bug => "bug",
        })
    }
}

/// Decide the version bump for a release.
///
/// A `major` label anywhere wins. Otherwise a story or feature means minor,
/// and bugs alone mean bug. With no stories at all the answer is minor.
#[must_use]
pub fn semantic_bump(stories: &[Story]) -> SemverBump {
    if stories
        .iter()
        .any(|s| s.labels.iter().any(|l| l.eq_ignore_ascii_case("major")))
    {
        return SemverBump::Major;
    }
    if stories
        .iter()
        .any(|s| matches!(s.story_type.as_str(), "story" | "feature"))
    {
        return SemverBump::Minor;
    }
    if stories.iter().any(|s| s.story_type == "bug") {
        return SemverBump::Bug;
    }
    SemverBump::Minor
}

/// Name of the tracker version that marks a release.
#[must_use]
pub fn release_label(project: &str, version: &str) -> String {
    format!("{project}-{version}")
}

/// The fix-version set of `story` after adding `label`, without duplicates.
#[must_use]
pub fn fix_versions_with(story: &Story, label: &str) -> Vec<String> {
    let mut versions = story.fix_versions.clone();
    if !versions.iter().any(|v| v == label) {
        versions.push(label.to_string());
    }
    versions
}

/// One line per story: `KEY [type] summary (url)`.
#[must_use]
pub fn release_notes(stories: &[Story]) -> String {
    stories
        .iter()
        .map(|s| format!("{} [{}] {} ({})", s.key, s.story_type, s.summary, s.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Payload of a change-management request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRequest {
    pub short_description: String,
    pub description: String,
    pub reason: String,
    pub start_date: String,
    pub end_date: String,
}

impl ChangeRequest {
    /// Build a change request for `release` covering `stories`, scheduled from
    /// `start` for `window`.
    #[must_use]
    pub fn for_release(
        release: &str,
        stories: &[Story],
        start: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        let notes = release_notes(stories);
        let description = if notes.is_empty() {
            format!("Release {release}")
        } else {
            format!("Release {release}\n\n{notes}")
        };
        Self {
            short_description: format!("Deploy {release}"),
            description,
            reason: CHANGE_REASON.to_string(),
            start_date: start.format(SERVICENOW_TIME_FORMAT).to_string(),
            end_date: (start + window).format(SERVICENOW_TIME_FORMAT).to_string(),
        }
    }
}
