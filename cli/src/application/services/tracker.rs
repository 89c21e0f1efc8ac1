//! Application service: issue tracker and change management notifications.
//!
//! Only an unreachable tracker is fatal. Every other failure is reported as a
//! warning and the run continues.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

use crate::application::ports::{ChangeManagement, IssueLookup, IssueTracker, ProgressReporter};
use crate::domain::tracker::fix_versions_with;
use crate::domain::{ChangeRequest, Story};

/// Fetch the details of each issue. Issues the tracker does not return are skipped.
///
/// # Errors
///
/// Returns an error if the tracker cannot be reached.
pub async fn story_details(
    tracker: &impl IssueTracker,
    reporter: &impl ProgressReporter,
    ids: &[String],
) -> Result<Vec<Story>> {
    let mut stories = Vec::with_capacity(ids.len());
    for id in ids {
        match tracker.issue(id).await? {
            IssueLookup::Found(story) => stories.push(story),
            IssueLookup::Rejected { status, body } => {
                tracing::warn!(%id, status, %body, "issue lookup rejected");
                reporter.warn(&format!("skipping {id}: tracker returned {status}"));
            }
        }
    }
    Ok(stories)
}

/// Create the release version once and add it to the fix versions of every issue.
///
/// Returns the stories that were found.
///
/// # Errors
///
/// Returns an error if the tracker cannot be reached.
pub async fn tag_stories(
    tracker: &impl IssueTracker,
    reporter: &impl ProgressReporter,
    ids: &[String],
    label: &str,
) -> Result<Vec<Story>> {
    let stories = story_details(tracker, reporter, ids).await?;
    if stories.is_empty() {
        reporter.warn("no stories to tag");
        return Ok(stories);
    }

    if let Err(err) = tracker.create_version(label).await {
        tracing::warn!(%label, error = %err, "failed to create version");
        reporter.warn(&format!("could not create version {label}: {err}"));
    }

    for story in &stories {
        let versions = fix_versions_with(story, label);
        match tracker.set_fix_versions(&story.id, &versions).await {
            Ok(()) => reporter.success(&format!("tagged {} with {label}", story.key)),
            Err(err) => {
                tracing::warn!(key = %story.key, error = %err, "failed to set fix versions");
                reporter.warn(&format!("could not tag {}: {err}", story.key));
            }
        }
    }
    Ok(stories)
}

/// Open a change request for `release` covering `ids`.
///
/// Returns the change number, or `None` if creation failed.
///
/// # Errors
///
/// Returns an error only if the issue tracker cannot be reached.
pub async fn create_change_request(
    tracker: &impl IssueTracker,
    changes: &impl ChangeManagement,
    reporter: &impl ProgressReporter,
    release: &str,
    ids: &[String],
    start: DateTime<Utc>,
    window: Duration,
) -> Result<Option<String>> {
    let stories = story_details(tracker, reporter, ids).await?;
    let request = ChangeRequest::for_release(release, &stories, start, window);

    match changes.create_change(&request).await {
        Ok(number) => {
            tracing::info!(%number, "created change request");
            reporter.success(&format!("created change request {number}"));
            Ok(Some(number))
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to create change request");
            reporter.warn(&format!("could not create change request: {err}"));
            Ok(None)
        }
    }
}
