//! Unit tests for tracker tagging and change requests.

#![allow(clippy::expect_used)]

use chrono::{Duration, TimeZone, Utc};
use cfdeploy_cli::application::services::tracker::{
    create_change_request, story_details, tag_stories,
};
use cfdeploy_cli::domain::TrackerError;

use crate::helpers::WarnRecorder;
use crate::mocks::{FakeChanges, FakeTracker, story};

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_story_details_skips_rejected_issues() {
    let tracker = FakeTracker::with_stories(vec![story("101", "story"), story("103", "bug")]);
    let reporter = WarnRecorder::default();

    let stories = story_details(&tracker, &reporter, &ids(&["101", "102", "103"]))
        .await
        .expect("details");

    let keys: Vec<_> = stories.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["CI-101", "CI-103"]);
    assert_eq!(reporter.warnings(), vec!["skipping 102: tracker returned 404"]);
}

#[tokio::test]
async fn test_story_details_unreachable_tracker_is_fatal() {
    let tracker = FakeTracker::with_stories(vec![]).unreachable();

    let err = story_details(&tracker, &WarnRecorder::default(), &ids(&["101"]))
        .await
        .expect_err("unreachable");

    assert!(err.downcast_ref::<TrackerError>().is_some());
}

#[tokio::test]
async fn test_tag_stories_creates_version_once_and_appends_label() {
    let tracker = FakeTracker::with_stories(vec![story("101", "story"), story("102", "bug")]);

    tag_stories(
        &tracker,
        &WarnRecorder::default(),
        &ids(&["101", "102"]),
        "ci-helloworld-v2.9.0+1",
    )
    .await
    .expect("tag");

    assert_eq!(
        tracker.calls(),
        vec![
            "issue 101",
            "issue 102",
            "create-version ci-helloworld-v2.9.0+1",
            "fix-versions 101 ci-helloworld-v1,ci-helloworld-v2.9.0+1",
            "fix-versions 102 ci-helloworld-v1,ci-helloworld-v2.9.0+1",
        ]
    );
}

#[tokio::test]
async fn test_tag_stories_continues_past_tracker_failures() {
    let tracker = FakeTracker::with_stories(vec![story("101", "story"), story("102", "bug")])
        .failing_version()
        .failing_tag();
    let reporter = WarnRecorder::default();

    let stories = tag_stories(&tracker, &reporter, &ids(&["101", "102"]), "rel-1")
        .await
        .expect("failures are warnings");

    assert_eq!(stories.len(), 2);
    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 3, "got: {warnings:?}");
    assert!(warnings[0].starts_with("could not create version rel-1"));
    assert!(warnings[1].starts_with("could not tag CI-101"));
}

#[tokio::test]
async fn test_tag_stories_with_nothing_found_creates_no_version() {
    let tracker = FakeTracker::with_stories(vec![]);
    let reporter = WarnRecorder::default();

    tag_stories(&tracker, &reporter, &ids(&["999"]), "rel-1")
        .await
        .expect("tag");

    assert!(!tracker.calls().iter().any(|c| c.starts_with("create-version")));
    assert!(reporter.warnings().contains(&"no stories to tag".to_string()));
}

#[tokio::test]
async fn test_change_request_describes_release_window() {
    let tracker = FakeTracker::with_stories(vec![story("101", "story")]);
    let changes = FakeChanges::default();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 22, 30, 0).single().expect("date");

    let number = create_change_request(
        &tracker,
        &changes,
        &WarnRecorder::default(),
        "ci-helloworld-v2.9.0+1",
        &ids(&["101"]),
        start,
        Duration::hours(2),
    )
    .await
    .expect("change request");

    assert_eq!(number.as_deref(), Some("CHG0030001"));
    let requests = changes.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].start_date, "2024-03-01 22:30:00");
    assert_eq!(requests[0].end_date, "2024-03-02 00:30:00");
    assert!(requests[0].description.contains("CI-101"));
}

#[tokio::test]
async fn test_change_request_failure_is_a_warning() {
    let tracker = FakeTracker::with_stories(vec![]);
    let changes = FakeChanges::failing();
    let reporter = WarnRecorder::default();

    let number = create_change_request(
        &tracker,
        &changes,
        &reporter,
        "rel-1",
        &[],
        Utc::now(),
        Duration::hours(1),
    )
    .await
    .expect("not fatal");

    assert!(number.is_none());
    assert_eq!(reporter.warnings().len(), 1);
}
