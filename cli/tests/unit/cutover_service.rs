//! Unit tests for cutover.

#![allow(clippy::expect_used)]

use cfdeploy_cli::application::services::cutover::cutover;
use cfdeploy_cli::domain::AppRoute;
use cfdeploy_cli::domain::app::AppState;

use crate::helpers::{DOMAIN, NoopReporter, WarnRecorder, deploy_config};
use crate::mocks::{FakeApi, FakeCli, app};

#[tokio::test]
async fn test_cutover_retires_everything_but_the_release() {
    let api = FakeApi::new(vec![
        app("ci-helloworld-v2.9.0+1", AppState::Started),
        app("ci-helloworld-v2.8.5+1", AppState::Started),
        app("ci-helloworld-v2.8.0+1", AppState::Stopped),
        app("billing-v1", AppState::Stopped),
    ])
    .with_app_routes(
        "guid-ci-helloworld-v2.8.0+1",
        vec![
            AppRoute {
                guid: "r1".to_string(),
                host: Some("ci-helloworld".to_string()),
                path: Some("/cold".to_string()),
            },
            AppRoute {
                guid: "r2".to_string(),
                host: None,
                path: None,
            },
        ],
    );
    let cli = FakeCli::new();
    let reporter = WarnRecorder::default();

    cutover(&api, &cli, &reporter, &deploy_config())
        .await
        .expect("cutover");

    assert_eq!(
        cli.calls_to("scale"),
        vec!["scale ci-helloworld-v2.8.5+1 1"]
    );
    assert_eq!(cli.calls_to("stop"), vec!["stop ci-helloworld-v2.8.5+1"]);
    assert_eq!(
        cli.calls_to("unmap-route"),
        vec![
            format!("unmap-route ci-helloworld-v2.8.0+1 {DOMAIN} ci-helloworld /cold"),
            format!("unmap-route ci-helloworld-v2.8.0+1 {DOMAIN} - -"),
        ]
    );
    assert_eq!(cli.calls_to("delete"), vec!["delete ci-helloworld-v2.8.0+1"]);
    assert!(cli.calls_to("push").is_empty());
    assert_eq!(reporter.warnings().len(), 1);
}

#[tokio::test]
async fn test_cutover_never_touches_a_stopped_release() {
    let api = FakeApi::new(vec![app("ci-helloworld-v2.9.0+1", AppState::Stopped)]);
    let cli = FakeCli::new();

    cutover(&api, &cli, &NoopReporter, &deploy_config())
        .await
        .expect("cutover");

    assert!(cli.calls_to("delete").is_empty());
    assert!(cli.calls_to("stop").is_empty());
}

#[tokio::test]
async fn test_cutover_delete_failure_is_fatal() {
    let api = FakeApi::new(vec![
        app("ci-helloworld-v2.8.0+1", AppState::Stopped),
        app("ci-helloworld-v2.7.0+1", AppState::Stopped),
    ]);
    let cli = FakeCli::new().failing_on("delete");

    let err = cutover(&api, &cli, &NoopReporter, &deploy_config())
        .await
        .expect_err("delete failure");

    assert!(err.to_string().contains("Failed calling cf delete"), "got: {err}");
    assert_eq!(cli.calls_to("delete").len(), 1);
}
