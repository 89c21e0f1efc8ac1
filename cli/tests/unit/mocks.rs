//! Shared recording fakes of the platform and tracker ports.
//!
//! Every fake records the calls it receives as short strings so that tests can
//! assert on ordering as well as on presence.

#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use cfdeploy_cli::application::ports::{
    ChangeManagement, IssueLookup, IssueTracker, LocalFs, LoginRequest, PlatformApi,
    PlatformCli, PushRequest, Space,
};
use cfdeploy_cli::domain::app::AppState;
use cfdeploy_cli::domain::{
    AppInstance, AppRoute, ChangeRequest, PlatformError, RouteBinding, Story, TrackerError,
};

// ── Route table fixture ──────────────────────────────────────────────────────

/// One row of a fake `cf routes` listing: `(host, domain, path, apps)`.
pub type RouteRow<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Render rows in the fixed-column layout `cf routes` prints.
pub fn routes_table(rows: &[RouteRow<'_>]) -> String {
    let line = |space: &str, host: &str, domain: &str, port: &str, path: &str, ty: &str, apps: &str, service: &str| {
        format!("{space:<8}{host:<18}{domain:<20}{port:<7}{path:<14}{ty:<7}{apps:<60}{service}")
            .trim_end()
            .to_string()
    };
    let mut out = vec![
        "Getting routes for org ci / space dev as deployer ...".to_string(),
        String::new(),
        line("space", "host", "domain", "port", "path", "type", "apps", "service"),
    ];
    for (host, domain, path, apps) in rows {
        out.push(line("dev", host, domain, "", path, "", apps, ""));
    }
    out.join("\n")
}

pub fn app(name: &str, state: AppState) -> AppInstance {
    AppInstance {
        name: name.to_string(),
        guid: format!("guid-{name}"),
        state,
    }
}

// ── PlatformCli fake ─────────────────────────────────────────────────────────

/// Records every `cf` call; optionally fails on one verb.
#[derive(Default)]
pub struct FakeCli {
    calls: Mutex<Vec<String>>,
    routes: String,
    fail_on: Option<&'static str>,
    signed_in: bool,
}

impl FakeCli {
    pub fn new() -> Self {
        Self::with_routes(&routes_table(&[]))
    }

    pub fn with_routes(table: &str) -> Self {
        Self {
            routes: table.to_string(),
            ..Self::default()
        }
    }

    /// Make every call whose verb is `verb` exit non-zero.
    #[must_use]
    pub fn failing_on(mut self, verb: &'static str) -> Self {
        self.fail_on = Some(verb);
        self
    }

    /// Behave as if an earlier command already opened a `cf` session.
    #[must_use]
    pub fn signed_in(mut self) -> Self {
        self.signed_in = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Calls whose verb is `verb`, in order.
    pub fn calls_to(&self, verb: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split(' ').next() == Some(verb))
            .collect()
    }

    /// Index of the first call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) -> Result<()> {
        let verb = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.lock().expect("lock").push(call);
        if self.fail_on == Some(verb.as_str()) {
            return Err(PlatformError::CommandFailed {
                command: format!("cf {verb}"),
                code: 1,
            }
            .into());
        }
        Ok(())
    }
}

fn binding(verb: &str, route: &RouteBinding) -> String {
    format!(
        "{verb} {} {} {} {}",
        route.app,
        route.domain,
        route.host.as_deref().unwrap_or("-"),
        route.path.as_deref().unwrap_or("-")
    )
}

impl PlatformCli for FakeCli {
    async fn set_api(&self, endpoint: &str, _: bool) -> Result<()> {
        self.record(format!("api {endpoint}"))
    }
    async fn auth(&self, user: &str, _: &str) -> Result<()> {
        self.record(format!("auth {user}"))
    }
    async fn target(&self, org: &str, space: &str) -> Result<()> {
        self.record(format!("target {org} {space}"))
    }
    async fn login(&self, request: &LoginRequest<'_>) -> Result<()> {
        self.record(format!("login {}", request.user))
    }
    async fn version(&self) -> Result<String> {
        self.record("--version".to_string())?;
        Ok("cf version 6.53.0".to_string())
    }
    async fn push(&self, request: &PushRequest<'_>) -> Result<()> {
        let mut call = format!("push {}", request.app);
        if let Some(bp) = request.buildpack {
            call.push_str(&format!(" -b {bp}"));
        }
        if request.no_start {
            call.push_str(" --no-start");
        }
        self.record(call)
    }
    async fn scale(&self, app: &str, instances: u32) -> Result<()> {
        self.record(format!("scale {app} {instances}"))
    }
    async fn start(&self, app: &str) -> Result<()> {
        self.record(format!("start {app}"))
    }
    async fn stop(&self, app: &str) -> Result<()> {
        self.record(format!("stop {app}"))
    }
    async fn restart(&self, app: &str) -> Result<()> {
        self.record(format!("restart {app}"))
    }
    async fn delete(&self, app: &str) -> Result<()> {
        self.record(format!("delete {app}"))
    }
    async fn map_route(&self, route: &RouteBinding) -> Result<()> {
        self.record(binding("map-route", route))
    }
    async fn unmap_route(&self, route: &RouteBinding) -> Result<()> {
        self.record(binding("unmap-route", route))
    }
    async fn routes(&self) -> Result<String> {
        self.record("routes".to_string())?;
        Ok(self.routes.clone())
    }
    fn session_started(&self) -> bool {
        self.signed_in || !self.calls().is_empty()
    }
    async fn logout(&self) -> Result<()> {
        self.record("logout".to_string())
    }
}

// ── PlatformApi fake ─────────────────────────────────────────────────────────

pub const SPACE_GUID: &str = "space-guid";

/// Serves a fixed space, app list and per-app routes.
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    spaces: Vec<Space>,
    apps: Vec<AppInstance>,
    app_routes: HashMap<String, Vec<AppRoute>>,
}

impl FakeApi {
    /// Space `dev` containing `apps`.
    pub fn new(apps: Vec<AppInstance>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            spaces: vec![
                Space {
                    guid: "other-guid".to_string(),
                    name: "dev-2".to_string(),
                },
                Space {
                    guid: SPACE_GUID.to_string(),
                    name: "dev".to_string(),
                },
            ],
            apps,
            app_routes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_app_routes(mut self, app_guid: &str, routes: Vec<AppRoute>) -> Self {
        self.app_routes.insert(app_guid.to_string(), routes);
        self
    }

    #[must_use]
    pub fn without_spaces(mut self) -> Self {
        self.spaces.clear();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }
}

impl PlatformApi for FakeApi {
    async fn authenticate(&self, user: &str, _: &str) -> Result<String> {
        self.record(format!("authenticate {user}"));
        Ok("token-123".to_string())
    }
    async fn list_spaces(&self, token: &str) -> Result<Vec<Space>> {
        self.record(format!("spaces {token}"));
        Ok(self.spaces.clone())
    }
    async fn list_apps(&self, _: &str, space_guid: &str) -> Result<Vec<AppInstance>> {
        self.record(format!("apps {space_guid}"));
        Ok(self.apps.clone())
    }
    async fn list_app_routes(&self, _: &str, app_guid: &str) -> Result<Vec<AppRoute>> {
        self.record(format!("app-routes {app_guid}"));
        Ok(self.app_routes.get(app_guid).cloned().unwrap_or_default())
    }
}

// ── LocalFs fake ──────────────────────────────────────────────────────────────

/// An in-memory file listing.
#[derive(Default)]
pub struct FakeFs {
    files: Vec<PathBuf>,
}

impl FakeFs {
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(PathBuf::from).collect(),
        }
    }
}

impl LocalFs for FakeFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .iter()
            .filter(|f| f.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

// ── Tracker fakes ────────────────────────────────────────────────────────────

pub fn story(id: &str, story_type: &str) -> Story {
    Story {
        id: id.to_string(),
        key: format!("CI-{id}"),
        summary: format!("summary {id}"),
        url: format!("https://jira.example.com/browse/CI-{id}"),
        story_type: story_type.to_string(),
        labels: Vec::new(),
        fix_versions: vec!["ci-helloworld-v1".to_string()],
    }
}

/// Serves known stories; unknown ids are rejected with 404.
#[derive(Default)]
pub struct FakeTracker {
    calls: Mutex<Vec<String>>,
    stories: HashMap<String, Story>,
    unreachable: bool,
    fail_version: bool,
    fail_tag: bool,
}

impl FakeTracker {
    pub fn with_stories(stories: Vec<Story>) -> Self {
        Self {
            stories: stories.into_iter().map(|s| (s.id.clone(), s)).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    #[must_use]
    pub fn failing_version(mut self) -> Self {
        self.fail_version = true;
        self
    }

    #[must_use]
    pub fn failing_tag(mut self) -> Self {
        self.fail_tag = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }
}

impl IssueTracker for FakeTracker {
    async fn issue(&self, id: &str) -> Result<IssueLookup> {
        self.record(format!("issue {id}"));
        if self.unreachable {
            return Err(TrackerError::Unreachable {
                url: "https://jira.example.com".to_string(),
                reason: "connection refused".to_string(),
            }
            .into());
        }
        Ok(match self.stories.get(id) {
            Some(story) => IssueLookup::Found(story.clone()),
            None => IssueLookup::Rejected {
                status: 404,
                body: "Issue Does Not Exist".to_string(),
            },
        })
    }
    async fn create_version(&self, name: &str) -> Result<()> {
        self.record(format!("create-version {name}"));
        if self.fail_version {
            anyhow::bail!("status 400: version exists");
        }
        Ok(())
    }
    async fn set_fix_versions(&self, id: &str, versions: &[String]) -> Result<()> {
        self.record(format!("fix-versions {id} {}", versions.join(",")));
        if self.fail_tag {
            anyhow::bail!("status 403");
        }
        Ok(())
    }
}

/// Records change requests; optionally fails.
#[derive(Default)]
pub struct FakeChanges {
    pub requests: Mutex<Vec<ChangeRequest>>,
    fail: bool,
}

impl FakeChanges {
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<ChangeRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl ChangeManagement for FakeChanges {
    async fn create_change(&self, request: &ChangeRequest) -> Result<String> {
        self.requests.lock().expect("lock").push(request.clone());
        if self.fail {
            anyhow::bail!("ServiceNow returned status 500");
        }
        Ok("CHG0030001".to_string())
    }
}
