//! Routes, the cold-route convention, and the `cf routes` table parser.
//!
//! A route is *cold* when the final segment of its path is exactly `cold`.
//! Appending, stripping and detection all use that one rule.
//!
//! The parser treats `cf routes` output as a fixed-column table:
//! - the header row defines one start offset per column
//! - a column starts at line start or after a run of two or more spaces
//! - every data row is sliced at those offsets
//! - the offsets of `host`, `domain`, `path` and `apps` must increase in that order

use serde::Serialize;

use crate::domain::app::{belongs_to_project, is_release};
use crate::domain::error::RouteTableError;

/// Final path segment marking a route alias that takes no production traffic.
pub const COLD_SEGMENT: &str = "cold";

/// Columns that must be present, in the order they must appear.
const REQUIRED_COLUMNS: [&str; 4] = ["host", "domain", "path", "apps"];

/// Names of the bound-service column: cf6 prints `service`, cf7 `service instance`.
const SERVICE_COLUMNS: [&str; 2] = ["service", "service instance"];

/// One row of the platform route listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub host: Option<String>,
    pub domain: String,
    pub path: Option<String>,
    pub apps: Vec<String>,
    pub service: Option<String>,
}

/// A route bound to a single application, as reported by the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRoute {
    pub guid: String,
    pub host: Option<String>,
    pub path: Option<String>,
}

/// Arguments of one `cf map-route` / `cf unmap-route` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBinding {
    pub app: String,
    pub domain: String,
    pub host: Option<String>,
    pub path: Option<String>,
}

impl Route {
    /// Returns `true` when this route is a cold alias.
    #[must_use]
    pub fn is_cold(&self) -> bool {
        is_cold_path(self.path.as_deref())
    }

    /// This route exactly as listed, bound to `app`.
    #[must_use]
    pub fn binding(&self, app: &str) -> RouteBinding {
        RouteBinding {
            app: app.to_string(),
            domain: self.domain.clone(),
            host: self.host.clone(),
            path: self.path.clone(),
        }
    }

    /// The cold alias of this (hot) route, bound to `app`.
    #[must_use]
    pub fn cold_binding(&self, app: &str) -> RouteBinding {
        RouteBinding {
            path: Some(to_cold_path(self.path.as_deref())),
            ..self.binding(app)
        }
    }

    /// The hot route this (cold) alias promotes to, bound to `app`.
    #[must_use]
    pub fn hot_binding(&self, app: &str) -> RouteBinding {
        RouteBinding {
            path: self.path.as_deref().and_then(to_hot_path),
            ..self.binding(app)
        }
    }
}

// ── Cold-route rule ───────────────────────────────────────────────────────────

/// Returns `true` when the final segment of `path` is [`COLD_SEGMENT`].
#[must_use]
pub fn is_cold_path(path: Option<&str>) -> bool {
    path.and_then(|p| p.trim_end_matches('/').rsplit('/').next())
        .is_some_and(|segment| segment == COLD_SEGMENT)
}

/// Canonical route path: one leading `/` and no trailing `/`. Empty is `None`.
#[must_use]
pub fn normalize_path(path: &str) -> Option<String> {
    let inner = path.trim().trim_matches('/');
    (!inner.is_empty()).then(|| format!("/{inner}"))
}

/// Append the cold segment to a hot path. No path becomes `/cold`.
#[must_use]
pub fn to_cold_path(hot: Option<&str>) -> String {
    match hot.and_then(normalize_path) {
        Some(base) => format!("{base}/{COLD_SEGMENT}"),
        None => format!("/{COLD_SEGMENT}"),
    }
}

/// Strip the trailing cold segment. Returns `None` when nothing is left.
///
/// The result is normalized, so `to_hot_path(&to_cold_path(p))` equals
/// `p.and_then(normalize_path)`.
#[must_use]
pub fn to_hot_path(cold: &str) -> Option<String> {
    let path = normalize_path(cold)?;
    match path.rsplit_once('/') {
        Some((rest, COLD_SEGMENT)) => normalize_path(rest),
        _ => Some(path),
    }
}

// ── Filtering ─────────────────────────────────────────────────────────────────

/// Selects routes by the applications bound to them.
#[derive(Debug, Clone)]
pub struct RouteFilter<'a> {
    project: &'a str,
    version: Option<&'a str>,
    cold_only: bool,
}

impl<'a> RouteFilter<'a> {
    /// Routes bound to any `<project>-*` application.
    #[must_use]
    pub fn project(project: &'a str) -> Self {
        Self {
            project,
            version: None,
            cold_only: false,
        }
    }

    /// Narrow to routes bound to exactly `<project>-<version>`.
    #[must_use]
    pub fn version(mut self, version: &'a str) -> Self {
        self.version = Some(version);
        self
    }

    /// Keep only cold routes.
    #[must_use]
    pub fn cold_only(mut self) -> Self {
        self.cold_only = true;
        self
    }

    fn matches_app(&self, app: &str) -> bool {
        match self.version {
            Some(version) => is_release(app, self.project, version),
            None => belongs_to_project(app, self.project),
        }
    }

    /// Apply the filter. Matching routes keep only the applications that matched.
    #[must_use]
    pub fn apply(&self, routes: Vec<Route>) -> Vec<Route> {
        routes
            .into_iter()
            .filter(|route| !self.cold_only || route.is_cold())
            .filter_map(|mut route| {
                route.apps.retain(|app| self.matches_app(app));
                (!route.apps.is_empty()).then_some(route)
            })
            .collect()
    }
}

// ── Table parser ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    name: String,
    start: usize,
}

/// Split a header line into named columns with their byte offsets.
fn header_columns(line: &str) -> Vec<Column> {
    let mut columns = Vec::new();
    let mut current: Option<Column> = None;
    // Spaces seen since the last non-space character; unbounded at line start.
    let mut run = usize::MAX;

    for (idx, ch) in line.char_indices() {
        if ch.is_whitespace() {
            run = run.saturating_add(1);
            continue;
        }
        if run >= 2 {
            columns.extend(current.take());
            current = Some(Column {
                name: String::new(),
                start: idx,
            });
        } else if run == 1 {
            if let Some(col) = current.as_mut() {
                col.name.push(' ');
            }
        }
        if let Some(col) = current.as_mut() {
            col.name.push(ch);
        }
        run = 0;
    }
    columns.extend(current);
    columns
}

fn is_header(columns: &[Column]) -> bool {
    ["host", "domain", "apps"]
        .iter()
        .all(|name| columns.iter().any(|c| c.name == *name))
}

/// Slice `line[start..end]`, clamped to the line and to char boundaries.
fn slice_field(line: &str, start: usize, end: Option<usize>) -> &str {
    let len = line.len();
    let mut start = start.min(len);
    let mut end = end.unwrap_or(len).min(len);
    while !line.is_char_boundary(start) {
        start -= 1;
    }
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    if end <= start { "" } else { line[start..end].trim() }
}

/// Column layout learned from the header row.
#[derive(Debug)]
pub struct RouteTable {
    columns: Vec<Column>,
}

impl RouteTable {
    /// Learn the layout from a header line.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing or the required
    /// columns are out of order.
    pub fn from_header(line: &str) -> Result<Self, RouteTableError> {
        let columns = header_columns(line);
        let mut previous: Option<(&'static str, usize)> = None;
        for name in REQUIRED_COLUMNS {
            let start = columns
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.start)
                .ok_or(RouteTableError::MissingColumn(name))?;
            if let Some((earlier, earlier_start)) = previous {
                if start <= earlier_start {
                    return Err(RouteTableError::ColumnOrder {
                        earlier,
                        later: name,
                    });
                }
            }
            previous = Some((name, start));
        }
        Ok(Self { columns })
    }

    fn field<'l>(&self, line: &'l str, name: &str) -> &'l str {
        self.first_field(line, &[name])
    }

    /// The field under whichever of `names` the header carries.
    fn first_field<'l>(&self, line: &'l str, names: &[&str]) -> &'l str {
        let Some(pos) = self
            .columns
            .iter()
            .position(|c| names.contains(&c.name.as_str()))
        else {
            return "";
        };
        let start = self.columns[pos].start;
        let end = self.columns.get(pos + 1).map(|c| c.start);
        slice_field(line, start, end)
    }

    /// Slice one data row into a [`Route`].
    #[must_use]
    pub fn parse_row(&self, line: &str) -> Route {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Route {
            host: non_empty(self.field(line, "host")),
            domain: self.field(line, "domain").to_string(),
            path: non_empty(self.field(line, "path")),
            apps: self
                .field(line, "apps")
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
            service: non_empty(self.first_field(line, &SERVICE_COLUMNS)),
        }
    }
}

/// Parse the full `cf routes` output.
///
/// Lines before the header (status chatter) are skipped, as are blank lines
/// after it.
///
/// # Errors
///
/// Returns an error if no header row is present or the header is invalid.
pub fn parse_routes(output: &str) -> Result<Vec<Route>, RouteTableError> {
    let mut lines = output.lines();
    let header = lines
        .by_ref()
        .find(|line| is_header(&header_columns(line)))
        .ok_or(RouteTableError::MissingHeader)?;
    let table = RouteTable::from_header(header)?;
    Ok(lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| table.parse_row(line))
        .collect())
}
